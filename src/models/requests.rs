//! Request DTOs for the PetProfiles API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for creating or updating a profile
/// (`POST /api/PetProfiles`, `PUT /api/PetProfiles/:id`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: String,
    pub breed: String,
    pub age: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProfileRequest {
    /// Validates the request data
    ///
    /// Returns every problem found, or an empty list if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name cannot be empty".to_string());
        }
        if self.breed.trim().is_empty() {
            errors.push("Breed cannot be empty".to_string());
        }
        if self.age < 0 {
            errors.push("Age cannot be negative".to_string());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_request_deserialize() {
        let json = r#"{"name": "Rex", "breed": "Beagle", "age": 4}"#;
        let req: ProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "Rex");
        assert_eq!(req.age, 4);
        assert!(req.image_url.is_none());
    }

    #[test]
    fn test_profile_request_with_image() {
        let json = r#"{"name": "Rex", "breed": "Beagle", "age": 4, "imageUrl": "rex.jpg"}"#;
        let req: ProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.image_url.as_deref(), Some("rex.jpg"));
    }

    #[test]
    fn test_validate_collects_errors() {
        let req = ProfileRequest {
            name: " ".to_string(),
            breed: "".to_string(),
            age: -1,
            image_url: None,
        };
        assert_eq!(req.validate().len(), 3);
    }

    #[test]
    fn test_validate_valid_request() {
        let req = ProfileRequest {
            name: "Rex".to_string(),
            breed: "Beagle".to_string(),
            age: 0,
            image_url: None,
        };
        assert!(req.validate().is_empty());
    }
}

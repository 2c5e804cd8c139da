//! Pet profile record

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pet profile as stored by the backend and cached by the client.
///
/// JSON field names are camelCase. `cached_image` is a client-side
/// attachment and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetProfile {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age: i32,
    /// Image reference: the upload-assigned filename or an absolute URL
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Local path of the cached image file, when one is on disk
    #[serde(skip)]
    pub cached_image: Option<PathBuf>,
}

impl PetProfile {
    /// Creates a profile stamped with the current time.
    pub fn new(id: i32, name: impl Into<String>, breed: impl Into<String>, age: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            breed: breed.into(),
            age,
            image_url: None,
            created_at: now,
            updated_at: now,
            cached_image: None,
        }
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Returns the image reference if it is present and non-empty.
    pub fn image_ref(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|r| !r.is_empty())
    }
}

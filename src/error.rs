//! Error types for the PetProfiles backend
//!
//! Provides unified error handling using thiserror. Cache components never
//! produce these; they belong to request handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

// == API Error Enum ==
/// Unified error type for the HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body failed validation
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Missing or wrong API key
    #[error("Unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let errors = match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };

        let body = Json(ApiResponse::<()>::error(message, errors));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use proptest::prelude::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ApiError::NotFound("pet 1".to_string()), StatusCode::NOT_FOUND),
            (ApiError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (ApiError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should map to correct HTTP status"
            );
        }
    }

    #[tokio::test]
    async fn test_validation_error_lists_errors() {
        let response =
            ApiError::Validation(vec!["Name cannot be empty".to_string()]).into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0], "Name cannot be empty");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        // Every error variant renders a JSON envelope with success=false and
        // the error's message.
        #[test]
        fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
            let error_variants = vec![
                ApiError::NotFound(error_msg.clone()),
                ApiError::InvalidRequest(error_msg),
            ];

            let rt = tokio::runtime::Runtime::new().unwrap();
            for error in error_variants {
                let expected_msg = error.to_string();
                let response = error.into_response();

                let content_type = response
                    .headers()
                    .get("content-type")
                    .and_then(|v| v.to_str().ok());
                prop_assert!(
                    content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                    "Response should have JSON content-type"
                );

                let bytes = rt.block_on(async {
                    to_bytes(response.into_body(), usize::MAX).await.unwrap()
                });
                let json: serde_json::Value = serde_json::from_slice(&bytes)
                    .expect("Response body should be valid JSON");

                prop_assert_eq!(&json["success"], &serde_json::Value::Bool(false));
                prop_assert_eq!(json["message"].as_str(), Some(expected_msg.as_str()));
            }
        }
    }
}

//! Error types for the client side
//!
//! `DurableCacheError` never leaves the durable cache: every public cache
//! operation logs it and degrades to a miss or a no-op.

use thiserror::Error;

/// Failure talking to the backend.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Failure inside a single durable cache step.
#[derive(Error, Debug)]
pub enum DurableCacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Image reference has no usable file name: {0}")]
    InvalidImageName(String),
}

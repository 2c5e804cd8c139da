//! Data model and DTOs
//!
//! `PetProfile` is shared by the backend and the durable client cache; the
//! request/response types describe HTTP bodies.

pub mod profile;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use profile::PetProfile;
pub use requests::ProfileRequest;
pub use responses::{ApiResponse, HealthResponse, ImageUploadResponse, StatsResponse};

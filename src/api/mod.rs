//! API Module
//!
//! HTTP handlers and routing for the PetProfiles backend.
//!
//! # Endpoints
//! - `GET|POST /api/PetProfiles` - List or create profiles
//! - `GET|PUT|DELETE /api/PetProfiles/:id` - Read, update or delete a profile
//! - `POST /api/Images` - Upload an image
//! - `GET|DELETE /api/Images/:name` - Download or delete an image
//! - `GET /stats` - Volatile cache statistics
//! - `GET /health` - Health check endpoint

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::API_KEY_HEADER;
pub use handlers::*;
pub use routes::create_router;

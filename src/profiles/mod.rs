//! Profile backend
//!
//! In-memory profile and image storage, with the volatile cache in front of
//! profile reads.

mod images;
mod repository;
mod service;

pub use images::{ImageStore, StoredImage};
pub use repository::ProfileRepository;
pub use service::ProfileService;

//! Client-side caching
//!
//! The durable profile/image cache, the image downscaling applied when
//! images enter it, and the HTTP client that feeds it.

pub mod durable;
pub mod error;
pub mod http;
pub mod resize;
pub mod sync;

pub use durable::{CacheMetadata, DurableProfileCache, ImageFetcher};
pub use error::{DurableCacheError, FetchError};
pub use http::HttpApiClient;
pub use sync::{ProfileSource, ProfileSync};

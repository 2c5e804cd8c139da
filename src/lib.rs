//! PetProfiles - profile backend and caching core
//!
//! Provides a TTL key-value cache used by the backend's request handling,
//! and a durable on-disk profile/image cache used by clients.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod profiles;
pub mod tasks;

pub use api::AppState;
pub use cache::VolatileCache;
pub use client::DurableProfileCache;
pub use config::Config;
pub use tasks::spawn_sweep_task;

//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};

/// Backend and client configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for volatile cache entries without explicit TTL
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Value required in the `X-API-Key` header; no check when unset
    pub api_key: Option<String>,
    /// Base URL the client uses to reach the API
    pub api_base_url: String,
    /// Root directory of the durable client cache
    pub cache_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 600)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `API_KEY` - Required API key (default: unset)
    /// - `API_BASE_URL` - Client base URL (default: http://localhost:5000/api)
    /// - `CACHE_DIR` - Durable cache root (default: PetProfiles)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            cache_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        }
    }

    /// Default TTL as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            default_ttl: DEFAULT_TTL.as_secs(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL.as_secs(),
            api_key: None,
            api_base_url: "http://localhost:5000/api".to_string(),
            cache_dir: PathBuf::from("PetProfiles"),
        }
    }
}

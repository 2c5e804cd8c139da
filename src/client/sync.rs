//! Profile load sequence: cached first, then refresh from the network

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::durable::DurableProfileCache;
use super::error::FetchError;
use super::http::HttpApiClient;
use crate::config::Config;
use crate::models::PetProfile;

/// Upstream source of the full profile list.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profiles(&self) -> Result<Vec<PetProfile>, FetchError>;
}

/// Serves cached profiles immediately and refreshes the durable cache from a
/// [`ProfileSource`].
pub struct ProfileSync<S> {
    cache: Arc<DurableProfileCache>,
    source: S,
}

impl<S: ProfileSource> ProfileSync<S> {
    pub fn new(cache: Arc<DurableProfileCache>, source: S) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &Arc<DurableProfileCache> {
        &self.cache
    }

    /// Whatever the durable cache holds; empty on a cold cache.
    pub async fn load(&self) -> Vec<PetProfile> {
        self.cache.get_all().await
    }

    /// Fetches the full list and recaches it.
    ///
    /// On a fetch failure the durable cache is left as it was and the error
    /// is returned, so the caller can decide whether cached data suffices.
    pub async fn refresh(&self) -> Result<Vec<PetProfile>, FetchError> {
        let mut profiles = match self.source.fetch_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Profile refresh failed: {}", e);
                return Err(e);
            }
        };

        self.cache.cache_all(&mut profiles).await;
        info!("Refreshed {} profiles", profiles.len());
        Ok(profiles)
    }
}

impl ProfileSync<HttpApiClient> {
    /// Builds the HTTP-backed sync from `API_BASE_URL`, `API_KEY` and
    /// `CACHE_DIR`. The same client fetches the profile list and the images.
    pub async fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = HttpApiClient::from_config(config)?;
        let cache = DurableProfileCache::open(&config.cache_dir, Arc::new(client.clone())).await;
        Ok(Self::new(Arc::new(cache), client))
    }
}

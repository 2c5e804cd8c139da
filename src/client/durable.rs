//! Durable Profile/Image Cache
//!
//! Keeps the last known-good profiles and their images on disk so the client
//! can render on a cold start and keep working offline.
//!
//! # Layout
//! ```text
//! <root>/ProfileCache/profile_{id}.json
//! <root>/ProfileCache/cache_metadata.json
//! <root>/ImageCache/<image file name>
//! ```
//!
//! No public operation returns an error. Failures are logged and degrade to
//! a miss, an empty result, or a skipped profile.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{DurableCacheError, FetchError};
use super::resize::prepare_for_cache;
use crate::models::PetProfile;

pub const PROFILE_CACHE_DIR: &str = "ProfileCache";
pub const IMAGE_CACHE_DIR: &str = "ImageCache";
pub const METADATA_FILE: &str = "cache_metadata.json";

/// Downloads the raw bytes behind an image reference.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self, reference: &str) -> Result<Bytes, FetchError>;
}

/// Index of the cached profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    /// When the cache was last populated
    pub cached_at: DateTime<Utc>,
    /// Cached profile ids, in the order they were given
    pub profile_ids: Vec<i32>,
}

// == Durable Profile Cache ==
/// On-disk profile and image cache.
///
/// The directories are owned by one application instance; no locking is
/// applied beyond single-file writes.
pub struct DurableProfileCache {
    /// Holds `profile_{id}.json` files and the metadata index
    profile_dir: PathBuf,
    /// Holds cached image files
    image_dir: PathBuf,
    /// Path of the metadata index
    metadata_path: PathBuf,
    /// Source of image bytes
    fetcher: Arc<dyn ImageFetcher>,
}

impl DurableProfileCache {
    // == Constructor ==
    /// Opens (creating if needed) the cache rooted at `root`.
    pub async fn open(root: impl AsRef<Path>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let root = root.as_ref();
        let profile_dir = root.join(PROFILE_CACHE_DIR);
        let image_dir = root.join(IMAGE_CACHE_DIR);
        let metadata_path = profile_dir.join(METADATA_FILE);

        for dir in [&profile_dir, &image_dir] {
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                warn!("Could not create cache directory {}: {}", dir.display(), e);
            }
        }

        Self {
            profile_dir,
            image_dir,
            metadata_path,
            fetcher,
        }
    }

    /// Directory holding the profile files and the metadata index.
    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// Directory holding the cached images.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    // == Cache All ==
    /// Caches every profile and its image, then rewrites the metadata index.
    ///
    /// Profiles are processed concurrently and independently. A profile whose
    /// image cannot be cached is still written, without a local image; a
    /// profile whose file cannot be written is left out of the index. On
    /// return each successfully cached record carries its local image path.
    ///
    /// When an id appears more than once only its first record is cached;
    /// later copies are skipped and the id is listed once.
    pub async fn cache_all(&self, profiles: &mut [PetProfile]) {
        let mut seen = HashSet::new();
        let results = join_all(profiles.iter_mut().map(|profile| {
            let first = seen.insert(profile.id);
            async move {
                if first {
                    self.cache_profile(profile).await
                } else {
                    warn!("Skipping duplicate profile id {}", profile.id);
                    profile.cached_image = None;
                    false
                }
            }
        }))
        .await;

        let profile_ids: Vec<i32> = profiles
            .iter()
            .zip(results)
            .filter_map(|(profile, cached)| cached.then_some(profile.id))
            .collect();

        let metadata = CacheMetadata {
            cached_at: Utc::now(),
            profile_ids,
        };

        match self.write_metadata(&metadata).await {
            Ok(()) => info!(
                "Cached {} of {} profiles",
                metadata.profile_ids.len(),
                profiles.len()
            ),
            Err(e) => warn!("Error saving cache metadata: {}", e),
        }
    }

    // == Get All ==
    /// Returns the cached profiles in index order; empty when the cache is cold.
    pub async fn get_all(&self) -> Vec<PetProfile> {
        let metadata = match self.read_metadata().await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Error loading cache metadata: {}", e);
                return Vec::new();
            }
        };

        let mut profiles = Vec::with_capacity(metadata.profile_ids.len());
        for id in metadata.profile_ids {
            if let Some(profile) = self.get_one(id).await {
                profiles.push(profile);
            }
        }
        profiles
    }

    // == Get One ==
    /// Loads one cached profile, attaching its image when the file exists.
    pub async fn get_one(&self, id: i32) -> Option<PetProfile> {
        match self.read_profile(id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Error reading cached profile {}: {}", id, e);
                None
            }
        }
    }

    // == Invalidate ==
    /// Wipes and recreates both cache directories.
    pub async fn invalidate(&self) {
        for dir in [&self.profile_dir, &self.image_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Error removing cache directory {}: {}", dir.display(), e),
            }
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                warn!("Error recreating cache directory {}: {}", dir.display(), e);
            }
        }
        info!("Durable profile cache invalidated");
    }

    // == Has Cached ==
    /// True iff the metadata index exists, whatever the profile files hold.
    pub async fn has_cached(&self) -> bool {
        tokio::fs::try_exists(&self.metadata_path)
            .await
            .unwrap_or(false)
    }

    // == Last Cached At ==
    /// Timestamp of the last `cache_all`, if the index is readable.
    pub async fn last_cached_at(&self) -> Option<DateTime<Utc>> {
        self.read_metadata()
            .await
            .ok()
            .flatten()
            .map(|metadata| metadata.cached_at)
    }

    /// Image first, then the profile file. Returns whether the profile file
    /// was written.
    async fn cache_profile(&self, profile: &mut PetProfile) -> bool {
        profile.cached_image = None;

        if let Some(reference) = profile.image_ref().map(str::to_owned) {
            match self.cache_image(&reference).await {
                Ok(path) => profile.cached_image = Some(path),
                Err(e) => warn!(
                    "Error caching image {} for profile {}: {}",
                    reference, profile.id, e
                ),
            }
        }

        match self.write_profile(profile).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Error caching profile {}: {}", profile.id, e);
                false
            }
        }
    }

    async fn cache_image(&self, reference: &str) -> Result<PathBuf, DurableCacheError> {
        let path = self.image_path(reference)?;
        let data = self.fetcher.fetch_image(reference).await?;

        let original = data.clone();
        let data = tokio::task::spawn_blocking(move || prepare_for_cache(data))
            .await
            .unwrap_or(original);

        tokio::fs::write(&path, &data).await?;
        debug!("Cached image {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    async fn write_profile(&self, profile: &PetProfile) -> Result<(), DurableCacheError> {
        let json = serde_json::to_vec_pretty(profile)?;
        tokio::fs::write(self.profile_path(profile.id), json).await?;
        Ok(())
    }

    async fn read_profile(&self, id: i32) -> Result<Option<PetProfile>, DurableCacheError> {
        let json = match tokio::fs::read(self.profile_path(id)).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut profile: PetProfile = serde_json::from_slice(&json)?;
        profile.cached_image = self.existing_image(&profile).await;
        Ok(Some(profile))
    }

    async fn existing_image(&self, profile: &PetProfile) -> Option<PathBuf> {
        let path = self.image_path(profile.image_ref()?).ok()?;
        tokio::fs::try_exists(&path)
            .await
            .unwrap_or(false)
            .then_some(path)
    }

    async fn write_metadata(&self, metadata: &CacheMetadata) -> Result<(), DurableCacheError> {
        let json = serde_json::to_vec_pretty(metadata)?;
        tokio::fs::write(&self.metadata_path, json).await?;
        Ok(())
    }

    async fn read_metadata(&self) -> Result<Option<CacheMetadata>, DurableCacheError> {
        match tokio::fs::read(&self.metadata_path).await {
            Ok(json) => Ok(Some(serde_json::from_slice(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn profile_path(&self, id: i32) -> PathBuf {
        self.profile_dir.join(format!("profile_{}.json", id))
    }

    fn image_path(&self, reference: &str) -> Result<PathBuf, DurableCacheError> {
        local_image_name(reference)
            .map(|name| self.image_dir.join(name))
            .ok_or_else(|| DurableCacheError::InvalidImageName(reference.to_string()))
    }
}

/// File name an image reference is cached under: its last path segment,
/// without query string or fragment.
pub fn local_image_name(reference: &str) -> Option<&str> {
    let path = reference.split(['?', '#']).next()?;
    let name = path.rsplit(['/', '\\']).next()?;

    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

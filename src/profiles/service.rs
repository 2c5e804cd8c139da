//! Cached profile service
//!
//! Reads go through the volatile cache first; every write removes the
//! profile list key and all per-profile keys.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{keys, VolatileCache};
use crate::models::{PetProfile, ProfileRequest};
use crate::profiles::ProfileRepository;

#[derive(Debug)]
pub struct ProfileService {
    repository: ProfileRepository,
    cache: Arc<VolatileCache>,
}

impl ProfileService {
    pub fn new(repository: ProfileRepository, cache: Arc<VolatileCache>) -> Self {
        Self { repository, cache }
    }

    /// The cache this service reads through.
    pub fn cache(&self) -> &Arc<VolatileCache> {
        &self.cache
    }

    /// Cached profile list, loaded from the repository on a miss.
    ///
    /// The miss path is not atomic with writes: a list read just before a
    /// concurrent write can be stored after that write's invalidation and is
    /// then served until it expires.
    pub async fn get_all(&self) -> Vec<PetProfile> {
        if let Some(profiles) = self
            .cache
            .get::<Vec<PetProfile>>(keys::ALL_PET_PROFILES)
            .await
        {
            return profiles;
        }

        let profiles = self.repository.list().await;
        self.cache
            .set(keys::ALL_PET_PROFILES, profiles.clone(), None)
            .await;
        profiles
    }

    /// Cached single profile; same miss-path race as [`Self::get_all`].
    pub async fn get_by_id(&self, id: i32) -> Option<PetProfile> {
        let key = keys::pet_profile(id);
        if let Some(profile) = self.cache.get::<PetProfile>(&key).await {
            return Some(profile);
        }

        let profile = self.repository.find(id).await?;
        self.cache.set(key, profile.clone(), None).await;
        Some(profile)
    }

    pub async fn create(&self, req: ProfileRequest) -> PetProfile {
        let profile = self.repository.insert(req).await;
        self.invalidate().await;
        profile
    }

    pub async fn update(&self, id: i32, req: ProfileRequest) -> Option<PetProfile> {
        let profile = self.repository.update(id, req).await?;
        self.invalidate().await;
        Some(profile)
    }

    pub async fn delete(&self, id: i32) -> bool {
        let deleted = self.repository.delete(id).await.is_some();
        if deleted {
            self.invalidate().await;
        }
        deleted
    }

    async fn invalidate(&self) {
        self.cache.remove(keys::ALL_PET_PROFILES).await;
        let removed = self.cache.remove_by_pattern(keys::PET_PROFILE_PATTERN).await;
        debug!("Invalidated profile cache ({} per-profile entries)", removed);
    }
}

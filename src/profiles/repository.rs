//! In-memory profile repository

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{PetProfile, ProfileRequest};

/// Profile storage keyed by id, listing in id order.
#[derive(Debug)]
pub struct ProfileRepository {
    profiles: RwLock<BTreeMap<i32, PetProfile>>,
    next_id: AtomicI32,
}

impl Default for ProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRepository {
    /// Creates an empty repository; the first id assigned is 1.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    pub async fn list(&self) -> Vec<PetProfile> {
        self.profiles.read().await.values().cloned().collect()
    }

    pub async fn find(&self, id: i32) -> Option<PetProfile> {
        self.profiles.read().await.get(&id).cloned()
    }

    /// Stores a new profile under a freshly assigned id.
    pub async fn insert(&self, req: ProfileRequest) -> PetProfile {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut profile = PetProfile::new(id, req.name, req.breed, req.age);
        profile.image_url = req.image_url;

        self.profiles.write().await.insert(id, profile.clone());
        profile
    }

    /// Replaces the editable fields of an existing profile.
    pub async fn update(&self, id: i32, req: ProfileRequest) -> Option<PetProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(&id)?;

        profile.name = req.name;
        profile.breed = req.breed;
        profile.age = req.age;
        profile.image_url = req.image_url;
        profile.updated_at = Utc::now();

        Some(profile.clone())
    }

    /// Returns the removed profile, if it existed.
    pub async fn delete(&self, id: i32) -> Option<PetProfile> {
        self.profiles.write().await.remove(&id)
    }
}

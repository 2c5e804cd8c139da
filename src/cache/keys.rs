//! Cache key conventions for profile lookups.
//!
//! Every per-profile key shares the `pet_profile_` stem so that
//! [`PET_PROFILE_PATTERN`] selects all of them through substring matching.

/// Key for the cached list of all profiles.
pub const ALL_PET_PROFILES: &str = "all_pet_profiles";

/// Pattern selecting every per-profile key.
pub const PET_PROFILE_PATTERN: &str = "pet_profile_*";

/// Key for a single profile.
pub fn pet_profile(id: i32) -> String {
    format!("pet_profile_{}", id)
}

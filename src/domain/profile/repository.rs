use async_trait::async_trait;

use super::{Profile, ProfileUpdate};
use crate::shared::DomainResult;

/// Fields for a new profile record. Counts are kept as the display
/// strings the store holds.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub name: String,
    pub category: Option<String>,
    pub posts: String,
    pub followers: String,
    pub following: String,
    pub introduction: Option<String>,
    pub profile_image: Option<String>,
    pub reels_analyzed: Option<u64>,
    pub highest_reel_views: Option<u64>,
    pub average_reel_views: Option<u64>,
    pub internal_note: Option<String>,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert_profile(&self, profile: NewProfile) -> DomainResult<Profile>;

    /// Every profile, ascending by id.
    async fn list_profiles(&self) -> DomainResult<Vec<Profile>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Profile>>;

    /// Returns `None` when no profile has this id.
    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> DomainResult<Option<Profile>>;

    /// Returns `false` when no profile has this id.
    async fn delete_profile(&self, id: i32) -> DomainResult<bool>;
}

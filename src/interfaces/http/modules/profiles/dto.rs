//! Profile DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::profile::{format_count, RangeStats, DEFAULT_PAGE_SIZE};
use crate::domain::{Profile, ProfileQuery, ProfileStats, ProfileUpdate};
use crate::shared::DomainResult;

/// Profile API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub posts: u64,
    pub followers: u64,
    pub following: u64,
    /// Follower count with thousands separators, e.g. "1,234,567"
    pub followers_display: String,
    pub introduction: Option<String>,
    pub profile_image: Option<String>,
    pub reels_analyzed: Option<u64>,
    pub highest_reel_views: Option<u64>,
    pub average_reel_views: Option<u64>,
    /// Always `null` unless the caller is an admin
    pub internal_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            posts: p.posts,
            followers: p.followers,
            following: p.following,
            followers_display: format_count(p.followers),
            introduction: p.introduction,
            profile_image: p.profile_image,
            reels_analyzed: p.reels_analyzed,
            highest_reel_views: p.highest_reel_views,
            average_reel_views: p.average_reel_views,
            internal_note: p.internal_note,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileListParams {
    /// Case-insensitive substring of the profile name
    pub search: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// followers (default), reelViews or createdAt
    #[serde(rename = "sortBy", alias = "sort_by")]
    pub sort_by: Option<String>,
    /// 1-based page number. Default: 1
    pub page: Option<u32>,
    /// Items per page (1-100). Default: 12
    #[serde(rename = "pageSize", alias = "page_size")]
    pub page_size: Option<u32>,
}

impl ProfileListParams {
    pub fn into_query(self) -> DomainResult<ProfileQuery> {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("") => Default::default(),
            Some(key) => key.parse()?,
        };

        let query = ProfileQuery {
            search: self.search,
            category: self.category,
            sort_by,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        query.validate()?;
        Ok(query)
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "category must be at most 100 characters"))]
    pub category: Option<String>,
    pub introduction: Option<String>,
    /// Admin-only annotation
    pub internal_note: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name,
            category: r.category,
            introduction: r.introduction,
            internal_note: r.internal_note,
        }
    }
}

/// Minimal profile view used inside analytics
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileBriefDto {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub followers: u64,
    pub average_reel_views: u64,
    pub profile_image: Option<String>,
}

impl From<Profile> for ProfileBriefDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            followers: p.followers,
            average_reel_views: p.average_reel_views.unwrap_or(0),
            profile_image: p.profile_image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowerRangeDto {
    /// "< 10K", "10K-100K", "100K-1M" or "> 1M"
    pub range: String,
    pub profile_count: u64,
    pub average_reel_views: u64,
}

impl From<RangeStats> for FollowerRangeDto {
    fn from(r: RangeStats) -> Self {
        Self {
            range: r.range.label().to_string(),
            profile_count: r.profile_count,
            average_reel_views: r.average_reel_views,
        }
    }
}

/// Aggregate analytics over all profiles
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileStatsDto {
    pub total_profiles: u64,
    pub total_followers: u64,
    pub average_followers: u64,
    pub average_reel_views: u64,
    pub category_count: u64,
    pub categories: BTreeMap<String, u64>,
    pub follower_ranges: Vec<FollowerRangeDto>,
    pub top_influencer: Option<ProfileBriefDto>,
    pub top_performers: Vec<ProfileBriefDto>,
}

impl From<ProfileStats> for ProfileStatsDto {
    fn from(s: ProfileStats) -> Self {
        Self {
            total_profiles: s.total_profiles,
            total_followers: s.total_followers,
            average_followers: s.average_followers,
            average_reel_views: s.average_reel_views,
            category_count: s.categories.len() as u64,
            categories: s.categories,
            follower_ranges: s.follower_ranges.into_iter().map(Into::into).collect(),
            top_influencer: s.top_influencer.map(Into::into),
            top_performers: s.top_performers.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortKey;
    use crate::shared::DomainError;

    #[test]
    fn test_list_params_defaults() {
        let query = ProfileListParams::default().into_query().unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.sort_by, SortKey::Followers);
    }

    #[test]
    fn test_list_params_rejects_bad_values() {
        let bad_sort = ProfileListParams {
            sort_by: Some("likes".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_sort.into_query(),
            Err(DomainError::Validation(_))
        ));

        let bad_size = ProfileListParams {
            page_size: Some(500),
            ..Default::default()
        };
        assert!(matches!(
            bad_size.into_query(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_list_params_camel_case() {
        let params: ProfileListParams =
            serde_json::from_value(serde_json::json!({"sortBy": "reelViews", "pageSize": 24}))
                .unwrap();
        let query = params.into_query().unwrap();
        assert_eq!(query.sort_by, SortKey::ReelViews);
        assert_eq!(query.page_size, 24);
    }
}

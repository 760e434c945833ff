//! Profile query engine
//!
//! Derives the filtered, sorted, paginated view the listing endpoint
//! returns. Input order is the store's base order (ascending id) and all
//! sorts are stable, so ties keep that order.

use std::cmp::Reverse;
use std::str::FromStr;

use super::Profile;
use crate::shared::{DomainError, DomainResult, PaginatedResult};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Descending numeric follower count
    #[default]
    Followers,
    /// Descending average reel views, missing counts as zero
    ReelViews,
    /// Newest first
    CreatedAt,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(Self::Followers),
            "reelViews" | "reels" => Ok(Self::ReelViews),
            "createdAt" | "date" => Ok(Self::CreatedAt),
            other => Err(DomainError::Validation(format!(
                "Unknown sort key '{}', expected followers, reelViews or createdAt",
                other
            ))),
        }
    }
}

/// Client-supplied listing criteria
#[derive(Debug, Clone)]
pub struct ProfileQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: SortKey,
    /// 1-indexed
    pub page: u32,
    pub page_size: u32,
}

impl Default for ProfileQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            sort_by: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProfileQuery {
    pub fn validate(&self) -> DomainResult<()> {
        if self.page == 0 {
            return Err(DomainError::Validation("page must be at least 1".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "pageSize must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(needle) => profile
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        };

        let matches_category = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => profile.category.as_deref() == Some(category),
        };

        matches_search && matches_category
    }

    /// Filter and sort, without paginating.
    pub fn filter_and_sort(&self, profiles: Vec<Profile>) -> Vec<Profile> {
        let mut matched: Vec<Profile> = profiles.into_iter().filter(|p| self.matches(p)).collect();

        match self.sort_by {
            SortKey::Followers => matched.sort_by_key(|p| Reverse(p.followers)),
            SortKey::ReelViews => {
                matched.sort_by_key(|p| Reverse(p.average_reel_views.unwrap_or(0)))
            }
            SortKey::CreatedAt => matched.sort_by_key(|p| Reverse(p.created_at)),
        }

        matched
    }

    /// Filter, sort and cut out the requested page. Pages past the end are
    /// empty rather than an error.
    pub fn apply(&self, profiles: Vec<Profile>) -> PaginatedResult<Profile> {
        let sorted = self.filter_and_sort(profiles);
        let total = sorted.len() as u64;

        let start = (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize);
        let items: Vec<Profile> = sorted
            .into_iter()
            .skip(start)
            .take(self.page_size as usize)
            .collect();

        PaginatedResult::new(items, total, self.page, self.page_size)
    }
}

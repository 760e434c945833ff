//! Aggregate analytics over the profile set

use std::collections::BTreeMap;

use super::Profile;

const TOP_PERFORMERS: usize = 5;

/// Follower-count bucket, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FollowerRange {
    Under10K,
    From10KTo100K,
    From100KTo1M,
    Over1M,
}

impl FollowerRange {
    pub const ALL: [FollowerRange; 4] = [
        FollowerRange::Under10K,
        FollowerRange::From10KTo100K,
        FollowerRange::From100KTo1M,
        FollowerRange::Over1M,
    ];

    pub fn of(followers: u64) -> Self {
        match followers {
            0..=9_999 => Self::Under10K,
            10_000..=99_999 => Self::From10KTo100K,
            100_000..=999_999 => Self::From100KTo1M,
            _ => Self::Over1M,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under10K => "< 10K",
            Self::From10KTo100K => "10K-100K",
            Self::From100KTo1M => "100K-1M",
            Self::Over1M => "> 1M",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeStats {
    pub range: FollowerRange,
    pub profile_count: u64,
    pub average_reel_views: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub total_profiles: u64,
    pub total_followers: u64,
    pub average_followers: u64,
    pub average_reel_views: u64,
    /// Profile count per category; uncategorized profiles are not counted.
    pub categories: BTreeMap<String, u64>,
    pub follower_ranges: Vec<RangeStats>,
    pub top_influencer: Option<Profile>,
    pub top_performers: Vec<Profile>,
}

impl ProfileStats {
    pub fn compute(profiles: &[Profile]) -> Self {
        let total_profiles = profiles.len() as u64;
        let total_followers = profiles
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.followers));
        let total_views = profiles.iter().fold(0u64, |acc, p| {
            acc.saturating_add(p.average_reel_views.unwrap_or(0))
        });

        let mut categories = BTreeMap::new();
        for category in profiles.iter().filter_map(|p| p.category.as_deref()) {
            *categories.entry(category.to_string()).or_insert(0u64) += 1;
        }

        let follower_ranges = FollowerRange::ALL
            .iter()
            .filter_map(|range| {
                let in_range: Vec<&Profile> = profiles
                    .iter()
                    .filter(|p| FollowerRange::of(p.followers) == *range)
                    .collect();
                if in_range.is_empty() {
                    return None;
                }
                let views = in_range
                    .iter()
                    .map(|p| p.average_reel_views.unwrap_or(0))
                    .fold(0u64, u64::saturating_add);
                Some(RangeStats {
                    range: *range,
                    profile_count: in_range.len() as u64,
                    average_reel_views: rounded_mean(views, in_range.len() as u64),
                })
            })
            .collect();

        // First maximum wins, matching a left-to-right scan.
        let top_influencer = profiles
            .iter()
            .fold(None::<&Profile>, |best, p| match best {
                Some(b) if b.followers >= p.followers => Some(b),
                _ => Some(p),
            })
            .cloned();

        let mut top_performers = profiles.to_vec();
        top_performers.sort_by_key(|p| std::cmp::Reverse(p.average_reel_views.unwrap_or(0)));
        top_performers.truncate(TOP_PERFORMERS);

        Self {
            total_profiles,
            total_followers,
            average_followers: rounded_mean(total_followers, total_profiles),
            average_reel_views: rounded_mean(total_views, total_profiles),
            categories,
            follower_ranges,
            top_influencer,
            top_performers,
        }
    }
}

fn rounded_mean(sum: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        (sum + count / 2) / count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(id: i32, category: Option<&str>, followers: u64, views: Option<u64>) -> Profile {
        Profile {
            id,
            name: format!("profile-{}", id),
            category: category.map(str::to_string),
            posts: 0,
            followers,
            following: 0,
            introduction: None,
            profile_image: None,
            reels_analyzed: None,
            highest_reel_views: None,
            average_reel_views: views,
            internal_note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_set() {
        let stats = ProfileStats::compute(&[]);
        assert_eq!(stats.total_profiles, 0);
        assert_eq!(stats.average_reel_views, 0);
        assert!(stats.top_influencer.is_none());
        assert!(stats.follower_ranges.is_empty());
    }

    #[test]
    fn test_totals_and_categories() {
        let profiles = vec![
            profile(1, Some("Creator"), 5_000, Some(100)),
            profile(2, Some("Creator"), 50_000, None),
            profile(3, Some("Business"), 2_000_000, Some(201)),
            profile(4, None, 500_000, Some(50)),
        ];
        let stats = ProfileStats::compute(&profiles);

        assert_eq!(stats.total_profiles, 4);
        assert_eq!(stats.total_followers, 2_555_000);
        assert_eq!(stats.average_followers, 638_750);
        // (100 + 0 + 201 + 50) / 4 = 87.75
        assert_eq!(stats.average_reel_views, 88);
        assert_eq!(stats.categories.get("Creator"), Some(&2));
        assert_eq!(stats.categories.get("Business"), Some(&1));
        assert_eq!(stats.categories.len(), 2);
        assert_eq!(stats.top_influencer.map(|p| p.id), Some(3));
        assert_eq!(
            stats.top_performers.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![3, 1, 4, 2]
        );
    }

    #[test]
    fn test_follower_ranges() {
        let profiles = vec![
            profile(1, None, 9_999, Some(10)),
            profile(2, None, 10_000, Some(20)),
            profile(3, None, 1_000_000, Some(30)),
            profile(4, None, 99_999, Some(41)),
        ];
        let stats = ProfileStats::compute(&profiles);
        let ranges: Vec<(&str, u64, u64)> = stats
            .follower_ranges
            .iter()
            .map(|r| (r.range.label(), r.profile_count, r.average_reel_views))
            .collect();
        assert_eq!(
            ranges,
            vec![("< 10K", 1, 10), ("10K-100K", 2, 31), ("> 1M", 1, 30)]
        );
    }
}

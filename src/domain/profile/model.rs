use chrono::{DateTime, Utc};

/// A tracked social-media profile.
///
/// Counts are already normalized to numbers; the store may keep them as
/// display strings with separators (see [`parse_count`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub posts: u64,
    pub followers: u64,
    pub following: u64,
    pub introduction: Option<String>,
    pub profile_image: Option<String>,
    pub reels_analyzed: Option<u64>,
    pub highest_reel_views: Option<u64>,
    pub average_reel_views: Option<u64>,
    /// Visible to admins only.
    pub internal_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Drop fields the given audience may not see.
    pub fn redacted_for(mut self, is_admin: bool) -> Self {
        if !is_admin {
            self.internal_note = None;
        }
        self
    }
}

/// Admin-editable fields. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub introduction: Option<String>,
    pub internal_note: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.introduction.is_none()
            && self.internal_note.is_none()
    }
}

/// Parse a display count such as `"1,234,567"` by keeping only its digits.
/// Anything without digits counts as zero; overflow saturates.
pub fn parse_count(display: &str) -> u64 {
    display
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Render a count with thousands separators, the way the store keeps them.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,234,567"), 1_234_567);
        assert_eq!(parse_count("  98 765 "), 98_765);
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(parse_count(&format_count(7_654_321)), 7_654_321);
    }
}

//! Profile aggregate
//!
//! The tracked profile record, the listing query engine, analytics over
//! the record set, and the repository interface.

pub mod model;
pub mod query;
pub mod repository;
pub mod stats;

pub use model::{format_count, parse_count, Profile, ProfileUpdate};
pub use query::{ProfileQuery, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repository::{NewProfile, ProfileRepository};
pub use stats::{FollowerRange, ProfileStats, RangeStats};

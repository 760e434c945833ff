//! Domain layer: entities, query rules and repository interfaces.

pub mod account;
pub mod profile;
pub mod repositories;

pub use account::{Account, AccountRepository, Identity, NewAccount, Role};
pub use profile::{
    NewProfile, Profile, ProfileQuery, ProfileRepository, ProfileStats, ProfileUpdate, SortKey,
};
pub use repositories::RepositoryProvider;

pub use crate::shared::errors::{DomainError, DomainResult};

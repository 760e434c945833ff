//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{AccountRepository, ProfileRepository, RepositoryProvider};

use super::account_repository::SeaOrmAccountRepository;
use super::profile_repository::SeaOrmProfileRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    accounts: SeaOrmAccountRepository,
    profiles: SeaOrmProfileRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: SeaOrmAccountRepository::new(db.clone()),
            profiles: SeaOrmProfileRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn accounts(&self) -> &dyn AccountRepository {
        &self.accounts
    }

    fn profiles(&self) -> &dyn ProfileRepository {
        &self.profiles
    }
}

use async_trait::async_trait;

use super::{Account, Role};
use crate::shared::DomainResult;

/// Data needed to persist a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, account: NewAccount) -> DomainResult<Account>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Account>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>>;
    async fn count(&self) -> DomainResult<u64>;
}

//! Unified access to the per-aggregate repositories

use super::account::AccountRepository;
use super::profile::ProfileRepository;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let account = repos.accounts().find_by_username("admin").await?;
///     let profiles = repos.profiles().list_profiles().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn accounts(&self) -> &dyn AccountRepository;
    fn profiles(&self) -> &dyn ProfileRepository;
}

//! Profile directory use-cases

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    DomainError, DomainResult, Identity, Profile, ProfileQuery, ProfileStats, ProfileUpdate,
    RepositoryProvider, Role,
};
use crate::shared::PaginatedResult;

/// Read access for any authenticated caller; mutation is admin-only.
/// Results are redacted per caller before they leave this service.
pub struct ProfileService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ProfileService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(
        &self,
        query: &ProfileQuery,
        caller: &Identity,
    ) -> DomainResult<PaginatedResult<Profile>> {
        query.validate()?;

        let profiles = self.repos.profiles().list_profiles().await?;
        let page = query.apply(profiles);
        debug!(
            total = page.total,
            page = page.page,
            returned = page.items.len(),
            "Listed profiles"
        );

        let is_admin = caller.is_admin();
        Ok(page.map(|p| p.redacted_for(is_admin)))
    }

    pub async fn get(&self, id: i32, caller: &Identity) -> DomainResult<Profile> {
        self.repos
            .profiles()
            .find_by_id(id)
            .await?
            .map(|p| p.redacted_for(caller.is_admin()))
            .ok_or_else(|| DomainError::not_found("Profile", "id", id))
    }

    pub async fn update(
        &self,
        id: i32,
        update: ProfileUpdate,
        caller: &Identity,
    ) -> DomainResult<Profile> {
        caller.require_role(Role::Admin)?;

        if update.is_empty() {
            return Err(DomainError::Validation("no fields to update".into()));
        }
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::Validation("name must not be empty".into()));
        }

        let profile = self
            .repos
            .profiles()
            .update_profile(id, update)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile", "id", id))?;

        info!(profile_id = id, account_id = %caller.account_id, "Profile updated");
        Ok(profile)
    }

    /// Removing an id that does not exist is reported, not ignored.
    pub async fn delete(&self, id: i32, caller: &Identity) -> DomainResult<()> {
        caller.require_role(Role::Admin)?;

        if !self.repos.profiles().delete_profile(id).await? {
            return Err(DomainError::not_found("Profile", "id", id));
        }

        info!(profile_id = id, account_id = %caller.account_id, "Profile deleted");
        Ok(())
    }

    pub async fn stats(&self, caller: &Identity) -> DomainResult<ProfileStats> {
        let profiles: Vec<Profile> = self
            .repos
            .profiles()
            .list_profiles()
            .await?
            .into_iter()
            .map(|p| p.redacted_for(caller.is_admin()))
            .collect();

        Ok(ProfileStats::compute(&profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProfile, SortKey};
    use crate::infrastructure::database::{test_database, SeaOrmRepositoryProvider};

    fn identity(role: Role) -> Identity {
        Identity {
            account_id: "acc-1".into(),
            username: "tester".into(),
            role,
        }
    }

    async fn seeded(count: u64) -> (ProfileService, Arc<dyn RepositoryProvider>) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_database().await));
        for i in 1..=count {
            repos
                .profiles()
                .insert_profile(NewProfile {
                    name: format!("creator_{}", i),
                    category: Some(if i % 2 == 0 { "Creator" } else { "Business" }.into()),
                    followers: format!("{}", i * 1_000),
                    internal_note: Some(format!("note {}", i)),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        (ProfileService::new(repos.clone()), repos)
    }

    #[tokio::test]
    async fn test_list_pages_through_all_records() {
        let (service, _) = seeded(25).await;
        let user = identity(Role::User);

        let mut sizes = Vec::new();
        for page in 1..=4 {
            let query = ProfileQuery {
                page,
                ..Default::default()
            };
            let result = service.list(&query, &user).await.unwrap();
            assert_eq!(result.total, 25);
            assert_eq!(result.total_pages, 3);
            sizes.push(result.items.len());
        }
        assert_eq!(sizes, vec![12, 12, 1, 0]);
    }

    #[tokio::test]
    async fn test_list_sorts_and_redacts() {
        let (service, _) = seeded(3).await;

        let result = service
            .list(&ProfileQuery::default(), &identity(Role::User))
            .await
            .unwrap();
        let ids: Vec<i32> = result.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(result.items.iter().all(|p| p.internal_note.is_none()));

        let as_admin = service
            .list(&ProfileQuery::default(), &identity(Role::Admin))
            .await
            .unwrap();
        assert!(as_admin.items.iter().all(|p| p.internal_note.is_some()));
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let (service, _) = seeded(1).await;
        let query = ProfileQuery {
            page: 0,
            sort_by: SortKey::CreatedAt,
            ..Default::default()
        };
        assert!(matches!(
            service.list(&query, &identity(Role::User)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_profile() {
        let (service, _) = seeded(1).await;
        assert!(matches!(
            service.get(99, &identity(Role::User)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_requires_admin() {
        let (service, repos) = seeded(5).await;
        let update = ProfileUpdate {
            name: Some("renamed".into()),
            ..Default::default()
        };

        let err = service
            .update(5, update.clone(), &identity(Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let stored = repos.profiles().find_by_id(5).await.unwrap().unwrap();
        assert_eq!(stored.name, "creator_5");

        let updated = service
            .update(5, update, &identity(Role::Admin))
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(
            service.get(5, &identity(Role::User)).await.unwrap().name,
            "renamed"
        );
    }

    #[tokio::test]
    async fn test_update_missing_and_blank_name() {
        let (service, _) = seeded(1).await;
        let admin = identity(Role::Admin);

        let missing = service
            .update(
                42,
                ProfileUpdate {
                    category: Some("Creator".into()),
                    ..Default::default()
                },
                &admin,
            )
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));

        let blank = service
            .update(
                1,
                ProfileUpdate {
                    name: Some("  ".into()),
                    ..Default::default()
                },
                &admin,
            )
            .await;
        assert!(matches!(blank, Err(DomainError::Validation(_))));

        let empty = service.update(1, ProfileUpdate::default(), &admin).await;
        assert!(matches!(empty, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, repos) = seeded(5).await;

        let forbidden = service.delete(5, &identity(Role::User)).await;
        assert!(matches!(forbidden, Err(DomainError::Forbidden(_))));
        assert!(repos.profiles().find_by_id(5).await.unwrap().is_some());

        service.delete(5, &identity(Role::Admin)).await.unwrap();
        assert!(repos.profiles().find_by_id(5).await.unwrap().is_none());

        let again = service.delete(5, &identity(Role::Admin)).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_stats() {
        let (service, _) = seeded(4).await;
        let stats = service.stats(&identity(Role::User)).await.unwrap();

        assert_eq!(stats.total_profiles, 4);
        assert_eq!(stats.total_followers, 10_000);
        assert_eq!(stats.categories.get("Creator"), Some(&2));
        let top = stats.top_influencer.unwrap();
        assert_eq!(top.id, 4);
        assert!(top.internal_note.is_none());
    }
}

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};

use crate::domain::{Account, AccountRepository, DomainError, DomainResult, NewAccount, Role};
use crate::infrastructure::database::entities::account::{self, AccountRole};

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: AccountRole) -> Role {
    match role {
        AccountRole::User => Role::User,
        AccountRole::Admin => Role::Admin,
    }
}

fn domain_role_to_entity(role: Role) -> AccountRole {
    match role {
        Role::User => AccountRole::User,
        Role::Admin => AccountRole::Admin,
    }
}

fn model_to_domain(model: account::Model) -> Account {
    Account {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn insert_err(e: DbErr, username: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("Username '{}' already exists", username))
        }
        _ => e.into(),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn create_account(&self, new: NewAccount) -> DomainResult<Account> {
        let now = Utc::now();
        let username = new.username.clone();

        let model = account::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            role: Set(domain_role_to_entity(new.role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &username))?;

        Ok(model_to_domain(inserted))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_domain))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(account::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    fn new_account(username: &str, role: Role) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SeaOrmAccountRepository::new(test_database().await);
        assert_eq!(repo.count().await.unwrap(), 0);

        let created = repo
            .create_account(new_account("admin", Role::Admin))
            .await
            .unwrap();
        assert_eq!(created.role, Role::Admin);
        assert_eq!(repo.count().await.unwrap(), 1);

        let by_name = repo.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "admin");
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = SeaOrmAccountRepository::new(test_database().await);
        repo.create_account(new_account("alice", Role::User))
            .await
            .unwrap();

        let err = repo
            .create_account(new_account("alice", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}

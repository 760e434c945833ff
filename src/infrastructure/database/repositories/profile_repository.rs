use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::profile::parse_count;
use crate::domain::{DomainResult, NewProfile, Profile, ProfileRepository, ProfileUpdate};
use crate::infrastructure::database::entities::profile;

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────
//
// Counts are normalized here, once, on the way out of the store.

fn stored_to_count(value: Option<i64>) -> Option<u64> {
    value.map(|v| u64::try_from(v).unwrap_or(0))
}

fn count_to_stored(value: Option<u64>) -> Option<i64> {
    value.map(|v| i64::try_from(v).unwrap_or(i64::MAX))
}

fn model_to_domain(model: profile::Model) -> Profile {
    Profile {
        id: model.id,
        name: model.name,
        category: model.category,
        posts: parse_count(&model.posts),
        followers: parse_count(&model.followers),
        following: parse_count(&model.following),
        introduction: model.introduction,
        profile_image: model.profile_image,
        reels_analyzed: stored_to_count(model.reels_analyzed),
        highest_reel_views: stored_to_count(model.highest_reel_views),
        average_reel_views: stored_to_count(model.average_reel_views),
        internal_note: model.internal_note,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn insert_profile(&self, new: NewProfile) -> DomainResult<Profile> {
        let now = Utc::now();

        let model = profile::ActiveModel {
            name: Set(new.name),
            category: Set(new.category),
            posts: Set(new.posts),
            followers: Set(new.followers),
            following: Set(new.following),
            introduction: Set(new.introduction),
            profile_image: Set(new.profile_image),
            reels_analyzed: Set(count_to_stored(new.reels_analyzed)),
            highest_reel_views: Set(count_to_stored(new.highest_reel_views)),
            average_reel_views: Set(count_to_stored(new.average_reel_views)),
            internal_note: Set(new.internal_note),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
        let models = profile::Entity::find()
            .order_by_asc(profile::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Profile>> {
        let model = profile::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> DomainResult<Option<Profile>> {
        let Some(existing) = profile::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: profile::ActiveModel = existing.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(category) = update.category {
            active.category = Set(Some(category));
        }
        if let Some(introduction) = update.introduction {
            active.introduction = Set(Some(introduction));
        }
        if let Some(note) = update.internal_note {
            active.internal_note = Set(Some(note));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete_profile(&self, id: i32) -> DomainResult<bool> {
        let result = profile::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    fn new_profile(name: &str, followers: &str) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            category: Some("Creator".to_string()),
            posts: "1,024".to_string(),
            followers: followers.to_string(),
            following: "87".to_string(),
            average_reel_views: Some(4_200),
            internal_note: Some("check contract".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_counts_are_normalized_on_read() {
        let repo = SeaOrmProfileRepository::new(test_database().await);
        let created = repo
            .insert_profile(new_profile("Alice", "1,234,567"))
            .await
            .unwrap();

        assert_eq!(created.followers, 1_234_567);
        assert_eq!(created.posts, 1_024);
        assert_eq!(created.following, 87);
        assert_eq!(created.average_reel_views, Some(4_200));
        assert_eq!(created.highest_reel_views, None);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = SeaOrmProfileRepository::new(test_database().await);
        for name in ["c", "a", "b"] {
            repo.insert_profile(new_profile(name, "10")).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let repo = SeaOrmProfileRepository::new(test_database().await);
        let created = repo.insert_profile(new_profile("Alice", "500")).await.unwrap();

        let update = ProfileUpdate {
            name: Some("X".to_string()),
            ..Default::default()
        };
        let updated = repo
            .update_profile(created.id, update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "X");
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.followers, created.followers);
        assert_eq!(updated.internal_note, created.internal_note);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let repo = SeaOrmProfileRepository::new(test_database().await);

        assert!(repo.find_by_id(99).await.unwrap().is_none());
        assert!(repo
            .update_profile(99, ProfileUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete_profile(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SeaOrmProfileRepository::new(test_database().await);
        let created = repo.insert_profile(new_profile("Alice", "500")).await.unwrap();

        assert!(repo.delete_profile(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}

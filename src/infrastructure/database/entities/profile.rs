//! Profile entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile model - one tracked social-media profile
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub category: Option<String>,

    /// Display counts, e.g. "1,234,567"
    pub posts: String,
    pub followers: String,
    pub following: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub introduction: Option<String>,

    pub profile_image: Option<String>,

    pub reels_analyzed: Option<i64>,
    pub highest_reel_views: Option<i64>,
    pub average_reel_views: Option<i64>,

    /// Admin-only
    #[sea_orm(column_type = "Text", nullable)]
    pub internal_note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

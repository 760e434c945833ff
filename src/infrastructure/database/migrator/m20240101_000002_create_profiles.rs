//! Migration to create profiles table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Profiles::Category).string_len(100).null())
                    .col(
                        ColumnDef::new(Profiles::Posts)
                            .string_len(32)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(Profiles::Followers)
                            .string_len(32)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(Profiles::Following)
                            .string_len(32)
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(Profiles::Introduction).text().null())
                    .col(ColumnDef::new(Profiles::ProfileImage).string().null())
                    .col(ColumnDef::new(Profiles::ReelsAnalyzed).big_integer().null())
                    .col(ColumnDef::new(Profiles::HighestReelViews).big_integer().null())
                    .col(ColumnDef::new(Profiles::AverageReelViews).big_integer().null())
                    .col(ColumnDef::new(Profiles::InternalNote).text().null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_category")
                    .table(Profiles::Table)
                    .col(Profiles::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    Name,
    Category,
    Posts,
    Followers,
    Following,
    Introduction,
    ProfileImage,
    ReelsAnalyzed,
    HighestReelViews,
    AverageReelViews,
    InternalNote,
    CreatedAt,
    UpdatedAt,
}

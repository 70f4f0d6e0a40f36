//! Migration to create the story_tags association table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StoryTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StoryTags::StoryId).big_integer().not_null())
                    .col(ColumnDef::new(StoryTags::TagId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(StoryTags::StoryId)
                            .col(StoryTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_tags_story_id")
                            .from(StoryTags::Table, StoryTags::StoryId)
                            .to(Stories::Table, Stories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_tags_tag_id")
                            .from(StoryTags::Table, StoryTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoryTags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StoryTags {
    Table,
    StoryId,
    TagId,
}

#[derive(DeriveIden)]
enum Stories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
}

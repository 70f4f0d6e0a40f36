//! Migration to create the timeline_events table.
//!
//! Timeline events are append-only; the importer relies on the
//! (story_id, event_type) lookup to decide whether an event already exists.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimelineEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimelineEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TimelineEvents::StoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimelineEvents::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimelineEvents::EventType).text().not_null())
                    .col(ColumnDef::new(TimelineEvents::EventInfo).text().null())
                    .col(
                        ColumnDef::new(TimelineEvents::CommentId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TimelineEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timeline_events_story_id")
                            .from(TimelineEvents::Table, TimelineEvents::StoryId)
                            .to(Stories::Table, Stories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timeline_events_author_id")
                            .from(TimelineEvents::Table, TimelineEvents::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timeline_events_comment_id")
                            .from(TimelineEvents::Table, TimelineEvents::CommentId)
                            .to(Comments::Table, Comments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Existence checks and comment counting filter on story + event type.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_timeline_events_story_type ON timeline_events (story_id, event_type)".to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_timeline_events_story_type")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TimelineEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimelineEvents {
    Table,
    Id,
    StoryId,
    AuthorId,
    EventType,
    EventInfo,
    CommentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Stories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
}

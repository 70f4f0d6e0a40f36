//! # Timeline Event Repository
//!
//! The timeline is the append-only record of story history. The import path
//! leans on it twice: once-per-story events go through the lookup-first
//! helper keyed on (story, event type), and comment replay uses the count of
//! existing `user_comment` events as its resume position.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::error::RepositoryError;
use crate::events::EventType;
use crate::models::timeline_event::{
    ActiveModel as TimelineEventActiveModel, Column, Entity as TimelineEvent,
    Model as TimelineEventModel,
};
use crate::repositories::get_or_create;

/// Field set for appending a timeline event.
#[derive(Debug, Clone)]
pub struct NewTimelineEvent {
    pub story_id: i64,
    pub author_id: i64,
    pub event_type: EventType,
    pub event_info: Option<String>,
    pub comment_id: Option<i64>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

impl NewTimelineEvent {
    fn into_active_model(self) -> TimelineEventActiveModel {
        TimelineEventActiveModel {
            story_id: Set(self.story_id),
            author_id: Set(self.author_id),
            event_type: Set(self.event_type.as_str().to_string()),
            event_info: Set(self.event_info),
            comment_id: Set(self.comment_id),
            created_at: Set(self.created_at),
            ..Default::default()
        }
    }
}

/// Repository for TimelineEvent database operations
pub struct TimelineEventRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TimelineEventRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// First event of the given type on the story, if any.
    pub async fn find_by_story_and_type(
        &self,
        story_id: i64,
        event_type: EventType,
    ) -> Result<Option<TimelineEventModel>, RepositoryError> {
        let event = TimelineEvent::find()
            .filter(Column::StoryId.eq(story_id))
            .filter(Column::EventType.eq(event_type.as_str()))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(event)
    }

    /// Number of events of the given type on the story.
    pub async fn count_by_story_and_type(
        &self,
        story_id: i64,
        event_type: EventType,
    ) -> Result<u64, RepositoryError> {
        let count = TimelineEvent::find()
            .filter(Column::StoryId.eq(story_id))
            .filter(Column::EventType.eq(event_type.as_str()))
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(count)
    }

    /// Append an event unconditionally.
    pub async fn create_event(
        &self,
        event: NewTimelineEvent,
    ) -> Result<TimelineEventModel, RepositoryError> {
        let result = event
            .into_active_model()
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Append the event only if the story has no event of that type yet.
    /// The boolean reports whether an insert happened.
    pub async fn get_or_create_event(
        &self,
        event: NewTimelineEvent,
    ) -> Result<(TimelineEventModel, bool), RepositoryError> {
        let select = TimelineEvent::find()
            .filter(Column::StoryId.eq(event.story_id))
            .filter(Column::EventType.eq(event.event_type.as_str()));

        get_or_create(self.db, select, event.into_active_model()).await
    }

    /// Full timeline of a story in insertion order.
    pub async fn list_for_story(
        &self,
        story_id: i64,
    ) -> Result<Vec<TimelineEventModel>, RepositoryError> {
        let events = TimelineEvent::find()
            .filter(Column::StoryId.eq(story_id))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{StoryRepository, UserRepository, story::StoryUpsert, user::CreateUserRequest};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, i64, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let (author, _) = UserRepository::new(&db)
            .get_or_create_user(CreateUserRequest {
                username: "author".to_string(),
                full_name: "Author".to_string(),
                email: "author@example.com".to_string(),
                openid: "https://login.launchpad.net/+id/author".to_string(),
            })
            .await
            .unwrap();

        StoryRepository::new(&db)
            .create_or_update(
                11,
                StoryUpsert {
                    title: "A story".to_string(),
                    description: "Details.".to_string(),
                    creator_id: author.id,
                    is_bug: true,
                    created_at: None,
                    updated_at: None,
                },
            )
            .await
            .unwrap();

        (db, 11, author.id)
    }

    fn event(story_id: i64, author_id: i64, event_type: EventType) -> NewTimelineEvent {
        NewTimelineEvent {
            story_id,
            author_id,
            event_type,
            event_info: None,
            comment_id: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_keyed_on_story_and_type() {
        let (db, story_id, author_id) = setup_test_db().await;
        let repo = TimelineEventRepository::new(&db);

        let (first, created) = repo
            .get_or_create_event(event(story_id, author_id, EventType::StoryCreated))
            .await
            .unwrap();
        assert!(created);

        let (again, created_again) = repo
            .get_or_create_event(event(story_id, author_id, EventType::StoryCreated))
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(again.id, first.id);

        // A different type on the same story still inserts.
        let (_, created_other) = repo
            .get_or_create_event(event(story_id, author_id, EventType::TaskCreated))
            .await
            .unwrap();
        assert!(created_other);
    }

    #[tokio::test]
    async fn test_count_and_ordering() {
        let (db, story_id, author_id) = setup_test_db().await;
        let repo = TimelineEventRepository::new(&db);

        for _ in 0..3 {
            repo.create_event(event(story_id, author_id, EventType::UserComment))
                .await
                .unwrap();
        }

        assert_eq!(
            repo.count_by_story_and_type(story_id, EventType::UserComment)
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            repo.count_by_story_and_type(story_id, EventType::StoryCreated)
                .await
                .unwrap(),
            0
        );

        let timeline = repo.list_for_story(story_id).await.unwrap();
        assert_eq!(timeline.len(), 3);
        assert!(timeline.windows(2).all(|w| w[0].id < w[1].id));
    }
}

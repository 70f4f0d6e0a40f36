//! # Story Repository
//!
//! Stories keep the external bug id as primary key, so the import upsert is
//! a plain find-by-id followed by create or update-in-place.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, Set};

use crate::error::RepositoryError;
use crate::models::story::{ActiveModel as StoryActiveModel, Entity as Story, Model as StoryModel};
use crate::models::story_tag::{ActiveModel as StoryTagActiveModel, Entity as StoryTag};
use crate::models::tag::{Entity as Tag, Model as TagModel};

/// Field set written on every story upsert.
#[derive(Debug, Clone)]
pub struct StoryUpsert {
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    pub is_bug: bool,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

/// Repository for Story database operations
pub struct StoryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StoryRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get story by ID
    pub async fn get_story_by_id(
        &self,
        story_id: i64,
    ) -> Result<Option<StoryModel>, RepositoryError> {
        let story = Story::find_by_id(story_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(story)
    }

    /// Create the story with the given id, or update its fields in place if
    /// it already exists. The boolean reports whether a new row was inserted.
    ///
    /// Updating on replay reconciles edits made on the external side between
    /// import runs.
    pub async fn create_or_update(
        &self,
        story_id: i64,
        fields: StoryUpsert,
    ) -> Result<(StoryModel, bool), RepositoryError> {
        match self.get_story_by_id(story_id).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.title = Set(fields.title);
                active.description = Set(fields.description);
                active.creator_id = Set(fields.creator_id);
                active.is_bug = Set(fields.is_bug);
                active.created_at = Set(fields.created_at);
                active.updated_at = Set(fields.updated_at);

                let updated = active
                    .update(self.db)
                    .await
                    .map_err(RepositoryError::database_error)?;

                Ok((updated, false))
            }
            None => {
                let fresh = StoryActiveModel {
                    id: Set(story_id),
                    title: Set(fields.title),
                    description: Set(fields.description),
                    creator_id: Set(fields.creator_id),
                    is_bug: Set(fields.is_bug),
                    created_at: Set(fields.created_at),
                    updated_at: Set(fields.updated_at),
                };

                let created = fresh
                    .insert(self.db)
                    .await
                    .map_err(RepositoryError::database_error)?;

                Ok((created, true))
            }
        }
    }

    /// Link a tag to a story, skipping the insert when the link exists.
    pub async fn attach_tag(&self, story_id: i64, tag_id: i64) -> Result<bool, RepositoryError> {
        let existing = StoryTag::find_by_id((story_id, tag_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if existing.is_some() {
            return Ok(false);
        }

        let link = StoryTagActiveModel {
            story_id: Set(story_id),
            tag_id: Set(tag_id),
        };
        link.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(true)
    }

    /// All tags linked to the given story.
    pub async fn tags_for_story(&self, story_id: i64) -> Result<Vec<TagModel>, RepositoryError> {
        let Some(story) = self.get_story_by_id(story_id).await? else {
            return Ok(Vec::new());
        };

        let tags = story
            .find_related(Tag)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{TagRepository, UserRepository, user::CreateUserRequest};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let (creator, _) = UserRepository::new(&db)
            .get_or_create_user(CreateUserRequest {
                username: "creator".to_string(),
                full_name: "Creator".to_string(),
                email: "creator@example.com".to_string(),
                openid: "https://login.launchpad.net/+id/creator".to_string(),
            })
            .await
            .unwrap();

        (db, creator.id)
    }

    fn fields(creator_id: i64, title: &str) -> StoryUpsert {
        StoryUpsert {
            title: title.to_string(),
            description: "Something is broken.".to_string(),
            creator_id,
            is_bug: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_update_in_place() {
        let (db, creator_id) = setup_test_db().await;
        let repo = StoryRepository::new(&db);

        let (story, created) = repo
            .create_or_update(1057477, fields(creator_id, "Initial title"))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(story.id, 1057477);

        let (updated, created_again) = repo
            .create_or_update(1057477, fields(creator_id, "Edited title"))
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(updated.id, 1057477);
        assert_eq!(updated.title, "Edited title");

        // Still a single row.
        let found = repo.get_story_by_id(1057477).await.unwrap().unwrap();
        assert_eq!(found.title, "Edited title");
    }

    #[tokio::test]
    async fn test_attach_tag_is_idempotent() {
        let (db, creator_id) = setup_test_db().await;
        let repo = StoryRepository::new(&db);

        let (story, _) = repo
            .create_or_update(7, fields(creator_id, "Tagged story"))
            .await
            .unwrap();
        let (tag, _) = TagRepository::new(&db)
            .get_or_create_tag("ui")
            .await
            .unwrap();

        assert!(repo.attach_tag(story.id, tag.id).await.unwrap());
        assert!(!repo.attach_tag(story.id, tag.id).await.unwrap());

        let tags = repo.tags_for_story(story.id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "ui");
    }
}

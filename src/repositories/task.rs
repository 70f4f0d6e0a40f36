//! # Task Repository

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::task::{
    ActiveModel as TaskActiveModel, Column, Entity as Task, Model as TaskModel,
};
use crate::repositories::get_or_create;

/// Field set used when a task has to be inserted.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub status: String,
    pub priority: String,
    pub assignee_id: Option<i64>,
    pub project_id: i64,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

/// Repository for Task database operations
pub struct TaskRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All tasks belonging to the given story.
    pub async fn find_by_story(&self, story_id: i64) -> Result<Vec<TaskModel>, RepositoryError> {
        let tasks = Task::find()
            .filter(Column::StoryId.eq(story_id))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tasks)
    }

    /// Returns the story's existing task, inserting one from `fields` only
    /// when the story has none. The boolean reports whether an insert
    /// happened.
    ///
    /// Existence is keyed on the story alone, so replays with edited task
    /// data still land on the original row.
    pub async fn get_or_create_for_story(
        &self,
        story_id: i64,
        fields: NewTask,
    ) -> Result<(TaskModel, bool), RepositoryError> {
        let select = Task::find().filter(Column::StoryId.eq(story_id));

        let fresh = TaskActiveModel {
            title: Set(fields.title),
            status: Set(fields.status),
            priority: Set(fields.priority),
            assignee_id: Set(fields.assignee_id),
            project_id: Set(fields.project_id),
            story_id: Set(story_id),
            created_at: Set(fields.created_at),
            updated_at: Set(fields.updated_at),
            ..Default::default()
        };

        get_or_create(self.db, select, fresh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        ProjectRepository, StoryRepository, UserRepository, project::CreateProjectRequest,
        story::StoryUpsert, user::CreateUserRequest,
    };
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, i64, i64) {
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

        let project = ProjectRepository::new(&db)
            .create_project(CreateProjectRequest {
                name: "nodepool".to_string(),
                description: None,
            })
            .await
            .unwrap();

        StoryRepository::new(&db)
            .create_or_update(
                42,
                StoryUpsert {
                    title: "A story".to_string(),
                    description: "Details.".to_string(),
                    creator_id: creator.id,
                    is_bug: true,
                    created_at: None,
                    updated_at: None,
                },
            )
            .await
            .unwrap();

        (db, 42, project.id)
    }

    fn fields(project_id: i64, title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            status: "todo".to_string(),
            priority: "medium".to_string(),
            assignee_id: None,
            project_id,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_one_task_per_story() {
        let (db, story_id, project_id) = setup_test_db().await;
        let repo = TaskRepository::new(&db);

        let (task, created) = repo
            .get_or_create_for_story(story_id, fields(project_id, "A story"))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(task.story_id, story_id);

        // A second call with different data must not add a row.
        let (again, created_again) = repo
            .get_or_create_for_story(story_id, fields(project_id, "Edited title"))
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(again.id, task.id);
        assert_eq!(again.title, "A story");

        let tasks = repo.find_by_story(story_id).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }
}

//! Flat resource records shaped for JSON request and response bodies.
//!
//! Every resource carries the persisted row's id and timestamps plus its
//! documented attribute set. The only behavior here is sample-value
//! generation for API docs and the timeline event's description resolution.

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::events::EventType;
use crate::models;
use crate::repositories::CommentRepository;

fn sample_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 1, 1, 16, 42, 0).unwrap()
}

/// Any user-supplied content attached to a story.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Option<i64>,
    /// The content of the comment
    pub content: Option<String>,
    /// Is this comment visible, or has it been soft-deleted
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn sample() -> Self {
        Self {
            id: Some(5),
            content: Some("A sample comment body".to_string()),
            is_active: Some(true),
            created_at: Some(sample_timestamp()),
        }
    }
}

impl From<models::comment::Model> for Comment {
    fn from(m: models::comment::Model) -> Self {
        Self {
            id: Some(m.id),
            content: Some(m.content),
            is_active: Some(m.is_active),
            created_at: m.created_at.map(|t| t.to_utc()),
        }
    }
}

/// Server system information, exposed unauthenticated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SystemInfo {
    /// The application version, as defined at build time
    pub version: String,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn sample() -> Self {
        Self {
            version: "338c2d6".to_string(),
        }
    }
}

/// A group of tasks, grouped around a single codebase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: Option<i64>,
    /// At least 3 alphanumeric symbols; minus and dot allowed as separators
    pub name: Option<String>,
    /// Details about the project codebase and usage
    pub description: Option<String>,
    /// Is this an active project, or has it been deleted
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn sample() -> Self {
        Self {
            id: Some(3),
            name: Some("StoryBoard".to_string()),
            description: Some("This is an awesome project".to_string()),
            is_active: Some(true),
            created_at: Some(sample_timestamp()),
        }
    }
}

impl From<models::project::Model> for Project {
    fn from(m: models::project::Model) -> Self {
        Self {
            id: Some(m.id),
            name: Some(m.name),
            description: m.description,
            is_active: Some(m.is_active),
            created_at: Some(m.created_at.to_utc()),
        }
    }
}

/// A group of projects presented together in the UI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectGroup {
    pub id: Option<i64>,
    /// The unique name of this project group
    pub name: Option<String>,
    /// The full name of this project group
    pub title: Option<String>,
}

impl ProjectGroup {
    pub fn sample() -> Self {
        Self {
            id: Some(1),
            name: Some("Infra".to_string()),
            title: Some("Awesome projects".to_string()),
        }
    }
}

/// A story is a catch-all by which tasks and comments are aggregated,
/// whether it is a bug report or a feature request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Story {
    pub id: Option<i64>,
    /// A descriptive label, up to 100 characters
    pub title: Option<String>,
    /// A complete description of the goal this story wants to achieve
    pub description: Option<String>,
    /// Is this a bug or a feature
    pub is_bug: Option<bool>,
    pub creator_id: Option<i64>,
    /// The number of tasks in each workflow state
    pub todo: Option<u64>,
    pub inprogress: Option<u64>,
    pub review: Option<u64>,
    pub merged: Option<u64>,
    pub invalid: Option<u64>,
    /// Derived overall state: active, merged, or invalid
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn sample() -> Self {
        Self {
            id: Some(425),
            title: Some("Use Storyboard to manage Storyboard".to_string()),
            description: Some("We should use Storyboard to manage Storyboard".to_string()),
            is_bug: Some(false),
            creator_id: Some(1),
            todo: Some(2),
            inprogress: Some(1),
            review: Some(1),
            merged: Some(0),
            invalid: Some(0),
            status: Some("active".to_string()),
            created_at: Some(sample_timestamp()),
            updated_at: Some(sample_timestamp()),
        }
    }

    /// Build the resource from a row plus the statuses of its tasks, folding
    /// the per-state counts and the derived story status in.
    pub fn from_model(story: models::story::Model, task_statuses: &[String]) -> Self {
        let count = |s: &str| task_statuses.iter().filter(|t| *t == s).count() as u64;
        let (todo, inprogress, review) = (count("todo"), count("inprogress"), count("review"));
        let (merged, invalid) = (count("merged"), count("invalid"));

        let status = if todo + inprogress + review > 0 {
            "active"
        } else if merged > 0 {
            "merged"
        } else {
            "invalid"
        };

        Self {
            id: Some(story.id),
            title: Some(story.title),
            description: Some(story.description),
            is_bug: Some(story.is_bug),
            creator_id: Some(story.creator_id),
            todo: Some(todo),
            inprogress: Some(inprogress),
            review: Some(review),
            merged: Some(merged),
            invalid: Some(invalid),
            status: Some(status.to_string()),
            created_at: story.created_at.map(|t| t.to_utc()),
            updated_at: story.updated_at.map(|t| t.to_utc()),
        }
    }
}

/// A task is an atomic unit of work within a story, targeting one project.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Option<i64>,
    /// An optional short label for the task
    pub title: Option<String>,
    /// One of: todo, inprogress, invalid, review, merged
    pub status: Option<String>,
    /// One of: low, medium, high
    pub priority: Option<String>,
    pub assignee_id: Option<i64>,
    pub project_id: Option<i64>,
    pub story_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn sample() -> Self {
        Self {
            id: Some(17),
            title: Some("Fix the registration form".to_string()),
            status: Some("todo".to_string()),
            priority: Some("medium".to_string()),
            assignee_id: None,
            project_id: Some(3),
            story_id: Some(425),
            created_at: Some(sample_timestamp()),
            updated_at: Some(sample_timestamp()),
        }
    }
}

impl From<models::task::Model> for Task {
    fn from(m: models::task::Model) -> Self {
        Self {
            id: Some(m.id),
            title: Some(m.title),
            status: Some(m.status),
            priority: Some(m.priority),
            assignee_id: m.assignee_id,
            project_id: Some(m.project_id),
            story_id: Some(m.story_id),
            created_at: m.created_at.map(|t| t.to_utc()),
            updated_at: m.updated_at.map(|t| t.to_utc()),
        }
    }
}

/// A group of users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub id: Option<i64>,
    /// The unique team name
    pub name: Option<String>,
    /// Details about the team
    pub description: Option<String>,
}

impl Team {
    pub fn sample() -> Self {
        Self {
            id: Some(2),
            name: Some("StoryBoard-core".to_string()),
            description: Some("Core reviewers of the StoryBoard project".to_string()),
        }
    }
}

/// One entry in a story's history of changes and comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeLineEvent {
    pub id: Option<i64>,
    pub story_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Enumerated kind, e.g. story_created or user_comment
    pub event_type: Option<String>,
    /// JSON-encoded details of the change
    pub event_info: Option<String>,
    pub comment_id: Option<i64>,
    /// The linked comment, populated by [`Self::resolve_event_values`]
    pub comment: Option<Comment>,
    /// Human-readable rendering of the event, populated on resolution
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TimeLineEvent {
    pub fn sample() -> Self {
        Self {
            id: Some(45543),
            story_id: Some(425),
            author_id: Some(1),
            event_type: Some(EventType::StoryCreated.as_str().to_string()),
            event_info: None,
            comment_id: None,
            comment: None,
            description: Some("Story created.".to_string()),
            created_at: Some(sample_timestamp()),
        }
    }

    /// Fill in the derived fields: loads the linked comment if there is one
    /// and renders the event description. Events of an unrecognized type are
    /// returned unchanged.
    pub async fn resolve_event_values(
        mut self,
        db: &DatabaseConnection,
    ) -> Result<Self, RepositoryError> {
        if let Some(comment_id) = self.comment_id {
            self.comment = CommentRepository::new(db)
                .get_comment_by_id(comment_id)
                .await?
                .map(Comment::from);
        }

        if let Some(kind) = self.event_type.as_deref().and_then(EventType::parse) {
            self.description = Some(kind.describe(self.event_info.as_deref()));
        }

        Ok(self)
    }
}

impl From<models::timeline_event::Model> for TimeLineEvent {
    fn from(m: models::timeline_event::Model) -> Self {
        Self {
            id: Some(m.id),
            story_id: Some(m.story_id),
            author_id: Some(m.author_id),
            event_type: Some(m.event_type),
            event_info: m.event_info,
            comment_id: m.comment_id,
            comment: None,
            description: None,
            created_at: m.created_at.map(|t| t.to_utc()),
        }
    }
}

/// A registered user, authenticated through a federated OpenID identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Option<i64>,
    /// A short unique name, used for login
    pub username: Option<String>,
    /// Full (Display) name
    pub full_name: Option<String>,
    /// The OpenID identity string, unique per user
    pub openid: Option<String>,
    /// Email address, not exposed to other users
    pub email: Option<String>,
    /// Whether this user has administrative rights
    pub is_superuser: Option<bool>,
    /// Whether this user is allowed to log in
    pub enable_login: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn sample() -> Self {
        Self {
            id: Some(42),
            username: Some("elbarto".to_string()),
            full_name: Some("Bart Simpson".to_string()),
            openid: Some("https://login.launchpad.net/+id/elbarto".to_string()),
            email: Some("skinnerstinks@springfield.net".to_string()),
            is_superuser: Some(false),
            enable_login: Some(true),
            last_login: Some(sample_timestamp()),
            created_at: Some(sample_timestamp()),
        }
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: Some(m.id),
            username: Some(m.username),
            full_name: Some(m.full_name),
            openid: Some(m.openid),
            email: Some(m.email),
            is_superuser: Some(m.is_superuser),
            enable_login: Some(m.enable_login),
            last_login: m.last_login.map(|t| t.to_utc()),
            created_at: Some(m.created_at.to_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        StoryRepository, TimelineEventRepository, UserRepository, story::StoryUpsert,
        timeline_event::NewTimelineEvent, user::CreateUserRequest,
    };
    use migration::MigratorTrait;
    use sea_orm::Database;

    #[test]
    fn test_samples_serialize() {
        for value in [
            serde_json::to_value(Comment::sample()).unwrap(),
            serde_json::to_value(Project::sample()).unwrap(),
            serde_json::to_value(ProjectGroup::sample()).unwrap(),
            serde_json::to_value(Story::sample()).unwrap(),
            serde_json::to_value(Task::sample()).unwrap(),
            serde_json::to_value(Team::sample()).unwrap(),
            serde_json::to_value(TimeLineEvent::sample()).unwrap(),
            serde_json::to_value(User::sample()).unwrap(),
            serde_json::to_value(SystemInfo::sample()).unwrap(),
        ] {
            assert!(value.is_object());
        }
    }

    #[test]
    fn test_story_status_derivation() {
        let model = models::story::Model {
            id: 1,
            title: "t".to_string(),
            description: "d".to_string(),
            creator_id: 1,
            is_bug: true,
            created_at: None,
            updated_at: None,
        };

        let active = Story::from_model(
            model.clone(),
            &["todo".to_string(), "merged".to_string()],
        );
        assert_eq!(active.status.as_deref(), Some("active"));
        assert_eq!(active.todo, Some(1));
        assert_eq!(active.merged, Some(1));

        let merged = Story::from_model(model.clone(), &["merged".to_string()]);
        assert_eq!(merged.status.as_deref(), Some("merged"));

        let invalid = Story::from_model(model, &["invalid".to_string()]);
        assert_eq!(invalid.status.as_deref(), Some("invalid"));
    }

    #[tokio::test]
    async fn test_resolve_event_values_loads_comment_and_description() {
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
                9,
                StoryUpsert {
                    title: "t".to_string(),
                    description: "d".to_string(),
                    creator_id: author.id,
                    is_bug: true,
                    created_at: None,
                    updated_at: None,
                },
            )
            .await
            .unwrap();

        let comment = crate::repositories::CommentRepository::new(&db)
            .create_comment("First!".to_string(), None)
            .await
            .unwrap();
        let event = TimelineEventRepository::new(&db)
            .create_event(NewTimelineEvent {
                story_id: 9,
                author_id: author.id,
                event_type: EventType::UserComment,
                event_info: None,
                comment_id: Some(comment.id),
                created_at: None,
            })
            .await
            .unwrap();

        let resolved = TimeLineEvent::from(event)
            .resolve_event_values(&db)
            .await
            .unwrap();
        assert_eq!(
            resolved.comment.and_then(|c| c.content).as_deref(),
            Some("First!")
        );
        assert!(resolved.description.is_some());

        // Unrecognized kinds stay unresolved.
        let unknown = TimeLineEvent {
            event_type: Some("something_new".to_string()),
            description: None,
            comment_id: None,
            ..TimeLineEvent::sample()
        };
        let unresolved = unknown.resolve_event_values(&db).await.unwrap();
        assert_eq!(unresolved.description, None);
    }
}

//! The Launchpad import writer.
//!
//! Writes one bug at a time into the local store. Every write is
//! lookup-first, keyed on the external bug id, so the whole import can be
//! re-run after a partial failure and will only fill in what is missing.
//! Comment replay resumes from the count of comment events already recorded
//! on the story.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use sea_orm::DatabaseConnection;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::error::ImportError;
use crate::events::EventType;
use crate::migrate::launchpad::openid::IdentityResolver;
use crate::migrate::launchpad::types::{LaunchpadBug, LaunchpadUser};
use crate::models::{project, story, tag, user};
use crate::repositories::{
    CommentRepository, ProjectRepository, StoryRepository, TagRepository, TaskRepository,
    TimelineEventRepository, story::StoryUpsert, task::NewTask, timeline_event::NewTimelineEvent,
    user::CreateUserRequest,
};

/// Story titles are capped at this width; longer titles are folded into the
/// description.
const TITLE_MAX: usize = 100;
const TITLE_TRUNCATED: usize = 97;

fn bug_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)$").unwrap())
}

/// Stateful writer for one import run against one target project.
///
/// The three caches only save round trips within the run; correctness across
/// runs comes from the persisted lookups underneath them.
pub struct LaunchpadWriter<'a, R: IdentityResolver> {
    db: &'a DatabaseConnection,
    resolver: &'a R,
    project: project::Model,
    /// Profile link -> resolved OpenID identity.
    openid_map: HashMap<String, String>,
    /// OpenID identity -> local user.
    user_map: HashMap<String, user::Model>,
    /// Tag name -> persisted tag.
    tag_map: HashMap<String, tag::Model>,
}

impl<'a, R: IdentityResolver> LaunchpadWriter<'a, R> {
    /// Binds the writer to the target project. The project must already
    /// exist; a missing project is a configuration error that aborts the
    /// whole run.
    pub async fn new(
        db: &'a DatabaseConnection,
        resolver: &'a R,
        project_name: &str,
    ) -> Result<Self, ImportError> {
        let project = ProjectRepository::new(db)
            .get_project_by_name(project_name)
            .await?
            .ok_or_else(|| ImportError::ProjectNotFound(project_name.to_string()))?;

        Ok(Self {
            db,
            resolver,
            project,
            openid_map: HashMap::new(),
            user_map: HashMap::new(),
            tag_map: HashMap::new(),
        })
    }

    pub fn project(&self) -> &project::Model {
        &self.project
    }

    /// The persisted tag with this name, from the run cache, the store, or
    /// a fresh insert, in that order.
    pub async fn build_tag(&mut self, name: &str) -> Result<tag::Model, ImportError> {
        if let Some(tag) = self.tag_map.get(name) {
            return Ok(tag.clone());
        }

        let (tag, _) = TagRepository::new(self.db).get_or_create_tag(name).await?;
        self.tag_map.insert(name.to_string(), tag.clone());

        Ok(tag)
    }

    /// Maps every tag name on the bug to a persisted tag.
    pub async fn write_tags(&mut self, bug: &LaunchpadBug) -> Result<Vec<tag::Model>, ImportError> {
        let mut tags = Vec::with_capacity(bug.tags.len());
        for name in &bug.tags {
            tags.push(self.build_tag(name).await?);
        }

        Ok(tags)
    }

    /// Resolves a Launchpad account to a local user, creating one on first
    /// encounter. `None` passes through so unassigned references stay
    /// unassigned.
    pub async fn write_user(
        &mut self,
        lp_user: Option<&LaunchpadUser>,
    ) -> Result<Option<user::Model>, ImportError> {
        match lp_user {
            Some(lp_user) => Ok(Some(self.resolve_user(lp_user).await?)),
            None => Ok(None),
        }
    }

    async fn resolve_user(&mut self, lp_user: &LaunchpadUser) -> Result<user::Model, ImportError> {
        let openid = match self.openid_map.get(&lp_user.web_link) {
            Some(openid) => openid.clone(),
            None => {
                let openid = match self.resolver.discover(&lp_user.web_link).await {
                    Ok(identity) => identity,
                    Err(error) => {
                        // Identity resolution is best-effort; a deterministic
                        // placeholder keeps re-runs mapping to the same user.
                        tracing::warn!(
                            account = %lp_user.name,
                            %error,
                            "OpenID discovery failed, using placeholder identity"
                        );
                        format!("http://example.com/invalid/~{}", lp_user.name)
                    }
                };
                self.openid_map
                    .insert(lp_user.web_link.clone(), openid.clone());
                openid
            }
        };

        if let Some(user) = self.user_map.get(&openid) {
            return Ok(user.clone());
        }

        let (user, created) = crate::repositories::UserRepository::new(self.db)
            .get_or_create_user(CreateUserRequest {
                username: lp_user.name.clone(),
                full_name: lp_user.display_name.clone(),
                // Temporary address until the user logs in themselves.
                email: format!("{}@example.com", lp_user.name),
                openid: openid.clone(),
            })
            .await?;
        if created {
            tracing::info!(account = %lp_user.name, user_id = user.id, "created user");
        }
        self.user_map.insert(openid, user.clone());

        Ok(user)
    }

    /// Imports one bug and its subtree. Returns `Ok(None)` when the bug's
    /// reference URL carries no usable id, which skips the bug and lets the
    /// run continue.
    pub async fn write_bug(
        &mut self,
        owner: &user::Model,
        assignee: Option<&user::Model>,
        priority: &str,
        status: &str,
        tags: &[tag::Model],
        bug: &LaunchpadBug,
    ) -> Result<Option<story::Model>, ImportError> {
        let Some(story_id) = extract_bug_id(&bug.self_link) else {
            tracing::error!(self_link = %bug.self_link, "no bug id in reference URL, skipping");
            return Ok(None);
        };

        let (title, description) = normalize_title(&bug.title, &bug.description);
        let created_at: Option<DateTimeWithTimeZone> =
            bug.date_created.map(|t| t.fixed_offset());
        let updated_at: Option<DateTimeWithTimeZone> =
            bug.date_last_updated.map(|t| t.fixed_offset());

        tracing::info!(story_id, title = %title, "importing bug");

        let stories = StoryRepository::new(self.db);
        let (story, _) = stories
            .create_or_update(
                story_id,
                StoryUpsert {
                    title,
                    description,
                    creator_id: owner.id,
                    is_bug: true,
                    created_at,
                    updated_at,
                },
            )
            .await?;

        for tag in tags {
            stories.attach_tag(story.id, tag.id).await?;
        }

        let (task, _) = TaskRepository::new(self.db)
            .get_or_create_for_story(
                story.id,
                NewTask {
                    title: story.title.clone(),
                    status: status.to_string(),
                    priority: priority.to_string(),
                    assignee_id: assignee.map(|a| a.id),
                    project_id: self.project.id,
                    created_at,
                    updated_at,
                },
            )
            .await?;

        let events = TimelineEventRepository::new(self.db);
        events
            .get_or_create_event(NewTimelineEvent {
                story_id: story.id,
                author_id: owner.id,
                event_type: EventType::StoryCreated,
                event_info: None,
                comment_id: None,
                created_at,
            })
            .await?;
        events
            .get_or_create_event(NewTimelineEvent {
                story_id: story.id,
                author_id: owner.id,
                event_type: EventType::TaskCreated,
                event_info: Some(
                    serde_json::json!({
                        "task_id": task.id,
                        "task_title": task.title,
                    })
                    .to_string(),
                ),
                comment_id: None,
                created_at,
            })
            .await?;

        self.write_comments(&story, bug).await?;

        Ok(Some(story))
    }

    /// Replays the bug's messages from wherever the last run stopped. The
    /// resume position is the number of comment events already on the story.
    async fn write_comments(
        &mut self,
        story: &story::Model,
        bug: &LaunchpadBug,
    ) -> Result<(), ImportError> {
        let events = TimelineEventRepository::new(self.db);
        let current = events
            .count_by_story_and_type(story.id, EventType::UserComment)
            .await? as usize;
        let desired = bug.messages.len();

        for (index, message) in bug.messages.iter().enumerate().skip(current) {
            tracing::info!("- Importing comment {} of {}", index + 1, desired);

            let author = self.resolve_user(&message.owner).await?;
            let message_time = message.date_created.map(|t| t.fixed_offset());

            let comment = CommentRepository::new(self.db)
                .create_comment(message.content.clone(), message_time)
                .await?;

            TimelineEventRepository::new(self.db)
                .create_event(NewTimelineEvent {
                    story_id: story.id,
                    author_id: author.id,
                    event_type: EventType::UserComment,
                    event_info: None,
                    comment_id: Some(comment.id),
                    created_at: message_time,
                })
                .await?;
        }

        Ok(())
    }
}

/// Trailing digits of the bug's canonical reference URL.
fn extract_bug_id(self_link: &str) -> Option<i64> {
    bug_id_pattern()
        .captures(self_link)
        .and_then(|c| c[1].parse().ok())
}

/// Folds an overlong title into the description so no text is lost.
fn normalize_title(title: &str, description: &str) -> (String, String) {
    if title.chars().count() <= TITLE_MAX {
        return (title.to_string(), description.to_string());
    }

    let truncated: String = title.chars().take(TITLE_TRUNCATED).chain("...".chars()).collect();
    (truncated, format!("{title}\n\n{description}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_bug_id() {
        assert_eq!(
            extract_bug_id("https://api.launchpad.net/1.0/bugs/1057477"),
            Some(1057477)
        );
        assert_eq!(extract_bug_id("https://api.launchpad.net/1.0/bugs/"), None);
        assert_eq!(extract_bug_id("not-a-reference"), None);
    }

    #[test]
    fn short_titles_pass_through() {
        let (title, description) = normalize_title("A short title", "The details.");
        assert_eq!(title, "A short title");
        assert_eq!(description, "The details.");
    }

    #[test]
    fn long_titles_are_folded_into_the_description() {
        let long: String = "x".repeat(120);
        let (title, description) = normalize_title(&long, "The details.");

        assert_eq!(title.chars().count(), TITLE_MAX);
        assert!(title.ends_with("..."));
        assert_eq!(&title[..TITLE_TRUNCATED], &long[..TITLE_TRUNCATED]);
        assert!(description.starts_with(&long));
        assert!(description.ends_with("The details."));
        assert!(description.contains("\n\n"));
    }

    #[test]
    fn exactly_one_hundred_chars_is_kept() {
        let exact: String = "y".repeat(100);
        let (title, description) = normalize_title(&exact, "d");
        assert_eq!(title, exact);
        assert_eq!(description, "d");
    }
}

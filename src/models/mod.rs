//! # Data Models
//!
//! This module contains the SeaORM entity models backing the StoryBoard
//! database schema.

pub mod comment;
pub mod project;
pub mod story;
pub mod story_tag;
pub mod tag;
pub mod task;
pub mod timeline_event;
pub mod user;

pub use comment::Entity as Comment;
pub use project::Entity as Project;
pub use story::Entity as Story;
pub use story_tag::Entity as StoryTag;
pub use tag::Entity as Tag;
pub use task::Entity as Task;
pub use timeline_event::Entity as TimelineEvent;
pub use user::Entity as User;

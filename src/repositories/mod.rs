//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities. All duplicate-sensitive writes go
//! through [`get_or_create`], which makes the lookup-before-create contract
//! uniform across entity kinds and keeps repeated import runs from creating
//! duplicate rows.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    Select,
};

use crate::error::RepositoryError;

pub mod comment;
pub mod project;
pub mod story;
pub mod tag;
pub mod task;
pub mod timeline_event;
pub mod user;

pub use comment::CommentRepository;
pub use project::ProjectRepository;
pub use story::StoryRepository;
pub use tag::TagRepository;
pub use task::TaskRepository;
pub use timeline_event::TimelineEventRepository;
pub use user::UserRepository;

/// Returns the row matched by `select`, inserting `fresh` only when the
/// lookup comes back empty. The boolean reports whether an insert happened.
///
/// This is the idempotency primitive of the import path: callers re-running
/// over the same input hit the lookup and never insert twice.
pub async fn get_or_create<A>(
    db: &DatabaseConnection,
    select: Select<A::Entity>,
    fresh: A,
) -> Result<(<A::Entity as EntityTrait>::Model, bool), RepositoryError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    if let Some(existing) = select
        .one(db)
        .await
        .map_err(RepositoryError::database_error)?
    {
        return Ok((existing, false));
    }

    let created = fresh
        .insert(db)
        .await
        .map_err(RepositoryError::database_error)?;

    Ok((created, true))
}

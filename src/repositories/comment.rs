//! # Comment Repository
//!
//! Comments have no natural external key, so they are never upserted here.
//! The import path controls duplication by counting comment events per
//! story before creating new rows.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::error::RepositoryError;
use crate::models::comment::{
    ActiveModel as CommentActiveModel, Entity as Comment, Model as CommentModel,
};

/// Repository for Comment database operations
pub struct CommentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get comment by ID
    pub async fn get_comment_by_id(
        &self,
        comment_id: i64,
    ) -> Result<Option<CommentModel>, RepositoryError> {
        let comment = Comment::find_by_id(comment_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(comment)
    }

    /// Create a new comment
    pub async fn create_comment(
        &self,
        content: String,
        created_at: Option<DateTimeWithTimeZone>,
    ) -> Result<CommentModel, RepositoryError> {
        let comment = CommentActiveModel {
            content: Set(content),
            is_active: Set(true),
            created_at: Set(created_at),
            ..Default::default()
        };

        let result = comment
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::Database;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let repo = CommentRepository::new(&db);

        let created = repo
            .create_comment("Confirmed on trunk as well.".to_string(), None)
            .await
            .unwrap();
        assert!(created.is_active);

        let found = repo.get_comment_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.content, "Confirmed on trunk as well.");

        assert!(repo.get_comment_by_id(9999).await.unwrap().is_none());
    }
}

//! # Tag Repository
//!
//! Tags are name-unique; creation always goes through the lookup-first
//! helper so repeated imports reuse the persisted row.

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::tag::{ActiveModel as TagActiveModel, Column, Entity as Tag, Model as TagModel};
use crate::repositories::get_or_create;

/// Repository for Tag database operations
pub struct TagRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TagRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get tag by its unique name
    pub async fn get_tag_by_name(&self, name: &str) -> Result<Option<TagModel>, RepositoryError> {
        let tag = Tag::find()
            .filter(Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tag)
    }

    /// Get the tag with the given name, creating it if it does not exist.
    /// The boolean reports whether a new row was inserted.
    pub async fn get_or_create_tag(
        &self,
        name: &str,
    ) -> Result<(TagModel, bool), RepositoryError> {
        let fresh = TagActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        get_or_create(self.db, Tag::find().filter(Column::Name.eq(name)), fresh).await
    }
}

//! # User Repository
//!
//! Users are looked up by OpenID; the import path only ever inserts through
//! the lookup-first helper so one identity maps to exactly one local user.

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::user::{
    ActiveModel as UserActiveModel, Column, Entity as User, Model as UserModel,
};
use crate::repositories::get_or_create;

/// Request data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub openid: String,
}

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, RepositoryError> {
        let user = User::find_by_id(user_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Get user by the OpenID identity string
    pub async fn get_user_by_openid(
        &self,
        openid: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let user = User::find()
            .filter(Column::Openid.eq(openid))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Get the user with the given OpenID, creating one from `request` if
    /// absent. The boolean reports whether a new row was inserted.
    pub async fn get_or_create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<(UserModel, bool), RepositoryError> {
        let select = User::find().filter(Column::Openid.eq(request.openid.clone()));

        let fresh = UserActiveModel {
            username: Set(request.username),
            full_name: Set(request.full_name),
            email: Set(request.email),
            openid: Set(request.openid),
            is_superuser: Set(false),
            enable_login: Set(true),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        get_or_create(self.db, select, fresh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn request(openid: &str, username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            full_name: format!("{username} (full name)"),
            email: format!("{username}@example.com"),
            openid: openid.to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_user_per_openid() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        let (first, created) = repo
            .get_or_create_user(request("https://login.launchpad.net/+id/abc", "elbarto"))
            .await
            .unwrap();
        assert!(created);
        assert!(!first.is_superuser);
        assert!(first.enable_login);

        // Same openid, different display data: must return the original row.
        let (second, created_again) = repo
            .get_or_create_user(request("https://login.launchpad.net/+id/abc", "other"))
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(second.id, first.id);
        assert_eq!(second.username, "elbarto");
    }

    #[tokio::test]
    async fn test_get_user_by_openid() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        assert!(
            repo.get_user_by_openid("http://example.com/invalid/~janitor")
                .await
                .unwrap()
                .is_none()
        );

        let (created, _) = repo
            .get_or_create_user(request("http://example.com/invalid/~janitor", "janitor"))
            .await
            .unwrap();

        let found = repo
            .get_user_by_openid("http://example.com/invalid/~janitor")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }
}

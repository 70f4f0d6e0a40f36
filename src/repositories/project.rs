//! # Project Repository

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::project::{
    ActiveModel as ProjectActiveModel, Column, Entity as Project, Model as ProjectModel,
};

/// Request data for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    /// Unique project name, also shown in URLs
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
}

/// Repository for Project database operations
pub struct ProjectRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new project
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<ProjectModel, RepositoryError> {
        self.validate_project_name(&request.name)?;

        let project = ProjectActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = project
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get project by ID
    pub async fn get_project_by_id(
        &self,
        project_id: i64,
    ) -> Result<Option<ProjectModel>, RepositoryError> {
        let project = Project::find_by_id(project_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(project)
    }

    /// Get project by its unique name
    pub async fn get_project_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ProjectModel>, RepositoryError> {
        let project = Project::find()
            .filter(Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(project)
    }

    /// Validate project name: at least 3 alphanumeric symbols, with minus
    /// and dot allowed as separators.
    fn validate_project_name(&self, name: &str) -> Result<(), RepositoryError> {
        if name.chars().filter(|c| c.is_alphanumeric()).count() < 3 {
            return Err(RepositoryError::validation_error(
                "Project name must contain at least 3 alphanumeric symbols",
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
        {
            return Err(RepositoryError::validation_error(
                "Project name can only contain letters, numbers, minus, and dot",
            ));
        }

        Ok(())
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

    #[tokio::test]
    async fn test_create_and_find_by_name() {
        let db = setup_test_db().await;
        let repo = ProjectRepository::new(&db);

        let created = repo
            .create_project(CreateProjectRequest {
                name: "nodepool".to_string(),
                description: Some("Node lifecycle manager".to_string()),
            })
            .await
            .unwrap();
        assert!(created.is_active);

        let found = repo.get_project_by_name("nodepool").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(created.id));

        let missing = repo.get_project_by_name("zuul").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_project_name_validation() {
        let db = setup_test_db().await;
        let repo = ProjectRepository::new(&db);

        let too_short = repo
            .create_project(CreateProjectRequest {
                name: "np".to_string(),
                description: None,
            })
            .await;
        assert!(too_short.is_err());

        let bad_chars = repo
            .create_project(CreateProjectRequest {
                name: "node pool!".to_string(),
                description: None,
            })
            .await;
        assert!(bad_chars.is_err());

        let with_separators = repo
            .create_project(CreateProjectRequest {
                name: "openstack-infra.nodepool".to_string(),
                description: None,
            })
            .await;
        assert!(with_separators.is_ok());
    }
}

//! # Error Handling
//!
//! This module provides the error types shared by the repository layer and
//! the Launchpad import writer.

use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("{0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl RepositoryError {
    /// Wrap a SeaORM error; used as `.map_err(RepositoryError::database_error)`.
    pub fn database_error(error: sea_orm::DbErr) -> Self {
        Self::Database(error)
    }

    pub fn validation_error<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}

/// Errors raised by the import writer.
///
/// Only a missing target project is fatal at construction time. Per-bug
/// problems (an unparseable external reference) are handled inside the
/// writer as skips, never as errors; everything else is a storage failure
/// that propagates and halts the run. Re-running the import resumes safely.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("local project '{0}' not found; create it before running the import")]
    ProjectNotFound(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_not_found_names_the_project() {
        let err = ImportError::ProjectNotFound("nodepool".to_string());
        assert!(err.to_string().contains("nodepool"));
    }

    #[test]
    fn repository_error_is_transparent() {
        let db_err = sea_orm::DbErr::RecordNotFound("story".to_string());
        let repo_err = RepositoryError::from(db_err);
        let import_err = ImportError::from(repo_err);
        assert!(import_err.to_string().contains("story"));
    }
}

//! Domain service for the category catalog.

use serde::Serialize;
use thiserror::Error;

use crate::domain::repositories::RepositoryError;
use crate::domain::{CategoryId, Page, PageRequest, ValidationError};
use crate::models::{Category, CategoryPatch};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category with ID {0} not found")]
    NotFound(CategoryId),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ValidationError> for CategoryError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(detail) => Self::Conflict(detail),
            other => Self::Database(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: u64,
}

#[async_trait::async_trait]
pub trait CategoryService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CategoryError::Conflict`] if a category with exactly this name
    /// exists, [`CategoryError::Validation`] for a malformed name or description.
    async fn create(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, CategoryError>;

    /// Active categories, name ascending.
    async fn list(&self, page: PageRequest) -> Result<Page<Category>, CategoryError>;

    /// # Errors
    ///
    /// Returns [`CategoryError::NotFound`] if no category has this id.
    async fn get(&self, id: CategoryId) -> Result<Category, CategoryError>;

    /// # Errors
    ///
    /// Returns [`CategoryError::NotFound`] for an unknown id and
    /// [`CategoryError::Conflict`] when renaming onto another category's name.
    async fn update(&self, id: CategoryId, patch: CategoryPatch)
    -> Result<Category, CategoryError>;

    /// Removes the category and deactivates the movies filed under it.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::NotFound`] for an unknown id and
    /// [`CategoryError::Conflict`] if nothing was deleted.
    async fn delete(&self, id: CategoryId) -> Result<(), CategoryError>;

    async fn stats(&self) -> Result<CategoryStats, CategoryError>;

    /// Every category, name ascending, without pagination.
    async fn list_all(&self) -> Result<Vec<Category>, CategoryError>;

    /// Inserts the built-in categories that are missing. Returns how many were added.
    async fn seed_defaults(&self) -> Result<usize, CategoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_conflict_or_database() {
        let conflict = CategoryError::from(RepositoryError::UniqueViolation("name".to_string()));
        assert!(matches!(conflict, CategoryError::Conflict(_)));

        let db = CategoryError::from(RepositoryError::Database("disk I/O error".to_string()));
        assert!(matches!(db, CategoryError::Database(ref msg) if msg.contains("disk I/O")));

        let unsaved = CategoryError::from(RepositoryError::Unsaved);
        assert!(matches!(unsaved, CategoryError::Database(_)));
    }
}

//! Domain service for the movie catalog.
//!
//! Listing goes through the filter/pagination engine; creation and updates
//! check the referenced category before anything is written.

use thiserror::Error;

use crate::domain::repositories::RepositoryError;
use crate::domain::{CategoryId, MovieFilters, MovieId, Page, ValidationError};
use crate::models::{Category, Movie, MoviePatch, NewMovie};

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie with ID {0} not found")]
    NotFound(MovieId),

    #[error("Category with ID {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ValidationError> for MovieError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RepositoryError> for MovieError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(detail) => Self::Conflict(detail),
            other => Self::Database(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MovieError::CategoryNotFound`] if the category does not exist and
    /// [`MovieError::Validation`] if a field breaks a catalog rule.
    async fn create(&self, input: NewMovie) -> Result<Movie, MovieError>;

    /// Filters and paginates active movies, newest release first.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Validation`] for out-of-range filter or page values.
    async fn list(&self, filters: MovieFilters) -> Result<Page<Movie>, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the movie does not exist or was deleted.
    async fn get(&self, id: MovieId) -> Result<Movie, MovieError>;

    async fn update(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, MovieError>;

    /// Soft delete. Deleting an already inactive movie succeeds again.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] only if the id was never stored.
    async fn delete(&self, id: MovieId) -> Result<Movie, MovieError>;

    /// Active movies released inside the new-release window.
    async fn new_releases(&self) -> Result<Vec<Movie>, MovieError>;

    /// Categories a movie can be filed under, name ascending.
    async fn categories(&self) -> Result<Vec<Category>, MovieError>;
}

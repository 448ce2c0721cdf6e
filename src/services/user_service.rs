//! Domain service for users and their viewed movies.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::repositories::RepositoryError;
use crate::domain::{MovieId, Page, PageRequest, UserId, ValidationError};
use crate::models::{User, UserMovie, UserWithMovies, ViewingDetails};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with ID {0} not found")]
    NotFound(UserId),

    #[error("Movie with ID {0} not found")]
    MovieNotFound(MovieId),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for UserError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RepositoryError> for UserError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(detail) => Self::Conflict(detail),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Sign-up data with the plain-text password.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<String>,
}

/// Partial profile update. A new password is hashed before it is stored.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<String>,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`UserError::Conflict`] if the email is already registered and
    /// [`UserError::Validation`] for malformed fields.
    async fn create(&self, input: RegisterUser) -> Result<User, UserError>;

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if the user does not exist or was deleted.
    async fn get(&self, id: UserId) -> Result<User, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::Conflict`] if the new email belongs to another user.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError>;

    /// Soft delete; repeating it succeeds.
    async fn delete(&self, id: UserId) -> Result<User, UserError>;

    /// Records that `user_id` watched `movie_id`.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] / [`UserError::MovieNotFound`] for unknown
    /// ids and [`UserError::Conflict`] if the pair is already recorded.
    async fn mark_viewed(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        details: ViewingDetails,
    ) -> Result<UserMovie, UserError>;

    /// Most recently viewed first.
    async fn viewed_movies(
        &self,
        user_id: UserId,
        only_favorites: bool,
    ) -> Result<Vec<UserMovie>, UserError>;

    /// Active users with at least one viewed movie, by first name.
    async fn users_with_movies(&self) -> Result<Vec<UserWithMovies>, UserError>;
}

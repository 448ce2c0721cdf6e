//! Persistence contracts.
//!
//! Services only talk to storage through these traits. The `SeaORM` implementations
//! live in `crate::db::repositories`; unit tests substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use super::{CategoryId, MovieId, MovieQuery, Page, PageRequest, UserId};
use crate::models::{Category, Movie, User, UserMovie, ViewedMovie};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store rejected a write because of a unique index. Always a conflict.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Cannot update an entity that has not been saved")]
    Unsaved,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::UniqueViolation(detail),
            _ => Self::Database(err.to_string()),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Stores a new category and returns it with its id.
    async fn insert(&self, category: &Category) -> RepoResult<Category>;

    async fn update(&self, category: &Category) -> RepoResult<Category>;

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;

    /// Exact, case-sensitive name lookup.
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;

    /// Active categories, name ascending.
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Category>>;

    async fn list_all(&self) -> RepoResult<Vec<Category>>;

    async fn count_active(&self) -> RepoResult<u64>;

    /// Deactivates the category's movies and removes the category in one
    /// transaction. Returns the number of category rows deleted.
    async fn delete(&self, id: CategoryId, now: DateTime<Utc>) -> RepoResult<u64>;
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn insert(&self, movie: &Movie) -> RepoResult<Movie>;

    /// Writes every field except `is_active`; only [`Self::deactivate`] changes it.
    async fn update(&self, movie: &Movie) -> RepoResult<Movie>;

    /// Marks an active movie inactive. Returns the number of rows changed.
    async fn deactivate(&self, id: MovieId, now: DateTime<Utc>) -> RepoResult<u64>;

    /// Looks a movie up whether or not it is active.
    async fn find_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>>;

    async fn find_active_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>>;

    /// Active movies matching `query`, release date descending.
    async fn search(&self, query: &MovieQuery) -> RepoResult<Page<Movie>>;

    /// Active movies released strictly after `after`, newest first.
    async fn released_after(&self, after: NaiveDate) -> RepoResult<Vec<Movie>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> RepoResult<User>;

    /// Writes every field except `is_active`.
    async fn update(&self, user: &User) -> RepoResult<User>;

    async fn deactivate(&self, id: UserId, now: DateTime<Utc>) -> RepoResult<u64>;

    /// Looks a user up whether or not it is active.
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    async fn find_active_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Lookup by normalized (lower-case) email, active or not.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Active users, newest first.
    async fn list_active(&self, page: PageRequest) -> RepoResult<Page<User>>;

    async fn find_active_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<User>>;
}

#[async_trait]
pub trait UserMovieRepository: Send + Sync {
    async fn insert(&self, record: &UserMovie) -> RepoResult<UserMovie>;

    async fn find_by_pair(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> RepoResult<Option<UserMovie>>;

    /// Every record of one user, most recently viewed first.
    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<UserMovie>>;

    /// Every record joined with its movie, most recently viewed first.
    async fn list_with_movies(&self) -> RepoResult<Vec<ViewedMovie>>;
}

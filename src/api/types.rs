use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryId, MovieId, UserId, UserMovieId};
use crate::models::{Category, Movie, User, UserMovie, UserWithMovies, ViewedMovie};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Option<CategoryId>,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            display_name: category.display_name(),
            id: category.id,
            name: category.name,
            description: category.description,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Movie with its derived fields evaluated against `today`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub id: Option<MovieId>,
    pub title: String,
    pub description: String,
    pub synopsis: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i32,
    pub duration_formatted: String,
    pub rating: String,
    pub director: String,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub country: String,
    pub language: String,
    pub category_id: CategoryId,
    pub is_active: bool,
    pub is_new_release: bool,
    pub is_classic: bool,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieDto {
    #[must_use]
    pub fn from_movie(movie: Movie, today: NaiveDate) -> Self {
        Self {
            duration_formatted: movie.duration_formatted(),
            is_new_release: movie.is_new_release(today),
            is_classic: movie.is_classic(today),
            id: movie.id,
            title: movie.title,
            description: movie.description,
            synopsis: movie.synopsis,
            release_date: movie.release_date,
            duration: movie.duration,
            rating: movie.rating,
            director: movie.director,
            cast: movie.cast,
            genres: movie.genres,
            country: movie.country,
            language: movie.language,
            category_id: movie.category_id,
            is_active: movie.is_active,
            imdb_rating: movie.imdb_rating,
            poster: movie.poster,
            trailer: movie.trailer,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

/// Public view of a user. The password hash never leaves the service layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDto {
    #[must_use]
    pub fn from_user(user: User, today: NaiveDate) -> Self {
        Self {
            full_name: user.full_name(),
            age: user.age(today),
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth,
            avatar: user.avatar,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMovieDto {
    pub id: Option<UserMovieId>,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub viewed_at: DateTime<Utc>,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_favorite: bool,
    pub watch_time: Option<i32>,
    pub completed_movie: bool,
}

impl From<UserMovie> for UserMovieDto {
    fn from(record: UserMovie) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            movie_id: record.movie_id,
            viewed_at: record.viewed_at,
            rating: record.rating,
            review: record.review,
            is_favorite: record.is_favorite,
            watch_time: record.watch_time,
            completed_movie: record.completed_movie,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummaryDto {
    pub id: Option<MovieId>,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i32,
    pub rating: String,
    pub poster: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedMovieDto {
    #[serde(flatten)]
    pub record: UserMovieDto,
    pub movie: MovieSummaryDto,
}

impl From<ViewedMovie> for ViewedMovieDto {
    fn from(viewed: ViewedMovie) -> Self {
        Self {
            record: viewed.record.into(),
            movie: MovieSummaryDto {
                id: viewed.movie.id,
                title: viewed.movie.title,
                release_date: viewed.movie.release_date,
                duration: viewed.movie.duration,
                rating: viewed.movie.rating,
                poster: viewed.movie.poster,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithMoviesDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub movies: Vec<ViewedMovieDto>,
}

impl UserWithMoviesDto {
    #[must_use]
    pub fn from_report(entry: UserWithMovies, today: NaiveDate) -> Self {
        Self {
            user: UserDto::from_user(entry.user, today),
            movies: entry.movies.into_iter().map(ViewedMovieDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDeletedDto {
    pub message: String,
    pub movie_id: MovieId,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletedDto {
    pub message: String,
    pub user_id: UserId,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedMoviesParams {
    #[serde(default)]
    pub only_favorites: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Dates travel as `YYYY-MM-DD` strings and are parsed by the handler so a bad
/// value is reported as a validation error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub synopsis: String,
    pub release_date: String,
    pub duration: i32,
    pub rating: String,
    pub director: String,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub country: String,
    pub language: String,
    pub category_id: i32,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub synopsis: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<i32>,
    pub rating: Option<String>,
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub category_id: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkViewedRequest {
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_favorite: Option<bool>,
    pub watch_time: Option<i32>,
    pub completed_movie: Option<bool>,
}

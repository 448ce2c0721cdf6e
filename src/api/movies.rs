use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{parse_date, validate_category_id, validate_movie_id};
use super::{
    ApiError, ApiResponse, AppState, CategoryDto, CreateMovieRequest, MovieDeletedDto, MovieDto,
    UpdateMovieRequest,
};
use crate::domain::{CategoryId, MovieFilters, Page};
use crate::models::{MoviePatch, NewMovie};
use crate::services::MovieError;

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) | MovieError::CategoryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            MovieError::Validation(msg) => Self::validation(msg),
            MovieError::Conflict(msg) => Self::Conflict(msg),
            MovieError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

fn new_movie(payload: CreateMovieRequest) -> Result<NewMovie, ApiError> {
    Ok(NewMovie {
        release_date: parse_date("releaseDate", &payload.release_date)?,
        category_id: validate_category_id(payload.category_id)?,
        title: payload.title,
        description: payload.description,
        synopsis: payload.synopsis,
        duration: payload.duration,
        rating: payload.rating,
        director: payload.director,
        cast: payload.cast,
        genres: payload.genres,
        country: payload.country,
        language: payload.language,
        imdb_rating: payload.imdb_rating,
        poster: payload.poster,
        trailer: payload.trailer,
    })
}

fn movie_patch(payload: UpdateMovieRequest) -> Result<MoviePatch, ApiError> {
    let release_date = payload
        .release_date
        .as_deref()
        .map(|raw| parse_date("releaseDate", raw))
        .transpose()?;
    let category_id: Option<CategoryId> = payload
        .category_id
        .map(validate_category_id)
        .transpose()?;

    Ok(MoviePatch {
        title: payload.title,
        description: payload.description,
        synopsis: payload.synopsis,
        release_date,
        duration: payload.duration,
        rating: payload.rating,
        director: payload.director,
        cast: payload.cast,
        genres: payload.genres,
        country: payload.country,
        language: payload.language,
        category_id,
        imdb_rating: payload.imdb_rating,
        poster: payload.poster,
        trailer: payload.trailer,
    })
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MovieDto>>), ApiError> {
    let movie = state.movie_service.create(new_movie(payload)?).await?;
    let dto = MovieDto::from_movie(movie, state.clock.today());

    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

/// `GET /api/movies?search&categoryId&genre&year&rating&page&limit`
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<MovieFilters>,
) -> Result<Json<ApiResponse<Page<MovieDto>>>, ApiError> {
    let today = state.clock.today();
    let movies = state.movie_service.list(filters).await?;

    Ok(Json(ApiResponse::success(
        movies.map(|m| MovieDto::from_movie(m, today)),
    )))
}

pub async fn new_releases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let today = state.clock.today();
    let movies = state.movie_service.new_releases().await?;

    Ok(Json(ApiResponse::success(
        movies
            .into_iter()
            .map(|m| MovieDto::from_movie(m, today))
            .collect(),
    )))
}

pub async fn movie_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.movie_service.categories().await?;
    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryDto::from).collect(),
    )))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let id = validate_movie_id(id)?;
    let movie = state.movie_service.get(id).await?;
    Ok(Json(ApiResponse::success(MovieDto::from_movie(
        movie,
        state.clock.today(),
    ))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let id = validate_movie_id(id)?;
    let movie = state
        .movie_service
        .update(id, movie_patch(payload)?)
        .await?;

    Ok(Json(ApiResponse::success(MovieDto::from_movie(
        movie,
        state.clock.today(),
    ))))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDeletedDto>>, ApiError> {
    let id = validate_movie_id(id)?;
    let movie = state.movie_service.delete(id).await?;

    Ok(Json(ApiResponse::success(MovieDeletedDto {
        message: "Movie deleted successfully".to_string(),
        movie_id: id,
        deleted_at: movie.updated_at,
    })))
}

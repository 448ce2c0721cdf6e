use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{parse_date, validate_movie_id, validate_user_id};
use super::{
    ApiError, ApiResponse, AppState, CreateUserRequest, MarkViewedRequest, PageParams,
    UpdateUserRequest, UserDeletedDto, UserDto, UserMovieDto, UserWithMoviesDto,
    ViewedMoviesParams,
};
use crate::domain::{Page, PageRequest};
use crate::models::ViewingDetails;
use crate::services::{RegisterUser, UserChanges, UserError};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::MovieNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            UserError::Conflict(msg) => Self::Conflict(msg),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    raw.map(|value| parse_date(field, value)).transpose()
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let input = RegisterUser {
        date_of_birth: optional_date("dateOfBirth", payload.date_of_birth.as_deref())?,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password: payload.password,
        phone_number: payload.phone_number,
        avatar: payload.avatar,
    };

    let user = state.user_service.create(input).await?;
    let dto = UserDto::from_user(user, state.clock.today());

    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<Page<UserDto>>>, ApiError> {
    let page = PageRequest::new(params.page, params.limit)?;
    let today = state.clock.today();
    let users = state.user_service.list(page).await?;

    Ok(Json(ApiResponse::success(
        users.map(|u| UserDto::from_user(u, today)),
    )))
}

pub async fn users_with_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserWithMoviesDto>>>, ApiError> {
    let today = state.clock.today();
    let report = state.user_service.users_with_movies().await?;

    Ok(Json(ApiResponse::success(
        report
            .into_iter()
            .map(|entry| UserWithMoviesDto::from_report(entry, today))
            .collect(),
    )))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_user_id(id)?;
    let user = state.user_service.get(id).await?;
    Ok(Json(ApiResponse::success(UserDto::from_user(
        user,
        state.clock.today(),
    ))))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_user_id(id)?;
    let changes = UserChanges {
        date_of_birth: optional_date("dateOfBirth", payload.date_of_birth.as_deref())?,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password: payload.password,
        phone_number: payload.phone_number,
        avatar: payload.avatar,
    };

    let user = state.user_service.update(id, changes).await?;
    Ok(Json(ApiResponse::success(UserDto::from_user(
        user,
        state.clock.today(),
    ))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDeletedDto>>, ApiError> {
    let id = validate_user_id(id)?;
    let user = state.user_service.delete(id).await?;

    Ok(Json(ApiResponse::success(UserDeletedDto {
        message: "User deleted successfully".to_string(),
        user_id: id,
        deleted_at: user.updated_at,
    })))
}

/// `POST /api/users/{id}/movies/{movieId}/mark-viewed`; the body is optional.
pub async fn mark_viewed(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    payload: Option<Json<MarkViewedRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserMovieDto>>), ApiError> {
    let user_id = validate_user_id(user_id)?;
    let movie_id = validate_movie_id(movie_id)?;
    let Json(body) = payload.unwrap_or_default();

    let details = ViewingDetails {
        rating: body.rating,
        review: body.review,
        is_favorite: body.is_favorite,
        watch_time: body.watch_time,
        completed_movie: body.completed_movie,
    };

    let record = state
        .user_service
        .mark_viewed(user_id, movie_id, details)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(record.into())),
    ))
}

pub async fn viewed_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<ViewedMoviesParams>,
) -> Result<Json<ApiResponse<Vec<UserMovieDto>>>, ApiError> {
    let id = validate_user_id(id)?;
    let records = state
        .user_service
        .viewed_movies(id, params.only_favorites)
        .await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(UserMovieDto::from).collect(),
    )))
}

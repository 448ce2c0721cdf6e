use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_category_id;
use super::{
    ApiError, ApiResponse, AppState, CategoryDto, CreateCategoryRequest, PageParams,
    UpdateCategoryRequest,
};
use crate::domain::{Page, PageRequest};
use crate::models::CategoryPatch;
use crate::services::{CategoryError, CategoryStats};

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => Self::NotFound(err.to_string()),
            CategoryError::Conflict(msg) => Self::Conflict(msg),
            CategoryError::Validation(msg) => Self::validation(msg),
            CategoryError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryDto>>), ApiError> {
    let category = state
        .category_service
        .create(&payload.name, payload.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(category.into())),
    ))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<Page<CategoryDto>>>, ApiError> {
    let page = PageRequest::new(params.page, params.limit)?;
    let categories = state.category_service.list(page).await?;

    Ok(Json(ApiResponse::success(categories.map(CategoryDto::from))))
}

pub async fn category_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CategoryStats>>, ApiError> {
    let stats = state.category_service.stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    let id = validate_category_id(id)?;
    let category = state.category_service.get(id).await?;
    Ok(Json(ApiResponse::success(category.into())))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    let id = validate_category_id(id)?;
    let patch = CategoryPatch {
        name: payload.name,
        description: payload.description,
    };

    let category = state.category_service.update(id, patch).await?;
    Ok(Json(ApiResponse::success(category.into())))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_category_id(id)?;
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

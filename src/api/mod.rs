use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{Clock, SystemClock};
use crate::services::{
    Argon2PasswordHasher, CategoryService, DefaultCategoryService, DefaultMovieService,
    DefaultUserService, MovieService, UserService,
};

mod categories;
mod error;
mod movies;
mod observability;
mod system;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub category_service: Arc<dyn CategoryService>,

    pub movie_service: Arc<dyn MovieService>,

    pub user_service: Arc<dyn UserService>,

    pub clock: Arc<dyn Clock>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Wires the repositories and services on top of an open [`Store`].
#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    clock: Arc<dyn Clock>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let hasher = Arc::new(Argon2PasswordHasher::new(config.security.clone()));

    let category_service = Arc::new(DefaultCategoryService::new(
        store.categories(),
        clock.clone(),
    ));

    let movie_service = Arc::new(DefaultMovieService::new(
        store.movies(),
        store.categories(),
        clock.clone(),
    ));

    let user_service = Arc::new(DefaultUserService::new(
        store.users(),
        store.movies(),
        store.user_movies(),
        hasher,
        clock.clone(),
    ));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        category_service,
        movie_service,
        user_service,
        clock,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

/// Opens the database described by `config` (running migrations) and builds
/// the state with the system clock.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(
        config,
        store,
        Arc::new(SystemClock),
        prometheus_handle,
    ))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = create_api_router().with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories",
            post(categories::create_category).get(categories::list_categories),
        )
        .route("/categories/stats/summary", get(categories::category_stats))
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/movies",
            post(movies::create_movie).get(movies::list_movies),
        )
        .route("/movies/new-releases", get(movies::new_releases))
        .route("/movies/categories", get(movies::movie_categories))
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/with-movies", get(users::users_with_movies))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{id}/movies/{movie_id}/mark-viewed",
            post(users::mark_viewed),
        )
        .route("/users/{id}/movies", get(users::viewed_movies))
        .route("/system/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
}

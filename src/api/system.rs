//! System API endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// Liveness plus a database round-trip.
///
/// # Endpoint
/// `GET /api/system/health`
///
/// Answers `503` with `status: "degraded"` when the database cannot be reached.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database_ok = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    let (status, code) = if database_ok {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    let body = HealthResponse {
        status,
        database: if database_ok {
            "connected"
        } else {
            "disconnected"
        },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    };

    (code, Json(ApiResponse::success(body)))
}

//! REST API endpoints.
//!
//! Axum-based HTTP API over players, rounds, reviews and the
//! handicap calculations derived from them.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            StorageError::MissingName
            | StorageError::InvalidRound(_)
            | StorageError::InvalidReview(_) => ApiError::BadRequest(err.to_string()),
            StorageError::Io(_) | StorageError::Json(_) => {
                tracing::error!("Storage failure: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    use routes::{handicap, overview, players, reviews, rounds};

    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/players",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/api/players/:id",
            get(players::get_player).delete(players::delete_player),
        )
        .route("/api/players/:id/handicap", get(handicap::get_handicap))
        .route("/api/players/:id/history", get(handicap::get_history))
        .route(
            "/api/rounds",
            get(rounds::list_rounds).post(rounds::create_round),
        )
        .route(
            "/api/rounds/:id",
            axum::routing::put(rounds::update_round).delete(rounds::delete_round),
        )
        .route("/api/overview", get(overview::get_overview))
        .route(
            "/api/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/api/reviews/stats", get(reviews::course_stats))
        .route(
            "/api/reviews/:id",
            axum::routing::delete(reviews::delete_review),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

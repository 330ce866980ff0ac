pub mod handicap;
pub mod overview;
pub mod players;
pub mod reviews;
pub mod rounds;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub players: usize,
    pub rounds: usize,
    pub reviews: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let (players, rounds, reviews) = state.repo.counts()?;
    Ok(Json(HealthResponse {
        status: "ok",
        players,
        rounds,
        reviews,
    }))
}

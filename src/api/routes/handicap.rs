use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{calculate_handicap, calculate_handicap_history_in_window, rounds_to_use};
use crate::models::{HandicapBand, HandicapHistoryPoint, HandicapStatus, PlayerId};

#[derive(Debug, Serialize)]
pub struct HandicapResponse {
    pub player_id: String,
    /// Raw aggregator output: `0` below three rounds, `null` when not finite
    pub index: Option<f64>,
    pub handicap: HandicapStatus,
    pub band: Option<HandicapBand>,
    pub total_rounds: usize,
    /// How many of the best differentials were averaged
    pub rounds_used: Option<usize>,
}

pub async fn get_handicap(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HandicapResponse>, ApiError> {
    let id = PlayerId::from(id);
    state.repo.get_player(&id)?;
    let rounds = state.repo.rounds_for_player(&id)?;

    let index = calculate_handicap(&rounds);
    if !index.is_finite() {
        tracing::warn!(player_id = %id, "Handicap index is not finite");
    }
    let handicap = HandicapStatus::from_rounds(&rounds);

    Ok(Json(HandicapResponse {
        player_id: id.to_string(),
        index: index.is_finite().then_some(index),
        band: handicap.band(),
        handicap,
        total_rounds: rounds.len(),
        rounds_used: rounds_to_use(rounds.len()),
    }))
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub player_id: String,
    pub window_months: u32,
    pub points: Vec<HandicapHistoryPoint>,
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let id = PlayerId::from(id);
    state.repo.get_player(&id)?;
    let rounds = state.repo.rounds_for_player(&id)?;

    let today = Utc::now().date_naive();
    let points = calculate_handicap_history_in_window(&rounds, today, state.history_months);
    tracing::debug!(player_id = %id, points = points.len(), "Computed handicap history");

    Ok(Json(HistoryResponse {
        player_id: id.to_string(),
        window_months: state.history_months,
        points,
    }))
}

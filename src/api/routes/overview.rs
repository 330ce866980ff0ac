use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::build_overview;
use crate::models::PlayerOverview;

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub players: Vec<PlayerOverview>,
}

pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let players = state.repo.list_players()?;
    let rounds = state.repo.all_rounds()?;

    Ok(Json(OverviewResponse {
        players: build_overview(&players, &rounds),
    }))
}

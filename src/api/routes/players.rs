use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Player, PlayerId, PlayerStats};

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
}

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let players = state.repo.list_players()?;
    Ok(Json(PlayerListResponse { players }))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub favorite_course: Option<String>,
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let _guard = state.write_lock.lock().await;
    let player = state
        .repo
        .add_player(&req.name, req.favorite_course.as_deref())?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[derive(Debug, Serialize)]
pub struct PlayerDetailResponse {
    pub player: Player,
    pub stats: PlayerStats,
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let id = PlayerId::from(id);
    let player = state.repo.get_player(&id)?;
    let rounds = state.repo.rounds_for_player(&id)?;

    Ok(Json(PlayerDetailResponse {
        player,
        stats: PlayerStats::from_rounds(&rounds),
    }))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock.lock().await;
    state.repo.delete_player(&PlayerId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

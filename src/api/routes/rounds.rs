use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewRound, PlayerId, Round, RoundId};

#[derive(Debug, Deserialize)]
pub struct ListRoundsParams {
    pub player_id: Option<String>,
}

/// A round plus its unrounded differential for the round table.
#[derive(Debug, Serialize)]
pub struct RoundSummary {
    pub id: String,
    pub player_id: String,
    pub date: String,
    pub course: String,
    pub tee: String,
    pub rating: f64,
    pub slope: i32,
    pub score: i32,
    /// `null` when the stored slope makes it non-finite
    pub differential: Option<f64>,
}

impl From<&Round> for RoundSummary {
    fn from(round: &Round) -> Self {
        let differential = round.differential();
        Self {
            id: round.id.to_string(),
            player_id: round.player_id.to_string(),
            date: round.date.to_string(),
            course: round.course.clone(),
            tee: round.tee.clone(),
            rating: round.rating,
            slope: round.slope,
            score: round.score,
            differential: differential.is_finite().then_some(differential),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoundListResponse {
    pub rounds: Vec<RoundSummary>,
}

pub async fn list_rounds(
    State(state): State<AppState>,
    Query(params): Query<ListRoundsParams>,
) -> Result<Json<RoundListResponse>, ApiError> {
    let player_id = params
        .player_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("player_id is required".to_string()))?;

    let rounds = state.repo.rounds_for_player(&PlayerId::from(player_id))?;
    Ok(Json(RoundListResponse {
        rounds: rounds.iter().map(RoundSummary::from).collect(),
    }))
}

pub async fn create_round(
    State(state): State<AppState>,
    Json(new): Json<NewRound>,
) -> Result<(StatusCode, Json<RoundSummary>), ApiError> {
    let _guard = state.write_lock.lock().await;
    let round = state.repo.add_round(new)?;
    Ok((StatusCode::CREATED, Json(RoundSummary::from(&round))))
}

pub async fn update_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(new): Json<NewRound>,
) -> Result<Json<RoundSummary>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let round = state.repo.update_round(&RoundId::from(id), new)?;
    Ok(Json(RoundSummary::from(&round)))
}

pub async fn delete_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock.lock().await;
    state.repo.delete_round(&RoundId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, send, setup_test_state};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn round_body(player_id: &str, date: &str, score: i32, slope: i32) -> Value {
        json!({
            "player_id": player_id,
            "date": date,
            "course": "Kiawah Ocean",
            "tee": "Blue",
            "rating": 72.5,
            "slope": slope,
            "score": score,
        })
    }

    #[tokio::test]
    async fn test_list_rounds_requires_player_id() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/rounds").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("player_id is required"));
    }

    #[tokio::test]
    async fn test_create_and_list_rounds() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let player = state.repo.add_player("Nelly", None).unwrap();
        let pid = player.id.to_string();
        let app = build_router(state);

        let (status, created) = send(
            app.clone(),
            "POST",
            "/api/rounds",
            Some(round_body(&pid, "2026-09-01", 85, 130)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let diff = created["differential"].as_f64().unwrap();
        assert!((diff - 10.865).abs() < 0.001);

        send(
            app.clone(),
            "POST",
            "/api/rounds",
            Some(round_body(&pid, "2026-09-08", 90, 130)),
        )
        .await;

        let (status, json) = get_json(app, &format!("/api/rounds?player_id={}", pid)).await;
        assert_eq!(status, StatusCode::OK);
        let rounds = json["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0]["date"], "2026-09-08");
    }

    #[tokio::test]
    async fn test_create_round_zero_slope_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let player = state.repo.add_player("Nelly", None).unwrap();
        let app = build_router(state);

        let (status, json) = send(
            app,
            "POST",
            "/api/rounds",
            Some(round_body(player.id.as_str(), "2026-09-01", 85, 0)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"].as_str().unwrap().contains("Slope"));
    }

    #[tokio::test]
    async fn test_create_duplicate_round_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let player = state.repo.add_player("Nelly", None).unwrap();
        let app = build_router(state);
        let body = round_body(player.id.as_str(), "2026-09-01", 85, 130);

        let (status, _) = send(app.clone(), "POST", "/api/rounds", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(app, "POST", "/api/rounds", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_and_delete_round() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let player = state.repo.add_player("Nelly", None).unwrap();
        let app = build_router(state);
        let pid = player.id.to_string();

        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/rounds",
            Some(round_body(&pid, "2026-09-01", 85, 130)),
        )
        .await;
        let uri = format!("/api/rounds/{}", created["id"].as_str().unwrap());

        let (status, updated) = send(
            app.clone(),
            "PUT",
            &uri,
            Some(round_body(&pid, "2026-09-01", 83, 130)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["score"], 83);
        assert_eq!(updated["id"], created["id"]);

        let (status, _) = send(app.clone(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stored_zero_slope_differential_is_null() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let player = state.repo.add_player("Nelly", None).unwrap();

        // Written straight to disk, skipping validation like legacy data.
        let round = crate::models::Round::new(
            player.id.clone(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            "Old Course".to_string(),
            "White".to_string(),
            72.0,
            0,
            80,
        );
        crate::storage::JsonlWriter::for_entity(
            state.repo.config(),
            crate::storage::EntityType::Round,
        )
        .append(&round)
        .unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/rounds?player_id={}", player.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["rounds"][0]["differential"].is_null());
    }
}

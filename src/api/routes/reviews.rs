use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{CourseReview, CourseReviewStats, NewReview, ReviewId};

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<CourseReview>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let reviews = state.repo.list_reviews()?;
    Ok(Json(ReviewListResponse { reviews }))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(new): Json<NewReview>,
) -> Result<(StatusCode, Json<CourseReview>), ApiError> {
    let _guard = state.write_lock.lock().await;
    let review = state.repo.add_review(new)?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock.lock().await;
    state.repo.delete_review(&ReviewId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CourseStatsParams {
    pub course: Option<String>,
}

pub async fn course_stats(
    State(state): State<AppState>,
    Query(params): Query<CourseStatsParams>,
) -> Result<Json<CourseReviewStats>, ApiError> {
    let course = params
        .course
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("course is required".to_string()))?;

    state
        .repo
        .course_stats(&course)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No reviews for {}", course)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, send, setup_test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_review_lifecycle() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        for (difficulty, overall, weather) in [(4, 5, "Sunny"), (5, 4, "Windy")] {
            let (status, _) = send(
                app.clone(),
                "POST",
                "/api/reviews",
                Some(json!({
                    "course_name": "Whistling Straits",
                    "difficulty_rating": difficulty,
                    "weather": weather,
                    "overall_rating": overall,
                    "review_text": "Bunkers everywhere",
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = get_json(app.clone(), "/api/reviews").await;
        assert_eq!(status, StatusCode::OK);
        let reviews = json["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), 2);

        let (status, stats) = get_json(
            app.clone(),
            "/api/reviews/stats?course=whistling%20straits",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_reviews"], 2);
        assert_eq!(stats["avg_difficulty"], 4.5);
        assert_eq!(stats["avg_overall"], 4.5);

        let id = reviews[0]["id"].as_str().unwrap();
        let (status, _) = send(app.clone(), "DELETE", &format!("/api/reviews/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = get_json(app, "/api/reviews").await;
        assert_eq!(json["reviews"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_rating_out_of_range() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = send(
            app,
            "POST",
            "/api/reviews",
            Some(json!({
                "course_name": "Whistling Straits",
                "difficulty_rating": 9,
                "overall_rating": 3,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("difficulty_rating"));
    }

    #[tokio::test]
    async fn test_course_stats_missing_and_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, _) = get_json(app.clone(), "/api/reviews/stats").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(app, "/api/reviews/stats?course=Nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

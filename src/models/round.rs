//! Recorded golf rounds.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EntityId, PlayerId, RoundId};
use crate::calculate::calculate_differential;

/// Reasons a submitted round is rejected before it is stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Slope must be greater than 0, got {0}")]
    NonPositiveSlope(i32),

    #[error("Score must be greater than 0, got {0}")]
    NonPositiveScore(i32),

    #[error("Course rating must be a finite positive number, got {0}")]
    InvalidRating(f64),
}

/// A single 18-hole round as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,

    pub player_id: PlayerId,

    /// Day the round was played
    pub date: NaiveDate,

    pub course: String,

    /// Tee played (e.g. "Blue")
    pub tee: String,

    /// USGA course rating for the tee
    pub rating: f64,

    /// Slope rating for the tee, nominally 55-155
    pub slope: i32,

    /// Total strokes
    pub score: i32,

    pub created_at: DateTime<Utc>,
}

impl Round {
    pub fn new(
        player_id: PlayerId,
        date: NaiveDate,
        course: String,
        tee: String,
        rating: f64,
        slope: i32,
        score: i32,
    ) -> Self {
        Self {
            id: EntityId::random(),
            player_id,
            date,
            course,
            tee,
            rating,
            slope,
            score,
            created_at: Utc::now(),
        }
    }

    /// Unrounded score differential for this round.
    ///
    /// Not finite when the stored slope is 0.
    pub fn differential(&self) -> f64 {
        calculate_differential(self.score, self.rating, self.slope)
    }

    /// Key identifying a duplicate submission of the same round.
    pub fn fingerprint(&self) -> EntityId {
        EntityId::generate(&[
            self.player_id.as_str(),
            &self.date.to_string(),
            &self.course.to_lowercase(),
            &self.tee.to_lowercase(),
            &self.score.to_string(),
        ])
    }
}

/// A round as submitted by a user, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRound {
    pub player_id: PlayerId,
    pub date: NaiveDate,
    pub course: String,
    pub tee: String,
    pub rating: f64,
    pub slope: i32,
    pub score: i32,
}

impl NewRound {
    /// Parse the date field from its `YYYY-MM-DD` text form.
    pub fn parse_date(s: &str) -> Result<NaiveDate, RoundError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| RoundError::InvalidDate(s.to_string()))
    }

    /// Check the submission and turn it into a storable round.
    ///
    /// Course and tee names are trimmed. Only new submissions pass through
    /// here; rounds already on disk are never re-validated.
    pub fn validate(self) -> Result<Round, RoundError> {
        if self.player_id.as_str().trim().is_empty() {
            return Err(RoundError::MissingField("Player ID"));
        }
        let course = self.course.trim();
        if course.is_empty() {
            return Err(RoundError::MissingField("Course"));
        }
        let tee = self.tee.trim();
        if tee.is_empty() {
            return Err(RoundError::MissingField("Tee"));
        }
        if !self.rating.is_finite() || self.rating <= 0.0 {
            return Err(RoundError::InvalidRating(self.rating));
        }
        if self.slope <= 0 {
            return Err(RoundError::NonPositiveSlope(self.slope));
        }
        if self.score <= 0 {
            return Err(RoundError::NonPositiveScore(self.score));
        }

        Ok(Round::new(
            self.player_id,
            self.date,
            course.to_string(),
            tee.to_string(),
            self.rating,
            self.slope,
            self.score,
        ))
    }
}

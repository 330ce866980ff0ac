//! Derived handicap and performance models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Player, PlayerId, Round};
use crate::calculate::{calculate_handicap, round_to_tenth, MIN_ROUNDS};

/// One point on the handicap trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapHistoryPoint {
    /// Date of the round that produced this point
    pub date: NaiveDate,

    /// Handicap Index over every round up to and including this one
    pub handicap: f64,

    /// Number of rounds the index was computed from
    #[serde(rename = "sampleSize")]
    pub sample_size: usize,
}

/// Whether a player has enough rounds for a published index.
///
/// The aggregator returns `0.0` for fewer than three rounds, which is
/// indistinguishable from a genuine scratch index. Callers that display a
/// handicap should go through this type instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum HandicapStatus {
    NotYetAvailable,
    Available(f64),
}

impl HandicapStatus {
    pub fn from_rounds(rounds: &[Round]) -> Self {
        if rounds.len() < MIN_ROUNDS {
            HandicapStatus::NotYetAvailable
        } else {
            HandicapStatus::Available(calculate_handicap(rounds))
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            HandicapStatus::NotYetAvailable => None,
            HandicapStatus::Available(v) => Some(*v),
        }
    }

    pub fn band(&self) -> Option<HandicapBand> {
        self.value().map(HandicapBand::from_index)
    }
}

impl std::fmt::Display for HandicapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandicapStatus::NotYetAvailable => write!(f, "N/A"),
            HandicapStatus::Available(v) => write!(f, "{:.1}", v),
        }
    }
}

/// Display grouping for a handicap value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandicapBand {
    Elite,
    Low,
    Mid,
    High,
    Beginner,
}

impl HandicapBand {
    pub fn from_index(index: f64) -> Self {
        if index <= 5.0 {
            HandicapBand::Elite
        } else if index <= 10.0 {
            HandicapBand::Low
        } else if index <= 15.0 {
            HandicapBand::Mid
        } else if index <= 20.0 {
            HandicapBand::High
        } else {
            HandicapBand::Beginner
        }
    }
}

impl std::fmt::Display for HandicapBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandicapBand::Elite => write!(f, "elite"),
            HandicapBand::Low => write!(f, "low"),
            HandicapBand::Mid => write!(f, "mid"),
            HandicapBand::High => write!(f, "high"),
            HandicapBand::Beginner => write!(f, "beginner"),
        }
    }
}

/// Summary figures for one player's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub total_rounds: usize,

    /// Mean strokes, one decimal
    pub average_score: Option<f64>,

    /// Lowest total strokes
    pub best_score: Option<i32>,

    pub handicap: HandicapStatus,
}

impl PlayerStats {
    pub fn from_rounds(rounds: &[Round]) -> Self {
        let average_score = if rounds.is_empty() {
            None
        } else {
            let total: i64 = rounds.iter().map(|r| r.score as i64).sum();
            Some(round_to_tenth(total as f64 / rounds.len() as f64))
        };

        Self {
            total_rounds: rounds.len(),
            average_score,
            best_score: rounds.iter().map(|r| r.score).min(),
            handicap: HandicapStatus::from_rounds(rounds),
        }
    }
}

/// One row of the cross-player performance overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOverview {
    pub player_id: PlayerId,
    pub player_name: String,
    pub handicap: HandicapStatus,
    pub total_rounds: usize,
    pub last_course: Option<String>,
    pub last_score: Option<i32>,
    pub last_date: Option<NaiveDate>,
    pub favorite_course: Option<String>,
}

impl PlayerOverview {
    /// Build the overview row for `player` from that player's rounds.
    pub fn new(player: &Player, rounds: &[Round]) -> Self {
        let latest = rounds
            .iter()
            .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        Self {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            handicap: HandicapStatus::from_rounds(rounds),
            total_rounds: rounds.len(),
            last_course: latest.map(|r| r.course.clone()),
            last_score: latest.map(|r| r.score),
            last_date: latest.map(|r| r.date),
            favorite_course: player.favorite_course.clone(),
        }
    }
}

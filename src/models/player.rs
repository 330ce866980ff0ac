//! Player model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId};

/// A golfer whose rounds are tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Home or favourite course, shown on the overview
    #[serde(default)]
    pub favorite_course: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a player from user input.
    ///
    /// Returns `None` when the name is blank. A blank favourite course is
    /// stored as absent.
    pub fn new(name: &str, favorite_course: Option<&str>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let favorite_course = favorite_course
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Some(Self {
            id: EntityId::random(),
            name: name.to_string(),
            favorite_course,
            created_at: Utc::now(),
        })
    }
}

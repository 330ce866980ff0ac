//! Course reviews left by players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::{EntityId, ReviewId, RoundId};
use crate::calculate::round_to_tenth;

/// Lowest and highest star values for review ratings.
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Course name is required")]
    MissingCourse,

    #[error("{field} must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("Unknown weather: {0}")]
    UnknownWeather(String),
}

/// Playing conditions on the day of the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Foggy,
    Hot,
    Cold,
    Perfect,
}

impl Weather {
    pub const ALL: [Weather; 8] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Windy,
        Weather::Foggy,
        Weather::Hot,
        Weather::Cold,
        Weather::Perfect,
    ];
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weather::Sunny => "Sunny",
            Weather::Cloudy => "Cloudy",
            Weather::Rainy => "Rainy",
            Weather::Windy => "Windy",
            Weather::Foggy => "Foggy",
            Weather::Hot => "Hot",
            Weather::Cold => "Cold",
            Weather::Perfect => "Perfect",
        };
        f.write_str(s)
    }
}

impl FromStr for Weather {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weather::ALL
            .into_iter()
            .find(|w| w.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReviewError::UnknownWeather(s.to_string()))
    }
}

/// A stored course review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReview {
    pub id: ReviewId,

    /// Round the review was written for, if any
    #[serde(default)]
    pub round_id: Option<RoundId>,

    pub course_name: String,

    /// 1 (easy) to 5 (brutal)
    pub difficulty_rating: u8,

    pub weather: Weather,

    /// 1 to 5 stars
    pub overall_rating: u8,

    #[serde(default)]
    pub review_text: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A review as submitted, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(default)]
    pub round_id: Option<RoundId>,
    pub course_name: String,
    pub difficulty_rating: u8,
    #[serde(default)]
    pub weather: Weather,
    pub overall_rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
}

impl NewReview {
    pub fn validate(self) -> Result<CourseReview, ReviewError> {
        let course_name = self.course_name.trim();
        if course_name.is_empty() {
            return Err(ReviewError::MissingCourse);
        }
        check_stars("difficulty_rating", self.difficulty_rating)?;
        check_stars("overall_rating", self.overall_rating)?;

        let review_text = self
            .review_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(CourseReview {
            id: EntityId::random(),
            round_id: self.round_id,
            course_name: course_name.to_string(),
            difficulty_rating: self.difficulty_rating,
            weather: self.weather,
            overall_rating: self.overall_rating,
            review_text,
            created_at: Utc::now(),
        })
    }
}

fn check_stars(field: &'static str, value: u8) -> Result<(), ReviewError> {
    if (MIN_STARS..=MAX_STARS).contains(&value) {
        Ok(())
    } else {
        Err(ReviewError::RatingOutOfRange { field, value })
    }
}

/// Aggregated review figures for one course.
#[derive(Debug, Clone, Serialize)]
pub struct CourseReviewStats {
    pub course_name: String,
    pub total_reviews: usize,
    pub avg_difficulty: f64,
    pub avg_overall: f64,
    /// Matching reviews, newest first
    pub reviews: Vec<CourseReview>,
}

impl CourseReviewStats {
    /// Summarise the reviews whose course name matches `course_name`
    /// (case-insensitive). `None` when nothing matches.
    pub fn for_course(course_name: &str, reviews: &[CourseReview]) -> Option<Self> {
        let wanted = course_name.trim();
        let mut matching: Vec<CourseReview> = reviews
            .iter()
            .filter(|r| r.course_name.eq_ignore_ascii_case(wanted))
            .cloned()
            .collect();

        if matching.is_empty() {
            return None;
        }
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let n = matching.len() as f64;
        let avg_difficulty =
            matching.iter().map(|r| r.difficulty_rating as f64).sum::<f64>() / n;
        let avg_overall = matching.iter().map(|r| r.overall_rating as f64).sum::<f64>() / n;

        Some(Self {
            course_name: wanted.to_string(),
            total_reviews: matching.len(),
            avg_difficulty: round_to_tenth(avg_difficulty),
            avg_overall: round_to_tenth(avg_overall),
            reviews: matching,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_review(course: &str, difficulty: u8, overall: u8) -> NewReview {
        NewReview {
            round_id: None,
            course_name: course.to_string(),
            difficulty_rating: difficulty,
            weather: Weather::Windy,
            overall_rating: overall,
            review_text: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        let review = new_review(" Bethpage Black ", 5, 4).validate().unwrap();
        assert_eq!(review.course_name, "Bethpage Black");
        assert_eq!(review.weather, Weather::Windy);
    }

    #[test]
    fn test_validate_rejects_blank_course() {
        assert_eq!(
            new_review("  ", 3, 3).validate(),
            Err(ReviewError::MissingCourse)
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_stars() {
        assert_eq!(
            new_review("Augusta", 0, 3).validate(),
            Err(ReviewError::RatingOutOfRange {
                field: "difficulty_rating",
                value: 0
            })
        );
        assert!(new_review("Augusta", 3, 6).validate().is_err());
    }

    #[test]
    fn test_blank_review_text_dropped() {
        let mut new = new_review("Augusta", 3, 3);
        new.review_text = Some("   ".to_string());
        assert!(new.validate().unwrap().review_text.is_none());
    }

    #[test]
    fn test_weather_parse() {
        assert_eq!("rainy".parse::<Weather>().unwrap(), Weather::Rainy);
        assert_eq!("Perfect".parse::<Weather>().unwrap(), Weather::Perfect);
        assert!("Hail".parse::<Weather>().is_err());
    }

    #[test]
    fn test_stats_for_course() {
        let mut a = new_review("Pinehurst No. 2", 4, 5).validate().unwrap();
        let mut b = new_review("pinehurst no. 2", 3, 4).validate().unwrap();
        let c = new_review("Other", 1, 1).validate().unwrap();
        let mut d = new_review("Pinehurst No. 2", 4, 4).validate().unwrap();
        a.created_at -= Duration::days(2);
        b.created_at -= Duration::days(1);
        d.created_at -= Duration::days(3);

        let stats = CourseReviewStats::for_course("Pinehurst No. 2", &[a, b.clone(), c, d])
            .unwrap();

        assert_eq!(stats.total_reviews, 3);
        // (4 + 3 + 4) / 3 = 3.666.. -> 3.7
        assert_eq!(stats.avg_difficulty, 3.7);
        // (5 + 4 + 4) / 3 = 4.333.. -> 4.3
        assert_eq!(stats.avg_overall, 4.3);
        assert_eq!(stats.reviews[0].id, b.id);
    }

    #[test]
    fn test_stats_none_when_no_match() {
        let a = new_review("Augusta", 3, 3).validate().unwrap();
        assert!(CourseReviewStats::for_course("Oakmont", &[a]).is_none());
    }
}

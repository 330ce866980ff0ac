//! Handicap calculation engine.
//!
//! Pure functions over a player's rounds:
//! - Score differential per round
//! - USGA-style Handicap Index from the best differentials
//! - Handicap trend over a recent window for charting
//! - Cross-player performance overview
//!
//! Nothing here validates round values. A stored slope of 0 gives a
//! non-finite differential, and that value flows into the index as-is.

use std::cmp::Ordering;

use chrono::{Datelike, Days, Months, NaiveDate, Utc};

use crate::models::{HandicapHistoryPoint, Player, PlayerOverview, Round};

/// Slope rating of a course of standard difficulty.
pub const STANDARD_SLOPE: f64 = 113.0;

/// Multiplier applied to the averaged best differentials.
pub const ADJUSTMENT_FACTOR: f64 = 0.96;

/// Fewest rounds for which an index is published.
pub const MIN_ROUNDS: usize = 3;

/// Default length of the trend window.
pub const DEFAULT_HISTORY_MONTHS: u32 = 6;

/// Calculate the score differential: `(score - rating) * 113 / slope`.
///
/// The result is not rounded.
pub fn calculate_differential(score: i32, rating: f64, slope: i32) -> f64 {
    (score as f64 - rating) * STANDARD_SLOPE / slope as f64
}

/// Number of lowest differentials that count toward the index for a
/// player with `total_rounds` rounds. `None` below the minimum.
pub fn rounds_to_use(total_rounds: usize) -> Option<usize> {
    match total_rounds {
        0..=2 => None,
        3..=5 => Some(1),
        6..=8 => Some(2),
        9..=11 => Some(3),
        12..=14 => Some(4),
        15..=17 => Some(5),
        18 => Some(6),
        19 => Some(7),
        _ => Some(8),
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Lowest-first ordering for differentials.
///
/// NaN sorts ahead of every number so it always lands among the counted
/// differentials and shows up in the index.
fn best_first(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(b),
    }
}

/// Calculate the Handicap Index for a set of rounds.
///
/// Order of `rounds` does not matter. Returns `0.0` when fewer than
/// [`MIN_ROUNDS`] rounds are given; use
/// [`HandicapStatus`](crate::models::HandicapStatus) to tell that apart from
/// a computed zero.
pub fn calculate_handicap(rounds: &[Round]) -> f64 {
    let Some(count) = rounds_to_use(rounds.len()) else {
        return 0.0;
    };

    let mut differentials: Vec<f64> = rounds.iter().map(Round::differential).collect();
    differentials.sort_by(best_first);

    let best = &differentials[..count];
    let average = best.iter().sum::<f64>() / count as f64;

    round_to_tenth(average * ADJUSTMENT_FACTOR)
}

/// First day excluded from the trend window ending on `today`.
///
/// The month is stepped back first and the day of month re-applied after,
/// so a day past the end of the shorter month rolls into the next one:
/// 31 August minus six months is 3 March (2 March in a leap year).
pub fn history_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(today.day() - 1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Handicap trend over the last six months, as of `today`.
pub fn calculate_handicap_history(rounds: &[Round], today: NaiveDate) -> Vec<HandicapHistoryPoint> {
    calculate_handicap_history_in_window(rounds, today, DEFAULT_HISTORY_MONTHS)
}

/// Handicap trend over the last six months, as of the current UTC date.
pub fn calculate_handicap_history_now(rounds: &[Round]) -> Vec<HandicapHistoryPoint> {
    calculate_handicap_history(rounds, Utc::now().date_naive())
}

/// Handicap trend over the last `months` months, as of `today`.
///
/// Rounds are replayed in date order. Each round played after the cutoff
/// date emits a point holding the index over every round up to and
/// including it, once at least [`MIN_ROUNDS`] rounds have accumulated.
/// Older rounds still count toward later points.
pub fn calculate_handicap_history_in_window(
    rounds: &[Round],
    today: NaiveDate,
    months: u32,
) -> Vec<HandicapHistoryPoint> {
    if rounds.len() < MIN_ROUNDS {
        return Vec::new();
    }

    let mut sorted = rounds.to_vec();
    sorted.sort_by_key(|r| r.date);

    let cutoff = history_cutoff(today, months);

    sorted
        .iter()
        .enumerate()
        .filter(|(index, round)| round.date > cutoff && index + 1 >= MIN_ROUNDS)
        .map(|(index, round)| HandicapHistoryPoint {
            date: round.date,
            handicap: calculate_handicap(&sorted[..=index]),
            sample_size: index + 1,
        })
        .collect()
}

/// Build the performance overview across all players.
///
/// Rows are ordered by most recent round first; players without rounds go
/// last, alphabetically.
pub fn build_overview(players: &[Player], rounds: &[Round]) -> Vec<PlayerOverview> {
    let mut overview: Vec<PlayerOverview> = players
        .iter()
        .map(|player| {
            let player_rounds: Vec<Round> = rounds
                .iter()
                .filter(|r| r.player_id == player.id)
                .cloned()
                .collect();
            PlayerOverview::new(player, &player_rounds)
        })
        .collect();

    overview.sort_by(|a, b| match (a.last_date, b.last_date) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.player_name.cmp(&b.player_name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.player_name.cmp(&b.player_name),
    });

    overview
}

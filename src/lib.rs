//! # Golf Tracker
//!
//! Records golf rounds for a small group of players and derives a
//! simplified handicap index from score differentials.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, rounds, reviews, stats)
//! - **calculate**: Differential, handicap index and trend computation
//! - **storage**: JSONL files and the repository on top of them
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;

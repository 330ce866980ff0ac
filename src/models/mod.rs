//! Core data models for the golf tracker.

mod ids;
mod player;
mod review;
mod round;
mod stats;

pub use ids::*;
pub use player::*;
pub use review::*;
pub use round::*;
pub use stats::*;

//! Local filesystem storage.
//!
//! Players, rounds and reviews each live in one JSONL file under the
//! data directory. [`Repository`] provides keyed reads and writes on top.

use std::path::PathBuf;
use thiserror::Error;

mod jsonl;
mod repository;

pub use jsonl::*;
pub use repository::*;

use crate::models::{ReviewError, RoundError};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Duplicate round: {0}")]
    Duplicate(String),

    #[error("Name is required")]
    MissingName,

    #[error("Invalid round: {0}")]
    InvalidRound(#[from] RoundError),

    #[error("Invalid review: {0}")]
    InvalidReview(#[from] ReviewError),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path_for(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

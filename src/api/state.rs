use std::sync::Arc;

use crate::storage::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    /// Held across every mutating request; JSONL writes rewrite whole files.
    pub write_lock: Arc<tokio::sync::Mutex<()>>,
    /// Trend chart window in months
    pub history_months: u32,
}

impl AppState {
    pub fn new(repo: Repository, history_months: u32) -> Self {
        Self {
            repo: Arc::new(repo),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
            history_months,
        }
    }
}

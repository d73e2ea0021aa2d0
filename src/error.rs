//! Error types for level catalog construction and round commands
//!
//! Per-tick simulation never fails; only catalog lookups, state-machine
//! commands and the file loaders surface errors.

use crate::sim::RoundStatus;

/// Errors produced by catalog lookups, round commands and loaders.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A level index outside the catalog was requested.
    #[error("level index {index} out of range (catalog has {count} levels)")]
    InvalidLevelIndex { index: usize, count: usize },

    /// `advance_level` was called while not in `WonLevel`, or on the last level.
    #[error("no next level from level {level_index} (status {status:?})")]
    NoNextLevel {
        level_index: usize,
        status: RoundStatus,
    },

    /// A level definition failed validation when the catalog was built.
    #[error("level '{level}' is invalid: {reason}")]
    InvalidLevel { level: String, reason: String },

    /// A catalog needs at least one level.
    #[error("level catalog is empty")]
    EmptyCatalog,

    /// JSON for a catalog, tuning or high-score file failed to parse.
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid_level(level: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidLevel {
            level: level.to_string(),
            reason: reason.into(),
        }
    }
}

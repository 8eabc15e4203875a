//! Error types
//!
//! Only configuration problems are fatal. Missing rows are resolved inside the
//! simulation and store failures are swallowed by the score tracker.

use thiserror::Error;

/// Rejected game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("spawn weight `{name}` must be a finite non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },
    #[error("spawn weights sum to zero, no row layout can be chosen")]
    ZeroTotalWeight,
    #[error("spawn weights sum to {0}, which is not a finite number")]
    NonFiniteTotalWeight(f32),
    #[error("`{name}` must be a finite non-negative number, got {value}")]
    NegativeDuration { name: &'static str, value: f32 },
    #[error("jump duration must be a finite positive number, got {0}")]
    NonPositiveJumpDuration(f32),
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("at least one visible row is required")]
    NoVisibleRows,
    #[error("total row limit must be at least 1 when set")]
    ZeroTotalRows,
    #[error("settings could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reading or writing the persisted high score
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed high score data: {0}")]
    Format(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

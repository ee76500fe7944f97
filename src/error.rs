//! Error type shared by every stage of fixture generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FixtureError>;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("auxiliary input line {line}: {reason}")]
    Auxiliary { line: usize, reason: String },

    #[error("regression check failed: {0}")]
    Regression(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown fixture: {0}")]
    UnknownFixture(String),
}

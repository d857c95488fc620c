//! Error handling

use std::path::PathBuf;

use thiserror::Error;

pub type DetectorResult<T> = Result<T, DetectorError>;

/// Errors surfaced by the detection engine
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Malformed or missing request payload
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Empty or malformed training batch
    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    /// Scoring against a missing, degenerate or mismatched forest
    #[error("model state error: {0}")]
    ModelState(String),

    /// Rejected detector parameters
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the model store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("model artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize model: {0}")]
    Serialize(serde_json::Error),

    #[error("model artifact is corrupt: {0}")]
    Corruption(String),
}

//! Error types for itemset mining

use thiserror::Error;

/// Result type alias using `MiningError`
pub type Result<T> = std::result::Result<T, MiningError>;

/// Errors raised before or around a mining run.
///
/// The growth engine itself is total; every error here comes from
/// configuration or from reading and writing data.
#[derive(Error, Debug)]
pub enum MiningError {
    /// Missing or inconsistent run parameter
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Threshold text that is neither a count nor a fraction
    #[error("invalid threshold: {0:?}")]
    InvalidThreshold(String),

    /// A record that cannot be parsed into items, timestamps or probabilities
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MiningError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        MiningError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

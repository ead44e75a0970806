//! Error types for loading, binning and aggregating ensembles

use std::path::PathBuf;

/// Errors produced by the ensemble core
#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    /// Malformed input line (non-numeric field, inconsistent column count)
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Invalid configuration or an ensemble that cannot be combined
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A (key, column) pair has no value left after the missing-value policy
    #[error("no values to average for key {key} in column {column}")]
    EmptyGroup { key: f64, column: usize },

    /// Key that the active bin scheme cannot map
    #[error("key {key} is outside the domain of {scheme} binning")]
    KeyOutOfDomain { key: f64, scheme: &'static str },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnsembleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        EnsembleError::Configuration(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EnsembleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnsembleError>;

//! Error types for point cloud loading

use thiserror::Error;

/// Errors that abort a whole load
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be opened or read. Callers degrade by skipping
    /// everything that needs the cloud.
    #[error("Point cloud data unavailable at {path}: {source}")]
    DataUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors for a single record; malformed records are skipped by the loader
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, RecordError::Malformed { .. })
    }
}

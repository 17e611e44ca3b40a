//! Error handling for CSV adaptation operations.
//!
//! Distinguishes per-file failures, which skip the file and let the batch
//! continue, from resource-level failures that abort the whole run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("input header is missing required columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("duplicate column '{column}' in input header")]
    DuplicateColumn { column: String },

    #[error("failed to write '{path}': {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("input directory not found: {path}")]
    InputDirNotFound { path: PathBuf },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl AdapterError {
    /// Create a parse error with file context
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a write error with file context
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error aborts the run instead of skipping a single file.
    ///
    /// Parse and schema failures are scoped to one input file; everything
    /// touching the output side or the run's resources is fatal, since all
    /// subsequent files would hit the same failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Write { .. }
                | Self::InputDirNotFound { .. }
                | Self::Configuration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;

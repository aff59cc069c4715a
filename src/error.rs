//! Error types for splits documents and timer setup.
//!
//! Timer operations never fail: calling `split()` while stopped is a no-op that
//! returns a sentinel. Errors only surface at the document boundary (loading and
//! saving a [`Game`](crate::Game)) and when allocating the per-split state of a
//! new [`Timer`](crate::Timer).
//!
//! ## Error Categories
//!
//! - **Allocation Errors**: the split sequence could not be reserved
//! - **Read Errors**: the document is missing or cannot be opened
//! - **Parse Errors**: syntax errors or ill-typed fields, with line and column
//! - **Schema Errors**: documents in an interchange schema this crate cannot read
//! - **Write Errors**: the document could not be written back to disk
//!
//! ## Recovery
//!
//! ```rust
//! use splitkeeper::SplitsError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//! let error = SplitsError::unreadable(PathBuf::from("/splits/sm64.json"), io_err);
//! assert!(error.is_missing());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for splits operations.
pub type Result<T, E = SplitsError> = std::result::Result<T, E>;

/// Main error type for document and timer setup operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SplitsError {
    #[error("Out of memory while allocating {context} ({requested} entries)")]
    OutOfMemory { context: String, requested: usize },

    #[error("Cannot read splits document: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed splits document {path}: {message} ({line}:{column})")]
    Malformed { path: PathBuf, message: String, line: usize, column: usize },

    #[error("Unsupported document schema version {version} in {path}")]
    UnsupportedSchema { path: PathBuf, version: String },

    #[error("Failed to write splits document: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode splits document: {details}")]
    Serialize { details: String },

    #[error("Background document task failed: {details}")]
    BackgroundTask { details: String },
}

impl SplitsError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SplitsError::OutOfMemory { .. } => true,
            SplitsError::Unreadable { source, .. } => {
                source.kind() != std::io::ErrorKind::NotFound
            }
            SplitsError::Write { .. } => true,
            SplitsError::BackgroundTask { .. } => true,
            SplitsError::Malformed { .. } => false,
            SplitsError::UnsupportedSchema { .. } => false,
            SplitsError::Serialize { .. } => false,
        }
    }

    /// Whether the document simply does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            SplitsError::Unreadable { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SplitsError::OutOfMemory { .. } => vec![
                "Close other applications to free memory",
                "Check the document for an unreasonable number of splits",
            ],
            SplitsError::Unreadable { .. } => vec![
                "Check the splits file exists",
                "Check file permissions",
                "Create a new game if this is a first run",
            ],
            SplitsError::Malformed { .. } => vec![
                "Fix the syntax error at the reported line and column",
                "Check every time field is a string",
                "Restore the document from a backup",
            ],
            SplitsError::UnsupportedSchema { .. } => vec![
                "Export the splits in the native document format",
                "Remove the _schemaVersion marker if the document is native",
            ],
            SplitsError::Write { .. } => vec![
                "Ensure sufficient disk space",
                "Check write permissions on the splits directory",
                "Retry the save; the in-memory game is unchanged",
            ],
            SplitsError::Serialize { .. } => {
                vec!["Check split titles for invalid characters", "Report the document contents"]
            }
            SplitsError::BackgroundTask { .. } => vec![
                "Retry the operation",
                "Check the async runtime is still running",
            ],
        }
    }

    /// Helper constructor for unreadable documents with path context.
    pub fn unreadable(path: PathBuf, source: std::io::Error) -> Self {
        SplitsError::Unreadable { path, source }
    }

    /// Helper constructor for failed writes with path context.
    pub fn write_failed(path: PathBuf, source: std::io::Error) -> Self {
        SplitsError::Write { path, source }
    }

    /// Helper constructor for parse failures at a known position.
    pub fn malformed(
        path: PathBuf,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        SplitsError::Malformed { path, message: message.into(), line, column }
    }

    /// Helper constructor for allocation failures.
    pub fn out_of_memory(context: impl Into<String>, requested: usize) -> Self {
        SplitsError::OutOfMemory { context: context.into(), requested }
    }

    /// Helper constructor for interchange documents.
    pub fn unsupported_schema(path: PathBuf, version: impl Into<String>) -> Self {
        SplitsError::UnsupportedSchema { path, version: version.into() }
    }
}

impl From<serde_json::Error> for SplitsError {
    fn from(err: serde_json::Error) -> Self {
        SplitsError::Serialize { details: err.to_string() }
    }
}

impl From<serde_yaml_ng::Error> for SplitsError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SplitsError::Serialize { details: err.to_string() }
    }
}

impl From<tokio::task::JoinError> for SplitsError {
    fn from(err: tokio::task::JoinError) -> Self {
        SplitsError::BackgroundTask { details: err.to_string() }
    }
}

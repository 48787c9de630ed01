//! Error types for the diff crate.

use strata_core::BlobError;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Building or reading a blob failed.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    /// The diff configuration is invalid or could not be parsed.
    #[error("invalid diff config: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

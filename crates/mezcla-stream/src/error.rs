//! Error types for stream construction and iteration

use thiserror::Error;

/// Errors that can occur when building or pulling from a stream
#[derive(Debug, Error)]
pub enum StreamError {
    /// Malformed constructor parameters (zero buffer size, mismatched
    /// source/weight counts, all-zero weights). Raised synchronously at
    /// construction time, never mid-iteration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A failure surfaced by an underlying source (I/O, parse). Propagated
    /// unchanged to the caller; nothing retries or suppresses it.
    #[error("source error: {0}")]
    Source(#[from] anyhow::Error),
}

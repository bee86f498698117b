//! Error types for the `vidsift` crate.
//!
//! This module defines [`VidsiftError`], the unified error type returned by
//! all fallible operations in the crate. The matching core itself only fails
//! on malformed timestamps; everything else comes from loading payloads or
//! from the caller cancelling a library-wide search.

use std::io::Error as IoError;

use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `vidsift` operations.
///
/// Every public method that can fail returns `Result<T, VidsiftError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VidsiftError {
    /// A timestamp string could not be parsed as `minutes:seconds`.
    #[error("Malformed timestamp {value:?}: {reason}")]
    MalformedTimestamp {
        /// The offending timestamp string, as received.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An insights or image-analysis payload could not be decoded.
    #[error("Invalid insights payload: {0}")]
    InvalidInsights(String),

    /// A query could not be turned into search terms.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// An I/O error occurred while reading payload files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<JsonError> for VidsiftError {
    fn from(error: JsonError) -> Self {
        VidsiftError::InvalidInsights(error.to_string())
    }
}

impl VidsiftError {
    pub(crate) fn malformed_timestamp(value: &str, reason: impl Into<String>) -> Self {
        VidsiftError::MalformedTimestamp {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

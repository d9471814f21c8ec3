//! Error types for the list query pipeline.
//!
//! Filtering and pagination never fail: malformed criteria degrade to "no
//! constraint" and out-of-range pages are clamped. Errors only surface from
//! configuration validation and from record sources.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Errors raised while configuring a list query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size of zero.
    #[error("page size must be positive")]
    InvalidPageSize,

    /// Page size above the configured ceiling.
    #[error("page size {requested} exceeds maximum {max}")]
    PageSizeTooLarge { requested: usize, max: usize },

    /// Debounce delay of zero.
    #[error("debounce delay must be positive")]
    InvalidDebounce,
}

/// Errors returned by a [`RecordSource`](crate::core::RecordSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The source could not produce a page.
    #[error("record source failed: {message}")]
    Source { message: String },

    /// The payload could not be decoded into records.
    #[error("failed to decode records: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Creates a source error from any displayable message.
    pub fn source(message: impl Into<String>) -> Self {
        FetchError::Source {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode {
            message: err.to_string(),
        }
    }
}

/// Result alias for configuration operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QueryError::PageSizeTooLarge {
            requested: 500,
            max: 100,
        };
        assert_eq!(err.to_string(), "page size 500 exceeds maximum 100");

        let err = FetchError::source("backend unavailable");
        assert_eq!(err.to_string(), "record source failed: backend unavailable");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err: FetchError = serde_json::from_str::<Vec<u32>>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}

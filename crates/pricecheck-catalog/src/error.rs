//! # Lookup Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / sqlx::Error / CoreError                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LookupError (this module) ← Adds categorization                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Kiosk controller logs the detail, session shows the Error status      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "No matching product" is NOT an error: lookups return `Ok(None)`.

use pricecheck_core::{CoreError, ValidationError};
use thiserror::Error;

/// Product lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The backend could not be reached.
    ///
    /// ## When This Occurs
    /// - DNS failure, connection refused, TLS failure
    /// - Request timeout
    /// - SQLite pool timed out or closed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered but rejected or garbled the query.
    ///
    /// ## When This Occurs
    /// - Non-2xx HTTP status (bad API key, unknown column, ...)
    /// - Response body is not a JSON array of rows
    /// - SQL error from the local mirror
    #[error("Query failed{}: {message}", http_status_suffix(.status))]
    Query {
        status: Option<u16>,
        message: String,
    },

    /// A matching row could not be mapped into a product.
    #[error("Malformed product row: {0}")]
    MalformedRow(String),

    /// The catalog is misconfigured (bad URL, bad column names).
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

impl LookupError {
    /// Creates a Query error.
    pub fn query(status: Option<u16>, message: impl Into<String>) -> Self {
        LookupError::Query {
            status,
            message: message.into(),
        }
    }
}

fn http_status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

/// Convert reqwest errors to LookupError.
///
/// ## Error Mapping
/// ```text
/// timeout / connect / request   → LookupError::Transport
/// status                        → LookupError::Query { status }
/// decode / body                 → LookupError::Query
/// builder (bad URL)             → LookupError::Config
/// ```
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            LookupError::Config(err.to_string())
        } else if err.is_status() {
            LookupError::query(err.status().map(|s| s.as_u16()), err.to_string())
        } else if err.is_decode() || err.is_body() {
            LookupError::query(None, err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Convert sqlx errors to LookupError.
impl From<sqlx::Error> for LookupError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                LookupError::Transport(err.to_string())
            }
            sqlx::Error::Database(db_err) => LookupError::query(None, db_err.message()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                LookupError::MalformedRow(err.to_string())
            }
            _ => LookupError::query(None, err.to_string()),
        }
    }
}

/// Price parsing and other core failures while mapping a row.
impl From<CoreError> for LookupError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => LookupError::Config(e.to_string()),
            other => LookupError::MalformedRow(other.to_string()),
        }
    }
}

/// Bad table/column names from configuration.
impl From<ValidationError> for LookupError {
    fn from(err: ValidationError) -> Self {
        LookupError::Config(err.to_string())
    }
}

/// Result type for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_message_with_status() {
        let err = LookupError::query(Some(401), "Invalid API key");
        assert_eq!(err.to_string(), "Query failed (HTTP 401): Invalid API key");

        let err = LookupError::query(None, "no such column: Codigo9");
        assert_eq!(err.to_string(), "Query failed: no such column: Codigo9");
    }

    #[test]
    fn test_core_price_error_is_malformed_row() {
        let err: LookupError = CoreError::invalid_price("abc", "not a number").into();
        assert!(matches!(err, LookupError::MalformedRow(_)));
    }

    #[test]
    fn test_sqlx_pool_timeout_is_transport() {
        let err: LookupError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}

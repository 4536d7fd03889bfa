//! # Error Types
//!
//! Domain-specific error types for pricecheck-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricecheck-core errors (this file)                                    │
//! │  ├── CoreError        - Session and pricing errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pricecheck-catalog errors (separate crate)                            │
//! │  └── LookupError      - Transport / query failures                     │
//! │                                                                         │
//! │  kiosk app errors                                                      │
//! │  └── KioskError       - Config, terminal, startup                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LookupError → Error status        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A scan arrived while a lookup is still in flight.
    ///
    /// ## When This Occurs
    /// - Scanner fires twice in quick succession
    /// - Operator presses Enter while the kiosk shows "Searching..."
    #[error("A lookup is already in progress")]
    Busy,

    /// A backend price could not be turned into a money value.
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidPrice error.
    pub fn invalid_price(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidPrice {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (control characters, bad identifier, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::Busy.to_string(), "A lookup is already in progress");

        let err = CoreError::invalid_price("abc", "not a number");
        assert_eq!(err.to_string(), "Invalid price 'abc': not a number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::OutOfRange {
            field: "codes".to_string(),
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "codes must be between 1 and 5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

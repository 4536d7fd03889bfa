//! # Validation Module
//!
//! Input validation for scanner lines and catalog identifiers.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Scan input surface                                           │
//! │  └── Ignores Enter on an empty/whitespace buffer                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── normalize_scan_code: trim, non-empty                              │
//! │  └── validate_identifier: table/column names used in backend queries   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Parameterized / quoted filter values                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest table/column identifier accepted from configuration.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Normalizes one scanner line into a lookup code.
///
/// ## Rules
/// - Leading/trailing whitespace (including the scanner's CR/LF) is removed
/// - Must not be empty after trimming
///
/// Anything else the scanner typed is kept as-is; backends receive the code
/// as a bound parameter or a quoted filter value.
///
/// ## Example
/// ```rust
/// use pricecheck_core::validation::normalize_scan_code;
///
/// assert_eq!(normalize_scan_code("  7791234567890\r\n").unwrap(), "7791234567890");
/// assert!(normalize_scan_code("   ").is_err());
/// ```
pub fn normalize_scan_code(raw: &str) -> ValidationResult<String> {
    let code = raw.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates a table or column name taken from configuration.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_IDENTIFIER_LEN`] characters
/// - Only ASCII letters, digits and underscores
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, and underscores".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_code_trimmed() {
        assert_eq!(normalize_scan_code("\t000000 ").unwrap(), "000000");
    }

    #[test]
    fn test_scan_code_empty() {
        assert_eq!(
            normalize_scan_code(" \r\n"),
            Err(ValidationError::Required {
                field: "code".to_string()
            })
        );
    }

    #[test]
    fn test_scan_code_long_is_accepted() {
        let long = "9".repeat(200);
        assert_eq!(normalize_scan_code(&long).unwrap(), long);
    }

    #[test]
    fn test_scan_code_inner_control_chars_kept() {
        assert_eq!(normalize_scan_code(" 12\t34\n").unwrap(), "12\t34");
    }

    #[test]
    fn test_scan_code_keeps_inner_punctuation() {
        assert_eq!(normalize_scan_code("AB-12,(3)").unwrap(), "AB-12,(3)");
    }

    #[test]
    fn test_identifier() {
        assert!(validate_identifier("column", "Codigo2").is_ok());
        assert!(validate_identifier("column", "").is_err());
        assert!(validate_identifier("column", "Codigo;drop").is_err());
        assert!(validate_identifier("column", "a b").is_err());
        assert!(validate_identifier("column", &"x".repeat(64)).is_err());
    }
}

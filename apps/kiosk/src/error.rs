//! # Kiosk Error Type
//!
//! Errors that stop the kiosk from starting or tear it down.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Kiosk                              │
//! │                                                                         │
//! │  Startup                                 Running                        │
//! │  ───────                                 ───────                        │
//! │  config file / env ──► KioskError::Config                               │
//! │  catalog connect   ──► KioskError::Catalog                              │
//! │  log file          ──► KioskError::Logging                              │
//! │                                          terminal I/O ──► KioskError::Io│
//! │                                          controller gone ──► Controller │
//! │                                                                         │
//! │  Lookup failures while running are NOT KioskErrors: the controller     │
//! │  logs them and the session shows the Error view.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricecheck_catalog::LookupError;
use thiserror::Error;

/// Kiosk application errors.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Configuration is missing or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Config file is not valid TOML.
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The catalog backend could not be set up.
    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] LookupError),

    /// Log file could not be opened or the subscriber was already set.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The controller task has stopped.
    #[error("Kiosk controller stopped: {0}")]
    Controller(String),
}

/// Result type for kiosk operations.
pub type KioskResult<T> = Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_wraps_lookup_error() {
        let err: KioskError = LookupError::Config("bad url".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Catalog unavailable: Invalid catalog configuration: bad url"
        );
    }

    #[test]
    fn test_toml_error_is_config_parse() {
        let parse = toml::from_str::<toml::Table>("[kiosk\n").unwrap_err();
        let err: KioskError = parse.into();
        assert!(matches!(err, KioskError::ConfigParse(_)));
    }
}

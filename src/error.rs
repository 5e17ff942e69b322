//! Custom error types for the application.
//!
//! This module defines the primary error type, `BenchError`, for the entire
//! application. Using the `thiserror` crate, it consolidates the failure modes
//! of the bench core: command templating, catalog lookup, alias resolution,
//! and transport dispatch.
//!
//! Transport read timeouts are deliberately absent from the taxonomy: the
//! transport boundary recovers them locally (a timed-out query yields an empty
//! response, a timed-out write counts as sent), so only non-timeout bus
//! failures surface here as `Transport`.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    #[error("Command '{name}' not found for model '{model}'")]
    CommandNotFound { name: String, model: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial support not enabled. Rebuild with --features transport_serial")]
    SerialFeatureDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_names_the_parameter() {
        let err = BenchError::MissingValue("freq".to_string());
        assert_eq!(err.to_string(), "Missing value for freq");
    }

    #[test]
    fn command_not_found_names_command_and_model() {
        let err = BenchError::CommandNotFound {
            name: "SETV".to_string(),
            model: "E3631A".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command 'SETV' not found for model 'E3631A'"
        );
    }
}

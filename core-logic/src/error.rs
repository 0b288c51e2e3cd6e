//! # Core Error Types
//!
//! Centralized error definitions shared by every chain crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.
//!
//! The taxonomy mirrors how the bots treat failures at runtime:
//!
//! - [`NetworkError`] - non-success HTTP status or transport failure
//! - [`ToolError`] - the external wallet CLI wrote to stderr or could not run
//! - [`ParseError`] - a response did not have the expected shape
//! - [`ConfigError`] - configuration could not be loaded or is invalid
//!
//! Business-rule short circuits (insufficient balance, nothing to consume)
//! are not errors; tasks report them as skipped results instead.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Network and HTTP-related errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("HTTP error {status_code} from {endpoint}")]
    HttpStatus { status_code: u16, endpoint: String },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
}

/// Failures reported by the external wallet command-line tool
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("Command [{command}] wrote to stderr: {stderr}")]
    Stderr { command: String, stderr: String },

    #[error("Failed to run command [{command}]: {reason}")]
    Spawn { command: String, reason: String },

    #[error("Unexpected output for {operation}")]
    UnexpectedOutput { operation: String },
}

/// Response or output that could not be interpreted
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Invalid {what}: {reason}")]
    InvalidResponse { what: String, reason: String },
}

impl ParseError {
    pub fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::InvalidResponse {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_piece() {
        let err = ParseError::invalid("claim response", "no note_id");
        assert_eq!(err.to_string(), "Invalid claim response: no note_id");

        let err = ToolError::Stderr {
            command: "miden sync".to_string(),
            stderr: "rpc down".to_string(),
        };
        assert_eq!(err.to_string(), "Command [miden sync] wrote to stderr: rpc down");
    }
}

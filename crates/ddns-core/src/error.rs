//! Error types for the AAAA synchronizer
//!
//! Three failure classes matter to a run: configuration, address discovery
//! and the record registry. Every one of them is fatal; nothing in this
//! workspace retries.

use thiserror::Error;

/// Result type alias for synchronizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration source missing, unreadable, or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public address discovery failed or returned an unusable value
    #[error("Address discovery error: {0}")]
    Discovery(String),

    /// A registry call failed at the transport level or reported failure
    /// inside its response envelope
    #[error("Registry error during {operation}: {message}")]
    Registry {
        /// The registry operation that failed (list, create, update, delete)
        operation: &'static str,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an address discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a registry error for the given operation
    pub fn registry(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Registry {
            operation,
            message: message.into(),
        }
    }

    /// Short name of the step that produced this error, for log lines
    pub fn step(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Discovery(_) => "address discovery",
            Self::Registry { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_names_operation() {
        let err = Error::registry("update", "record not found");
        assert_eq!(
            err.to_string(),
            "Registry error during update: record not found"
        );
        assert_eq!(err.step(), "update");
    }

    #[test]
    fn step_names_each_class() {
        assert_eq!(Error::config("x").step(), "configuration");
        assert_eq!(Error::discovery("x").step(), "address discovery");
        assert_eq!(Error::registry("delete", "x").step(), "delete");
    }
}

//! Error types shared by the Flow autoscaler crates
//!
//! Configuration problems are detected at startup and carry the offending
//! value so operators can fix the deployment without reading logs.

use thiserror::Error;

/// Main error type for configuration and startup
#[derive(Debug, Error)]
pub enum Error {
    /// Provider configuration is missing or malformed
    #[error("{message}")]
    Config {
        /// Description of what's wrong
        message: String,
    },

    /// A `min:max:name` node group spec could not be parsed
    #[error("invalid node group spec {spec:?}: {message}")]
    InvalidNodeGroupSpec {
        /// The raw spec string
        spec: String,
        /// Description of what's invalid
        message: String,
    },

    /// Tracing subscriber could not be installed
    #[error("failed to initialize tracing subscriber: {0}")]
    Telemetry(String),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a node group spec error
    pub fn invalid_spec(spec: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidNodeGroupSpec {
            spec: spec.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_message_verbatim() {
        let err = Error::config("flow access token is not provided");
        assert_eq!(err.to_string(), "flow access token is not provided");
    }

    #[test]
    fn spec_error_includes_raw_spec() {
        let err = Error::invalid_spec("1:x:workers", "max size is not a number");
        let msg = err.to_string();
        assert!(msg.contains("\"1:x:workers\""));
        assert!(msg.contains("max size is not a number"));
    }
}

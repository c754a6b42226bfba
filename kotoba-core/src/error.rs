//! Error types for the Kotoba library

use crate::types::request::RequestId;
use std::error::Error as StdError;
use std::fmt;

/// The main error type for all Kotoba operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Network-related errors (connection failures, timeouts, body reads)
    Network {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The endpoint answered with a non-success status
    Provider {
        /// Provider name (e.g., "openai")
        provider: String,
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Error message, usually the response body
        message: String,
    },

    /// Authentication errors (401/403 from the endpoint)
    Authentication(String),

    /// Request serialization errors
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The response body could not be turned into completion text
    MalformedResponse {
        /// Error message
        message: String,
    },

    /// Configuration errors
    Configuration(String),

    /// A completion arrived for an id the registry does not know about
    UnknownRequest(RequestId),

    /// The request's task stopped before producing an outcome
    /// (the provider panicked or the runtime shut down)
    Interrupted(String),
}

impl Error {
    /// Build a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: message.into(),
        }
    }

    /// Whether the failure happened while talking to the endpoint
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network { .. } | Error::Provider { .. } | Error::Authentication(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network { message, .. } => write!(f, "Network error: {}", message),
            Error::Provider {
                provider,
                status,
                message,
            } => write!(f, "Provider error ({}, HTTP {}): {}", provider, status, message),
            Error::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {}", message),
            Error::MalformedResponse { message } => write!(f, "Malformed response: {}", message),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::UnknownRequest(id) => write!(f, "No pending request with id {}", id),
            Error::Interrupted(msg) => write!(f, "Request interrupted: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Network { source, .. } | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

/// Result type alias for Kotoba operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let error = Error::Network {
            message: "Connection refused".into(),
            source: None,
        };
        assert_eq!(error.to_string(), "Network error: Connection refused");

        let error = Error::Provider {
            provider: "openai".into(),
            status: 500,
            message: "upstream exploded".into(),
        };
        assert_eq!(
            error.to_string(),
            "Provider error (openai, HTTP 500): upstream exploded"
        );

        let error = Error::Authentication("Invalid API key".into());
        assert_eq!(error.to_string(), "Authentication error: Invalid API key");

        let error = Error::malformed("no choices in response");
        assert_eq!(error.to_string(), "Malformed response: no choices in response");

        let error = Error::Configuration("OPENAI_API_KEY is not set".into());
        assert_eq!(
            error.to_string(),
            "Configuration error: OPENAI_API_KEY is not set"
        );

        let error = Error::UnknownRequest(RequestId::new(7));
        assert_eq!(error.to_string(), "No pending request with id 7");

        let error = Error::Interrupted("runtime shut down".into());
        assert_eq!(error.to_string(), "Request interrupted: runtime shut down");
    }

    #[test]
    fn test_error_source() {
        let error = Error::Network {
            message: "Connection failed".into(),
            source: None,
        };
        assert!(error.source().is_none());

        let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::Network {
            message: "Connection failed".into(),
            source: Some(Box::new(io_error)),
        };
        assert!(error.source().is_some());

        let json_error = serde_json::from_str::<String>("invalid").unwrap_err();
        let error: Error = json_error.into();
        assert!(error.source().is_some());

        assert!(Error::malformed("empty").source().is_none());
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_error = serde_json::from_str::<String>("invalid json").unwrap_err();
        let error: Error = json_error.into();

        match error {
            Error::Serialization { message, source } => {
                assert!(!message.is_empty());
                assert!(source.is_some());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::Network {
            message: "reset".into(),
            source: None
        }
        .is_transport());
        assert!(Error::Provider {
            provider: "openai".into(),
            status: 503,
            message: String::new(),
        }
        .is_transport());
        assert!(Error::Authentication("bad key".into()).is_transport());

        assert!(!Error::malformed("empty choices").is_transport());
        assert!(!Error::Configuration("missing key".into()).is_transport());
        assert!(!Error::UnknownRequest(RequestId::new(0)).is_transport());
        assert!(!Error::Interrupted("task panicked".into()).is_transport());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

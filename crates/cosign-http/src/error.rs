//! Error types for console gateway operations.

use thiserror::Error;

/// Result type for console gateway operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Fallback text for an application failure without a server message.
pub const REQUEST_FAILED: &str = "Request failed";

/// Fallback text for a transport failure without any other message.
pub const NETWORK_ERROR: &str = "Network error";

/// Errors that can occur while talking to the co-signing service.
///
/// Every variant displays as a human-readable message suitable for the
/// calling UI action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConsoleError {
    /// Response body was not a `{code, message, data}` envelope.
    #[error("Malformed response: {0}")]
    MalformedEnvelope(String),

    /// Envelope `code != 0`.
    #[error("{message}")]
    Application { code: i64, message: String },

    /// Transport status 401. The session has already been invalidated when
    /// a caller sees this.
    #[error("{0}")]
    AuthenticationRejected(String),

    /// Network failure, timeout, or any non-2xx status other than 401.
    #[error("{0}")]
    Transport(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Storage(format!("{:#}", err))
    }
}

impl ConsoleError {
    #[inline]
    #[must_use]
    pub fn is_authentication_rejected(&self) -> bool {
        matches!(self, ConsoleError::AuthenticationRejected(_))
    }

    #[inline]
    #[must_use]
    pub fn is_application(&self) -> bool {
        matches!(self, ConsoleError::Application { .. })
    }

    /// Build an application failure, substituting the fallback text for an
    /// empty message.
    pub fn application(code: i64, message: Option<&str>) -> Self {
        let message = match message.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => REQUEST_FAILED.to_string(),
        };
        ConsoleError::Application { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_fallback_message() {
        let err = ConsoleError::application(1001, None);
        assert_eq!(err.to_string(), REQUEST_FAILED);

        let err = ConsoleError::application(1001, Some("  "));
        assert_eq!(err.to_string(), REQUEST_FAILED);
    }

    #[test]
    fn test_application_displays_server_message() {
        let err = ConsoleError::application(1001, Some("bad"));
        assert_eq!(err.to_string(), "bad");
        assert!(err.is_application());
        assert!(!err.is_authentication_rejected());
    }

    #[test]
    fn test_auth_rejected_classification() {
        let err = ConsoleError::AuthenticationRejected("Unauthorized".into());
        assert!(err.is_authentication_rejected());
        assert_eq!(err.to_string(), "Unauthorized");
    }
}

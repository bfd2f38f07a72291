//! Error type definitions
//!
//! Defines the error type shared by the transport, the auth manager and the
//! typed resource client. Every error is classified once, where it is raised,
//! into one of the three [`ErrorKind`]s callers branch on.

use thiserror::Error;

/// Failure class reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field was missing or empty; nothing was sent
    Validation,
    /// Login failed, or the server kept rejecting the session
    Auth,
    /// The request could not be completed or its reply was unusable
    Network,
}

/// Main error type for the Rap2 client
#[derive(Error, Debug)]
pub enum Error {
    /// Local validation failure, raised before any network call
    #[error("Validation error on {path}: {message}")]
    Validation { path: String, message: String },

    /// Authentication failure
    #[error("Authentication error on {path}: {message}")]
    Auth { path: String, message: String },

    /// Transport-level failure (connection refused, timeout, I/O)
    #[error("Network error on {path}: {message}")]
    Network {
        path: String,
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected the request for a reason other than authentication
    #[error("Request to {path} failed ({status}): {message}")]
    Response {
        path: String,
        status: u16,
        message: String,
    },

    /// The reply could not be decoded into the expected shape
    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error for the given request path
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a transport failure
    pub fn network(path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            path: path.into(),
            message: source.to_string(),
            source,
        }
    }

    /// Create a server rejection error
    pub fn response(path: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Response {
            path: path.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::Config(_) => ErrorKind::Validation,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Network { .. } | Self::Response { .. } | Self::Decode { .. } | Self::Io(_) => {
                ErrorKind::Network
            }
        }
    }

    /// Request path the error relates to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Validation { path, .. }
            | Self::Auth { path, .. }
            | Self::Network { path, .. }
            | Self::Response { path, .. }
            | Self::Decode { path, .. } => Some(path),
            Self::Config(_) | Self::Io(_) => None,
        }
    }

    /// Human-readable message without the path prefix
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::Auth { message, .. }
            | Self::Network { message, .. }
            | Self::Response { message, .. }
            | Self::Decode { message, .. } => message.clone(),
            Self::Config(message) => message.clone(),
            Self::Io(err) => err.to_string(),
        }
    }

    /// Whether the caller should prompt for re-authentication
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = Error::validation("/module/create", "repositoryId can't be null");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.path(), Some("/module/create"));
        assert_eq!(
            err.to_string(),
            "Validation error on /module/create: repositoryId can't be null"
        );
    }

    #[test]
    fn test_auth_error() {
        let err = Error::auth("/account/login", "错误的验证码");
        assert!(err.is_auth());
        assert_eq!(err.message(), "错误的验证码");
    }

    #[test]
    fn test_response_and_decode_are_network_kind() {
        let err = Error::response("/interface/get", 500, "boom");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().contains("500"));

        let err = Error::decode("/interface/get", "expected value at line 1");
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("url can't be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.path(), None);
        assert_eq!(err.to_string(), "Configuration error: url can't be empty");
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}

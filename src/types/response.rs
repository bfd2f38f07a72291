//! Response type definitions
//!
//! Outcome of a connectivity test against the configured server.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::session::Session;

/// Connectivity test outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestCode {
    Ok,
    AuthError,
    NetworkError,
}

/// Result of logging in once against the configured server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub code: TestCode,
    /// Session issued by the successful login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// Server or transport message for failed tests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    /// A passing test carrying the new session
    pub fn ok(session: Session) -> Self {
        Self {
            code: TestCode::Ok,
            session: Some(session),
            message: None,
        }
    }

    /// A failing test classified from the login error
    pub fn from_error(err: &Error) -> Self {
        let code = match err.kind() {
            ErrorKind::Network => TestCode::NetworkError,
            ErrorKind::Auth | ErrorKind::Validation => TestCode::AuthError,
        };
        Self {
            code,
            session: None,
            message: Some(err.to_string()),
        }
    }

    /// Whether the login succeeded
    pub fn is_ok(&self) -> bool {
        self.code == TestCode::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_ok_result() {
        let session = Session::new("koa.sid=abc", Utc::now() + Duration::hours(1));
        let result = TestResult::ok(session.clone());
        assert!(result.is_ok());
        assert_eq!(result.session, Some(session));
    }

    #[test]
    fn test_classification() {
        let auth = TestResult::from_error(&Error::auth("/account/login", "错误的验证码"));
        assert_eq!(auth.code, TestCode::AuthError);
        assert!(auth.message.unwrap().contains("错误的验证码"));

        let network = TestResult::from_error(&Error::response("/account/login", 502, "Bad Gateway"));
        assert_eq!(network.code, TestCode::NetworkError);

        let invalid = TestResult::from_error(&Error::validation("/account/login", "no account"));
        assert_eq!(invalid.code, TestCode::AuthError);
    }

    #[test]
    fn test_code_serialization() {
        assert_eq!(
            serde_json::to_string(&TestCode::AuthError).unwrap(),
            "\"AUTH_ERROR\""
        );
    }
}

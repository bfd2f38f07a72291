//! Authenticated session value
//!
//! A [`Session`] is issued once by a successful login (or restored from
//! saved settings) and never mutated afterwards; refreshing replaces it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cookie header value plus the instant it stops being trusted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Value for the `Cookie` request header, e.g. `koa.sid=...; koa.sid.sig=...`
    pub cookies: String,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with an explicit expiry
    pub fn new(cookies: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            cookies: cookies.into(),
            expires_at,
        }
    }

    /// Issue a session that lives for `ttl` from now
    pub fn issue(cookies: impl Into<String>, ttl: Duration) -> Self {
        Self::new(cookies, Utc::now() + ttl)
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against a given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Where the auth state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Never logged in, or the last refresh failed
    NoSession,
    /// A session exists and has not expired
    Valid,
    /// A session exists but its expiry has passed
    Stale,
}

impl SessionStatus {
    /// Classify an optional session at the current instant
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => Self::NoSession,
            Some(s) if s.is_expired() => Self::Stale,
            Some(_) => Self::Valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_issue() {
        let session = Session::issue("koa.sid=abc", Duration::hours(24));
        assert_eq!(session.cookies, "koa.sid=abc");
        assert!(!session.is_expired());
        assert!(!session.is_expired_at(Utc::now() + Duration::hours(23)));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let expires_at = Utc::now();
        let session = Session::new("koa.sid=abc", expires_at);
        assert!(session.is_expired_at(expires_at));
        assert!(!session.is_expired_at(expires_at - Duration::seconds(1)));
    }

    #[test]
    fn test_status() {
        let valid = Session::issue("a=1", Duration::hours(1));
        let stale = Session::new("a=1", Utc::now() - Duration::hours(1));

        assert_eq!(SessionStatus::of(None), SessionStatus::NoSession);
        assert_eq!(SessionStatus::of(Some(&valid)), SessionStatus::Valid);
        assert_eq!(SessionStatus::of(Some(&stale)), SessionStatus::Stale);
    }

    #[test]
    fn test_session_serialization() {
        let session = Session::issue("koa.sid=abc", Duration::hours(1));
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}

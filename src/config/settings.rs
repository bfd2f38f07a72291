//! Configuration settings structure
//!
//! Defines the settings persisted between runs: where the server is, who logs
//! in, and the last session issued to that account. The password is read from
//! the file or the environment but never written back.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::client::{DEFAULT_SESSION_TTL_HOURS, DEFAULT_TIMEOUT_SECS, Rap2Client};
use crate::session::{CaptchaSolver, Session};
use crate::types::{Rap2User, TestResult};
use crate::{Error, Result};

/// Main configuration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Login account
    pub account: AccountSettings,
    /// Last issued session
    pub session: SessionSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Rap2 server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL including any deployment prefix, e.g. `http://host/rap2_delos`
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom `User-Agent`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Account used for logins
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

/// Session issued by the last successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Lifetime assumed for new sessions, in hours
    pub ttl_hours: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Rap2User>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookies: None,
            expires_at: None,
            ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            user: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            verbose: false,
        }
    }
}

impl fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSettings")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Override settings with `RAP2_*` environment variables
    pub fn merge_with_env(self) -> Result<Self> {
        self.merge_with_vars(|name| std::env::var(name).ok())
    }

    /// Override settings from a variable lookup
    pub fn merge_with_vars<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("RAP2_URL") {
            self.server.url = url;
        }
        if let Some(account) = var("RAP2_ACCOUNT") {
            self.account.email = Some(account);
        }
        if let Some(password) = var("RAP2_PASSWORD") {
            self.account.password = Some(password);
        }
        if let Some(timeout) = var("RAP2_TIMEOUT_SECS") {
            self.server.timeout_secs = timeout
                .parse()
                .map_err(|e| Error::config(format!("Invalid RAP2_TIMEOUT_SECS: {}", e)))?;
        }
        if let Some(ttl) = var("RAP2_SESSION_TTL_HOURS") {
            self.session.ttl_hours = ttl
                .parse()
                .map_err(|e| Error::config(format!("Invalid RAP2_SESSION_TTL_HOURS: {}", e)))?;
        }
        Ok(self)
    }

    /// Check value ranges; missing account data is not an error here
    pub fn validate(&self) -> Result<()> {
        if !self.server.url.is_empty() {
            let url = Url::parse(&self.server.url)
                .map_err(|e| Error::config(format!("Invalid server url: {}", e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "Unsupported server url scheme: {}",
                    url.scheme()
                )));
            }
        }
        if self.server.timeout_secs == 0 {
            return Err(Error::config("Timeout must be at least one second"));
        }
        if self.session.ttl_hours <= 0 {
            return Err(Error::config("Session TTL must be positive"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Write the settings as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Whether url, account and password are all present
    pub fn is_valid(&self) -> bool {
        let present = |value: Option<&String>| value.is_some_and(|v| !v.trim().is_empty());
        !self.server.url.trim().is_empty()
            && present(self.account.email.as_ref())
            && present(self.account.password.as_ref())
    }

    /// Stored session, valid or not
    pub fn stored_session(&self) -> Option<Session> {
        match (&self.session.cookies, self.session.expires_at) {
            (Some(cookies), Some(expires_at)) if !cookies.is_empty() => {
                Some(Session::new(cookies.clone(), expires_at))
            }
            _ => None,
        }
    }

    /// Build a client from these settings
    ///
    /// Credentials are used when both account and password are set; a stored
    /// session is restored together with its user.
    pub fn build_client(&self, solver: Option<Arc<dyn CaptchaSolver>>) -> Result<Rap2Client> {
        if self.server.url.trim().is_empty() {
            return Err(Error::config("Server url is not configured"));
        }

        let mut builder = Rap2Client::builder(&self.server.url)
            .timeout(StdDuration::from_secs(self.server.timeout_secs))
            .session_ttl(Duration::hours(self.session.ttl_hours));
        if let Some(user_agent) = &self.server.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let (Some(email), Some(password)) = (&self.account.email, &self.account.password) {
            builder = builder.credentials(email, password);
        }
        if let Some(session) = self.stored_session() {
            builder = builder.session(session);
            if let Some(user) = &self.session.user {
                builder = builder.user(user.clone());
            }
        }
        if let Some(solver) = solver {
            builder = builder.captcha_solver(solver);
        }
        builder.build()
    }

    /// Log in once with these settings, keeping the session on success
    pub fn test_settings(&mut self, solver: Option<Arc<dyn CaptchaSolver>>) -> Result<TestResult> {
        if !self.is_valid() {
            return Err(Error::config("Server url, account and password are required"));
        }

        let client = self.build_client(solver)?;
        let result = client.test();
        if let Some(session) = result.session.as_ref() {
            info!("Settings verified against {}", self.server.url);
            self.remember(session, client.current_user());
        }
        Ok(result)
    }

    /// Record a session and its user
    pub fn remember(&mut self, session: &Session, user: Option<Rap2User>) {
        self.session.cookies = Some(session.cookies.clone());
        self.session.expires_at = Some(session.expires_at);
        if user.is_some() {
            self.session.user = user;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn complete() -> Settings {
        let mut settings = Settings::default();
        settings.server.url = "http://rap2.example.com".to_string();
        settings.account.email = Some("admin@example.com".to_string());
        settings.account.password = Some("secret".to_string());
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.timeout_secs, 30);
        assert_eq!(settings.session.ttl_hours, 24);
        assert_eq!(settings.logging.level, "error");
        assert!(settings.validate().is_ok());
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_is_valid() {
        let mut settings = complete();
        assert!(settings.is_valid());
        settings.account.password = Some(String::new());
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_merge_with_vars() {
        let vars: HashMap<&str, &str> = [
            ("RAP2_URL", "http://localhost:38080"),
            ("RAP2_ACCOUNT", "dev@example.com"),
            ("RAP2_SESSION_TTL_HOURS", "6"),
        ]
        .into_iter()
        .collect();

        let settings = Settings::default()
            .merge_with_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.server.url, "http://localhost:38080");
        assert_eq!(settings.account.email.as_deref(), Some("dev@example.com"));
        assert_eq!(settings.session.ttl_hours, 6);
        assert_eq!(settings.server.timeout_secs, 30);
    }

    #[test]
    fn test_merge_with_vars_rejects_bad_number() {
        let err = Settings::default()
            .merge_with_vars(|name| (name == "RAP2_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("RAP2_TIMEOUT_SECS"));
    }

    #[test]
    fn test_validate() {
        let mut settings = complete();
        settings.server.url = "ftp://rap2.example.com".to_string();
        assert!(settings.validate().is_err());

        let mut settings = complete();
        settings.session.ttl_hours = 0;
        assert!(settings.validate().is_err());

        let mut settings = complete();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_password_is_never_written() {
        let mut settings = complete();
        settings.remember(
            &Session::new("koa.sid=abc", Utc::now() + Duration::hours(1)),
            Some(Rap2User {
                id: Some(1),
                ..Default::default()
            }),
        );

        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(!text.contains("secret"));
        assert!(text.contains("koa.sid=abc"));
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = complete();
        let session = Session::new("koa.sid=abc", Utc::now() + Duration::hours(1));
        settings.remember(&session, None);
        settings.save(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.server, settings.server);
        assert_eq!(loaded.account.password, None);
        assert_eq!(loaded.stored_session(), Some(session));
    }

    #[test]
    fn test_build_client_restores_session() {
        let mut settings = complete();
        settings.remember(
            &Session::new("koa.sid=abc", Utc::now() + Duration::hours(1)),
            Some(Rap2User {
                id: Some(7),
                ..Default::default()
            }),
        );

        let client = settings.build_client(None).unwrap();
        assert!(client.auth().has_credentials());
        assert_eq!(client.current_user().and_then(|u| u.id), Some(7));
        assert_eq!(client.session().map(|s| s.cookies), Some("koa.sid=abc".to_string()));
    }

    #[test]
    fn test_build_client_requires_url() {
        let err = Settings::default().build_client(None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }

    #[test]
    fn test_test_settings_requires_complete_settings() {
        let mut settings = Settings::default();
        assert!(settings.test_settings(None).is_err());
    }
}

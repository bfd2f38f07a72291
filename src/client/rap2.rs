//! Typed Rap2 operations over an authenticated session
//!
//! [`Rap2Client`] combines a [`Transport`] with an [`AuthManager`]. Every
//! operation validates its input locally, makes sure a valid session exists,
//! and retries exactly once with a fresh session when the server answers with
//! the auth-denied signal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::paths;
use crate::session::{AuthManager, Captcha, CaptchaSolver, Credentials, Session, SessionStatus};
use crate::transport::{HttpReply, Reply, Transport, decode, interpret};
use crate::types::{
    CreateModuleRequest, Rap2Interface, Rap2InterfaceBase, Rap2Module, Rap2Repository, Rap2User,
    TestResult, UpdatePropertiesRequest,
};
use crate::utils::version::DEFAULT_USER_AGENT;
use crate::{Error, Result};

/// Lifetime of a session minted by a login unless configured otherwise
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Per-request timeout unless configured otherwise
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for one Rap2 server
pub struct Rap2Client {
    transport: Arc<Transport>,
    auth: AuthManager,
}

impl fmt::Debug for Rap2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rap2Client").field("auth", &self.auth).finish()
    }
}

impl Rap2Client {
    /// Client that logs in with an account and password when needed
    pub fn with_credentials(url: &str, account: &str, password: &str) -> Result<Self> {
        Self::builder(url).credentials(account, password).build()
    }

    /// Client reusing a session issued earlier
    ///
    /// No credentials are kept, so once `expires_at` passes every call fails
    /// with an auth error until a new session is obtained.
    pub fn from_session(
        url: &str,
        cookies: &str,
        expires_at: DateTime<Utc>,
        user: Option<Rap2User>,
    ) -> Result<Self> {
        let mut builder = Self::builder(url).session(Session::new(cookies, expires_at));
        if let Some(user) = user {
            builder = builder.user(user);
        }
        builder.build()
    }

    pub fn builder(url: impl Into<String>) -> Rap2ClientBuilder {
        Rap2ClientBuilder::new(url)
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Session owner of this client
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn session(&self) -> Option<Session> {
        self.auth.session()
    }

    pub fn current_user(&self) -> Option<Rap2User> {
        self.auth.current_user()
    }

    pub fn status(&self) -> SessionStatus {
        self.auth.status()
    }

    /// Fetch a captcha for a following [`Rap2Client::login`]
    pub fn fetch_captcha(&self) -> Result<Captcha> {
        self.auth.fetch_captcha()
    }

    /// Log in with the solution of the last fetched captcha
    pub fn login(&self, captcha: &str) -> Result<Rap2User> {
        self.auth.login(captcha)
    }

    pub fn ensure_session(&self, force: bool) -> Result<Session> {
        self.auth.ensure_session(force)
    }

    /// Log in once and report the outcome instead of failing
    pub fn test(&self) -> TestResult {
        match self.auth.ensure_session(true) {
            Ok(session) => TestResult::ok(session),
            Err(e) => TestResult::from_error(&e),
        }
    }

    /// Fetch a repository with its modules and interfaces
    ///
    /// Returns `None` when the server knows no repository with this id.
    pub fn get_repository(&self, id: i64) -> Result<Option<Rap2Repository>> {
        require_id(paths::GET_REPOSITORY, "id", id)?;
        let path = paths::get_repository(id);
        let data = self.request_get(&path)?;
        decode_optional(&path, &data)
    }

    /// Modules of a repository, empty when it has none
    pub fn get_modules(&self, repository_id: i64) -> Result<Vec<Rap2Module>> {
        let repository = self.get_repository(repository_id)?;
        Ok(repository.and_then(|r| r.modules).unwrap_or_default())
    }

    /// Create a module owned by the logged-in user
    pub fn create_module(&self, request: &CreateModuleRequest) -> Result<Rap2Module> {
        let path = paths::CREATE_MODULE;
        let repository_id = request
            .repository_id
            .ok_or_else(|| Error::validation(path, "repositoryId can't be null"))?;
        require_id(path, "repositoryId", repository_id)?;
        if request.name.trim().is_empty() {
            return Err(Error::validation(path, "name can't be empty"));
        }

        self.auth.ensure_session(false)?;
        let creator_id = self
            .auth
            .current_user()
            .and_then(|user| user.id)
            .ok_or_else(|| Error::validation(path, "current user is unknown, log in first"))?;

        let module = Rap2Module {
            id: Some(0),
            name: Some(request.name.clone()),
            description: request.description.clone(),
            priority: Some(0),
            creator_id: Some(creator_id),
            repository_id: Some(repository_id),
            interfaces: None,
        };
        let data = self.request_post(path, &module)?;
        decode(path, &data)
    }

    /// Fetch one interface with its properties
    pub fn get_interface(&self, id: i64) -> Result<Option<Rap2Interface>> {
        require_id(paths::GET_INTERFACE, "id", id)?;
        let path = paths::get_interface(id);
        let data = self.request_get(&path)?;
        if data == "null" {
            return Ok(None);
        }
        decode_interface(&path, &data).map(Some)
    }

    pub fn create_interface(&self, itf: &Rap2InterfaceBase) -> Result<Rap2Interface> {
        let path = paths::CREATE_INTERFACE;
        require_field(path, "repositoryId", itf.repository_id)?;
        require_field(path, "moduleId", itf.module_id)?;
        let data = self.request_post(path, itf)?;
        decode_interface(path, &data)
    }

    pub fn update_interface(&self, itf: &Rap2InterfaceBase) -> Result<Rap2Interface> {
        let path = paths::UPDATE_INTERFACE;
        require_field(path, "id", itf.id)?;
        require_field(path, "repositoryId", itf.repository_id)?;
        require_field(path, "moduleId", itf.module_id)?;
        let data = self.request_post(path, itf)?;
        decode_interface(path, &data)
    }

    /// Replace the request and response properties of an interface
    pub fn update_interface_properties(
        &self,
        request: &UpdatePropertiesRequest,
    ) -> Result<Rap2Interface> {
        let interface_id =
            require_field(paths::UPDATE_INTERFACE_PROPERTIES, "interfaceId", request.interface_id)?;
        let path = paths::update_interface_properties(interface_id);
        let data = self.request_post(&path, request)?;
        decode_interface(&path, &data)
    }

    /// Authenticated GET returning the `data` payload as JSON text
    pub fn request_get(&self, path: &str) -> Result<String> {
        self.execute(path, |cookies| self.transport.get(path, Some(cookies)))
    }

    /// Authenticated JSON POST returning the `data` payload as JSON text
    pub fn request_post<B>(&self, path: &str, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        self.execute(path, |cookies| {
            self.transport.post_json(path, body, Some(cookies))
        })
    }

    fn execute<F>(&self, path: &str, send: F) -> Result<String>
    where
        F: Fn(&str) -> Result<HttpReply>,
    {
        let session = self.auth.ensure_session(false)?;
        debug!("Requesting {}", path);
        let message = match interpret(path, &send(&session.cookies)?)? {
            Reply::Data(data) => return Ok(data),
            Reply::Denied(message) => message,
        };

        warn!("Session refused on {} ({}), logging in again", path, message);
        let session = self.auth.refresh_rejected(&session)?;
        match interpret(path, &send(&session.cookies)?)? {
            Reply::Data(data) => Ok(data),
            Reply::Denied(message) => Err(Error::auth(path, message)),
        }
    }
}

/// Builder for [`Rap2Client`]
pub struct Rap2ClientBuilder {
    url: String,
    credentials: Option<(String, String)>,
    session: Option<Session>,
    user: Option<Rap2User>,
    session_ttl: Duration,
    timeout: StdDuration,
    user_agent: String,
    solver: Option<Arc<dyn CaptchaSolver>>,
}

impl Rap2ClientBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            session: None,
            user: None,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            timeout: StdDuration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            solver: None,
        }
    }

    pub fn credentials(mut self, account: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((account.into(), password.into()));
        self
    }

    /// Start from a previously issued session
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// User that owns the restored session
    pub fn user(mut self, user: Rap2User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Solve captchas automatically whenever a login is needed
    pub fn captcha_solver(mut self, solver: Arc<dyn CaptchaSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn build(self) -> Result<Rap2Client> {
        if self.session_ttl <= Duration::zero() {
            return Err(Error::validation(paths::LOGIN, "session TTL must be positive"));
        }
        let credentials = self
            .credentials
            .map(|(account, password)| Credentials::new(account, password))
            .transpose()?;

        let transport = Arc::new(Transport::new(&self.url, self.timeout, &self.user_agent)?);
        let mut auth = AuthManager::new(Arc::clone(&transport), credentials, self.session_ttl);
        if let Some(solver) = self.solver {
            auth = auth.with_solver(solver);
        }
        if let Some(session) = self.session {
            auth.restore(session, self.user);
        }

        Ok(Rap2Client { transport, auth })
    }
}

fn require_id(path: &str, field: &str, id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(Error::validation(path, format!("{field} must be positive, got {id}")));
    }
    Ok(id)
}

fn require_field(path: &str, field: &str, value: Option<i64>) -> Result<i64> {
    let id = value.ok_or_else(|| Error::validation(path, format!("{field} can't be null")))?;
    require_id(path, field, id)
}

fn decode_optional<T: DeserializeOwned>(path: &str, data: &str) -> Result<Option<T>> {
    if data == "null" {
        return Ok(None);
    }
    decode(path, data).map(Some)
}

/// Decode an interface, unwrapping `{"itf": {...}}` when present
fn decode_interface(path: &str, data: &str) -> Result<Rap2Interface> {
    let value: Value = decode(path, data)?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("itf") => map.remove("itf").unwrap_or_default(),
        other => other,
    };
    serde_path_to_error::deserialize(value).map_err(|e| Error::decode(path, e.to_string()))
}

//! # Authentication Manager
//!
//! The [`AuthManager`] owns the authenticated [`Session`] and the logged-in
//! [`Rap2User`] of one client and is the only place either is mutated.
//!
//! ## State machine
//!
//! - `NoSession` → login succeeds → `Valid`
//! - `Valid` → expiry passes, or the server refuses the session → `Stale`
//! - `Stale` → refresh → `Valid`, or `NoSession` when the login fails
//!
//! A failed refresh is never retried automatically: Rap2 wants a freshly
//! solved captcha for every login attempt.
//!
//! ## Login sequence
//!
//! 1. Pick the captcha solution: the one handed to [`AuthManager::login`]
//!    (together with the cookie of the preceding [`AuthManager::fetch_captcha`]),
//!    or, when a [`CaptchaSolver`] is configured, a freshly fetched and solved
//!    captcha.
//! 2. `POST /account/login` with `{email, password, captcha}`. The captcha
//!    cookie rides along on this request only.
//! 3. Decode the user, mint a [`Session`] from the reply cookies, store both.
//!
//! ## Concurrency
//!
//! The whole state sits behind one mutex that is held for the duration of a
//! login, so at most one login request per client reaches the server. Callers
//! queued behind a login re-check the session before starting another. The
//! [`CaptchaSolver`] is invoked under that lock and must not re-enter the
//! client.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rap2_client::session::{AuthManager, Credentials};
//! use rap2_client::transport::Transport;
//!
//! # fn example() -> rap2_client::Result<()> {
//! let transport = Arc::new(Transport::new("http://rap2.example.com", Duration::from_secs(30), "rap2")?);
//! let credentials = Credentials::new("admin@example.com", "secret")?;
//! let auth = AuthManager::new(transport, Some(credentials), chrono::Duration::hours(24));
//!
//! let captcha = auth.fetch_captcha()?;
//! std::fs::write("captcha.svg", &captcha.image)?;
//! let user = auth.login("x7kq")?;
//! println!("logged in as {:?}", user.fullname);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::captcha::{Captcha, CaptchaSolver};
use super::state::{Session, SessionStatus};
use crate::client::paths;
use crate::transport::reply::{is_rejection_envelope, truncate_body};
use crate::transport::{Reply, Transport, decode, interpret};
use crate::types::{LoginRequest, Rap2User};
use crate::{Error, Result};

/// Account and password used to log in
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    account: String,
    password: String,
}

impl Credentials {
    /// Create credentials; both parts must be non-empty
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let account = account.into();
        let password = password.into();
        if account.trim().is_empty() {
            return Err(Error::validation(paths::LOGIN, "account can't be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation(paths::LOGIN, "password can't be empty"));
        }
        Ok(Self { account, password })
    }

    /// Login account (email)
    pub fn account(&self) -> &str {
        &self.account
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default)]
struct AuthState {
    session: Option<Session>,
    current_user: Option<Rap2User>,
    /// Solution handed to `login`, consumed by the next login request
    captcha_solution: Option<String>,
    /// Cookie from the last captcha fetch, consumed by the next login request
    captcha_session: Option<String>,
}

/// Owner of one client's session
pub struct AuthManager {
    transport: Arc<Transport>,
    credentials: Option<Credentials>,
    session_ttl: Duration,
    solver: Option<Arc<dyn CaptchaSolver>>,
    state: Mutex<AuthState>,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("base_url", &self.transport.base_url())
            .field("credentials", &self.credentials)
            .field("session_ttl", &self.session_ttl)
            .field("has_solver", &self.solver.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a manager with no session yet
    ///
    /// Without credentials every refresh fails with an auth error, so such a
    /// manager is only useful after [`AuthManager::restore`].
    pub fn new(
        transport: Arc<Transport>,
        credentials: Option<Credentials>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            transport,
            credentials,
            session_ttl,
            solver: None,
            state: Mutex::new(AuthState::default()),
        }
    }

    /// Solve captchas automatically when a refresh needs one
    pub fn with_solver(mut self, solver: Arc<dyn CaptchaSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Install a previously issued session, e.g. one loaded from settings
    pub fn restore(&self, session: Session, user: Option<Rap2User>) {
        let mut state = self.lock();
        state.session = Some(session);
        if user.is_some() {
            state.current_user = user;
        }
    }

    /// Whether a refresh can log in again
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Lifetime given to sessions minted by a login
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Current session, valid or not
    pub fn session(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// User recorded by the last successful login or restore
    pub fn current_user(&self) -> Option<Rap2User> {
        self.lock().current_user.clone()
    }

    /// Current state machine position
    pub fn status(&self) -> SessionStatus {
        SessionStatus::of(self.lock().session.as_ref())
    }

    /// Drop the current session; the next call logs in again
    pub fn invalidate(&self) {
        self.lock().session = None;
    }

    /// Fetch a captcha image and remember its cookie for the next login
    pub fn fetch_captcha(&self) -> Result<Captcha> {
        let mut state = self.lock();
        state.captcha_session = None;
        let (captcha, cookies) = self.request_captcha()?;
        state.captcha_session = cookies;
        Ok(captcha)
    }

    /// Log in with a captcha solution, replacing any current session
    pub fn login(&self, captcha: &str) -> Result<Rap2User> {
        let mut state = self.lock();
        state.captcha_solution = Some(captcha.to_string());
        self.refresh_locked(&mut state)?;
        state
            .current_user
            .clone()
            .ok_or_else(|| Error::auth(paths::LOGIN, "login reply carried no user"))
    }

    /// Return a session that is valid right now
    ///
    /// With `force == false` a valid cached session is returned without any
    /// network traffic. Otherwise, or when the session is absent or expired,
    /// exactly one login round-trip is made.
    pub fn ensure_session(&self, force: bool) -> Result<Session> {
        let mut state = self.lock();
        if !force
            && let Some(session) = state.session.as_ref().filter(|s| !s.is_expired())
        {
            return Ok(session.clone());
        }
        self.refresh_locked(&mut state)
    }

    /// Replace a session the server refused
    ///
    /// If another caller already swapped `rejected` for a valid session while
    /// this one waited for the lock, that session is returned as is.
    pub fn refresh_rejected(&self, rejected: &Session) -> Result<Session> {
        let mut state = self.lock();
        if let Some(current) = state.session.as_ref()
            && current.cookies != rejected.cookies
            && !current.is_expired()
        {
            debug!("Session already refreshed by another caller");
            return Ok(current.clone());
        }
        self.refresh_locked(&mut state)
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        // The state is only assigned whole, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh_locked(&self, state: &mut AuthState) -> Result<Session> {
        match self.login_locked(state) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!("Login failed: {}", e);
                state.session = None;
                state.captcha_solution = None;
                state.captcha_session = None;
                Err(e)
            }
        }
    }

    fn login_locked(&self, state: &mut AuthState) -> Result<Session> {
        let Some(credentials) = self.credentials.as_ref() else {
            return Err(Error::auth(
                paths::LOGIN,
                "session expired and no credentials are available to log in again",
            ));
        };

        let (solution, captcha_cookies) = match state.captcha_solution.take() {
            Some(solution) => (solution, state.captcha_session.take()),
            None => match self.solver.as_ref() {
                Some(solver) => {
                    state.captcha_session = None;
                    let (captcha, cookies) = self.request_captcha()?;
                    (solver.solve(&captcha)?, cookies)
                }
                None => (String::new(), state.captcha_session.take()),
            },
        };

        let request = LoginRequest::new(credentials.account(), &credentials.password, solution);
        let reply = self
            .transport
            .post_json(paths::LOGIN, &request, captcha_cookies.as_deref())?;

        let data = match interpret(paths::LOGIN, &reply) {
            Ok(Reply::Data(data)) => data,
            Ok(Reply::Denied(message)) => return Err(Error::auth(paths::LOGIN, message)),
            Err(Error::Response { message, .. })
                if reply.status == StatusCode::UNAUTHORIZED || is_rejection_envelope(&reply) =>
            {
                return Err(Error::auth(paths::LOGIN, message));
            }
            Err(e) => return Err(e),
        };

        let user: Rap2User = decode(paths::LOGIN, &data)?;
        if user.id.is_none() {
            return Err(Error::auth(paths::LOGIN, "login reply carried no user"));
        }
        let Some(cookies) = reply.cookies else {
            return Err(Error::auth(paths::LOGIN, "login reply set no session cookie"));
        };

        let session = Session::issue(cookies, self.session_ttl);
        info!(
            "Logged in to {} as {}, session valid until {}",
            self.transport.base_url(),
            credentials.account(),
            session.expires_at
        );

        state.session = Some(session.clone());
        state.current_user = Some(user);
        Ok(session)
    }

    fn request_captcha(&self) -> Result<(Captcha, Option<String>)> {
        let reply = self.transport.get(paths::CAPTCHA, None)?;
        if !reply.status.is_success() {
            return Err(Error::response(
                paths::CAPTCHA,
                reply.status.as_u16(),
                truncate_body(&reply.text()),
            ));
        }
        let content_type = reply
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        debug!("Fetched captcha ({} bytes, {})", reply.body.len(), content_type);
        Ok((Captcha::new(reply.body, content_type), reply.cookies))
    }
}

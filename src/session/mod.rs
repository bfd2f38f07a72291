//! Session management for the Rap2 client
//!
//! This module holds the authenticated session value, the captcha challenge
//! types and the [`AuthManager`] that logs in and refreshes sessions.

pub mod captcha;
pub mod manager;
pub mod state;

pub use captcha::{Captcha, CaptchaSolver};
pub use manager::{AuthManager, Credentials};
pub use state::{Session, SessionStatus};

//! Rap2 Client - Rust Implementation
//!
//! An authenticated client for Rap2 API documentation servers. It logs in with
//! an account, a password and a captcha, caches the resulting session, logs in
//! again when the session lapses or is refused mid-request, and exposes typed
//! repository, module and interface operations over that session.
//!
//! # Architecture
//!
//! The crate is layered, leaves first:
//! - **[`Session`]**: the cookie string and expiry attached to requests
//! - **[`transport::Transport`]**: blocking GET/POST against one base URL
//! - **[`session::AuthManager`]**: owns the session, runs the captcha login
//! - **[`Rap2Client`]**: typed operations with a single retry on auth denial
//!
//! Every failure is an [`Error`] whose [`ErrorKind`] is one of validation,
//! auth or network.
//!
//! # Usage
//!
//! ```bash
//! rap2 --config ~/.config/rap2-client/config.toml login
//! rap2 modules 42
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use rap2_client::{Rap2Client, types::CreateModuleRequest};
//!
//! # fn example() -> rap2_client::Result<()> {
//! let client = Rap2Client::with_credentials("http://rap2.example.com", "admin@example.com", "secret")?;
//!
//! let captcha = client.fetch_captcha()?;
//! std::fs::write("captcha.svg", &captcha.image)?;
//! client.login("x7kq")?;
//!
//! for module in client.get_modules(42)? {
//!     println!("{:?}", module.name);
//! }
//! client.create_module(&CreateModuleRequest::new(42, "users"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;
pub mod utils;

pub use client::{Rap2Client, Rap2ClientBuilder};
pub use config::Settings;
pub use error::{Error, ErrorKind, Result};
pub use session::{Captcha, CaptchaSolver, Session, SessionStatus};
pub use types::{
    Rap2Interface, Rap2InterfaceBase, Rap2Module, Rap2Property, Rap2Repository, Rap2User,
    TestCode, TestResult,
};

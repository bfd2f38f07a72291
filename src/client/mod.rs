//! Typed Rap2 resource client
//!
//! [`Rap2Client`] is the entry point of the crate: it owns the transport and
//! the session of one server and exposes repository, module and interface
//! operations.

pub mod paths;
pub mod rap2;

pub use rap2::{DEFAULT_SESSION_TTL_HOURS, DEFAULT_TIMEOUT_SECS, Rap2Client, Rap2ClientBuilder};

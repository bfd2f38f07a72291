//! HTTP transport for the Rap2 client
//!
//! Executes single GET/POST exchanges against the server and classifies the
//! replies. Session handling lives one layer up, in [`crate::session`].

pub mod client;
pub mod reply;

pub use client::{HttpReply, Transport, collect_cookies};
pub use reply::{AUTH_DENIED_MARKER, Reply, decode, interpret, is_auth_denied};

//! Error handling for the Rap2 client
//!
//! This module defines the error type and its classification into
//! validation, authentication and network failures.

pub mod types;

pub use types::{Error, ErrorKind, Result};

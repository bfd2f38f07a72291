//! Configuration management for the Rap2 client
//!
//! Settings are read from a TOML file and `RAP2_*` environment variables, and
//! the session issued by a successful login is written back to the same file.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::{AccountSettings, LoggingSettings, ServerSettings, SessionSettings, Settings};

//! Version information

/// Crate version from `Cargo.toml`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent to the server unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = concat!("rap2-client/", env!("CARGO_PKG_VERSION"));

/// Version string shown by the CLI
pub fn get_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), VERSION)
}

//! Command line client for Rap2 servers
//!
//! Logs in once with a captcha, stores the session in the config file and
//! then reads and writes repositories, modules and interfaces with it.
//!
//! # Usage
//!
//! ```bash
//! export RAP2_URL=http://rap2.example.com RAP2_ACCOUNT=admin@example.com RAP2_PASSWORD=secret
//! rap2 login
//! rap2 modules 42
//! rap2 create-module --repository 42 --name users
//! rap2 update-properties --interface 5 properties.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rap2_client::{
    cli::{self, Command},
    config::{ConfigLoader, default_config_path},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "rap2")]
struct Cli {
    /// Config file (default: <config dir>/rap2-client/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path().context("No config directory on this platform, pass --config")?,
    };
    let settings = ConfigLoader::new().load(Some(&config_path))?;

    // Logs go to stderr so that stdout stays parseable JSON
    let level = if cli.verbose || settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run(cli.command, settings, &config_path)
}

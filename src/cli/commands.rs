//! Subcommands of the `rap2` binary
//!
//! Every command works on the settings loaded from the config file. Commands
//! that obtain a new session write it back to that file so the next run can
//! skip the captcha.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use super::prompt::PromptSolver;
use crate::session::CaptchaSolver;
use crate::types::{CreateModuleRequest, Rap2InterfaceBase, UpdatePropertiesRequest};
use crate::{Rap2Client, Settings};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in with a captcha and store the session
    Login,
    /// Check the configured account by logging in once
    Test,
    /// Show a repository with its modules and interfaces
    Repository {
        /// Repository id
        id: i64,
    },
    /// List the modules of a repository
    Modules {
        /// Repository id
        repository_id: i64,
    },
    /// Create a module in a repository
    CreateModule {
        /// Repository id
        #[arg(short, long)]
        repository: i64,
        /// Module name
        #[arg(short, long)]
        name: String,
        /// Module description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show an interface with its properties
    Interface {
        /// Interface id
        id: i64,
    },
    /// Create an interface from a JSON file
    CreateInterface {
        /// JSON file holding the interface
        file: PathBuf,
    },
    /// Update an interface from a JSON file
    UpdateInterface {
        /// JSON file holding the interface, including its id
        file: PathBuf,
    },
    /// Replace the properties of an interface from a JSON file
    UpdateProperties {
        /// Interface id
        #[arg(short, long)]
        interface: i64,
        /// JSON file holding `{"properties": [...], "summary": {...}}`
        file: PathBuf,
    },
}

/// Run one command against the loaded settings
pub fn run(command: Command, mut settings: Settings, config_path: &Path) -> Result<()> {
    debug!("Running {:?} with config {}", command, config_path.display());
    let settings = &mut settings;

    match command {
        Command::Login => login(settings, config_path),
        Command::Test => test(settings, config_path),
        Command::Repository { id } => query(settings, config_path, |c| c.get_repository(id)),
        Command::Modules { repository_id } => {
            query(settings, config_path, |c| c.get_modules(repository_id))
        }
        Command::CreateModule {
            repository,
            name,
            description,
        } => {
            let mut request = CreateModuleRequest::new(repository, name);
            if let Some(description) = description {
                request = request.with_description(description);
            }
            query(settings, config_path, |c| c.create_module(&request))
        }
        Command::Interface { id } => query(settings, config_path, |c| c.get_interface(id)),
        Command::CreateInterface { file } => {
            let itf: Rap2InterfaceBase = read_json(&file)?;
            query(settings, config_path, |c| c.create_interface(&itf))
        }
        Command::UpdateInterface { file } => {
            let itf: Rap2InterfaceBase = read_json(&file)?;
            query(settings, config_path, |c| c.update_interface(&itf))
        }
        Command::UpdateProperties { interface, file } => {
            let mut request: UpdatePropertiesRequest = read_json(&file)?;
            request.interface_id = Some(interface);
            query(settings, config_path, |c| c.update_interface_properties(&request))
        }
    }
}

fn login(settings: &mut Settings, config_path: &Path) -> Result<()> {
    require_account(settings)?;
    let client = settings.build_client(None)?;

    let captcha = client.fetch_captcha()?;
    let solution = PromptSolver::default().solve(&captcha)?;
    let user = client.login(&solution)?;

    if let Some(session) = client.session() {
        settings.remember(&session, Some(user.clone()));
        settings.save(config_path)?;
        info!("Session stored in {}", config_path.display());
    }
    print_json(&user)
}

fn test(settings: &mut Settings, config_path: &Path) -> Result<()> {
    require_account(settings)?;
    let result = settings.test_settings(Some(prompt_solver()))?;
    if result.is_ok() {
        settings.save(config_path)?;
    }

    print_json(&json!({
        "code": result.code,
        "expiresAt": result.session.as_ref().map(|s| s.expires_at),
        "message": result.message,
    }))?;
    if !result.is_ok() {
        bail!("Connection test failed");
    }
    Ok(())
}

/// Run one resource operation, persisting any session obtained on the way
fn query<T, F>(settings: &mut Settings, config_path: &Path, op: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&Rap2Client) -> crate::Result<T>,
{
    let client = settings.build_client(Some(prompt_solver()))?;
    let before = client.session();

    let result = op(&client);

    let after = client.session();
    if let Some(session) = after.as_ref()
        && after != before
    {
        settings.remember(session, client.current_user());
        settings.save(config_path)?;
        info!("Session refreshed and stored in {}", config_path.display());
    }

    print_json(&result?)
}

fn prompt_solver() -> Arc<dyn CaptchaSolver> {
    Arc::new(PromptSolver::default())
}

fn require_account(settings: &Settings) -> Result<()> {
    if !settings.is_valid() {
        bail!(
            "Server url, account and password are required \
             (set them in the config file or via RAP2_URL, RAP2_ACCOUNT and RAP2_PASSWORD)"
        );
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let deserializer = &mut serde_json::Deserializer::from_str(&content);
    serde_path_to_error::deserialize(deserializer)
        .with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

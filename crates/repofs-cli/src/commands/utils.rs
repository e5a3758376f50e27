use std::path::PathBuf;

use anyhow::{Context, Result};
use repofs::RepositoryClient;
use tokio::runtime::Runtime;
use tracing::debug;

use super::Cli;
use crate::config::{Config, RemoteOverrides};

/// A connected client plus the runtime that drives it.
pub struct Session {
    pub client: RepositoryClient,
    pub rt: Runtime,
}

/// Config file location: `--config`/`REPOFS_CONFIG`, else the default path.
pub fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(Config::default_path)
}

/// Load the config file and layer flag/environment overrides on top.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match config_path(cli) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Config::load(&path)?
        }
        None => Config::default(),
    };

    config.apply(&RemoteOverrides {
        api: cli.remote.api.clone(),
        owner: cli.remote.owner.clone(),
        repo: cli.remote.repo.clone(),
        branch: cli.remote.branch.clone(),
    });
    Ok(config)
}

/// Helper to build the client and runtime.
pub fn open_session(cli: &Cli) -> Result<Session> {
    let config = load_config(cli)?;
    let token_env = config.remote.token_env.clone();
    let client = RepositoryClient::new(config.client_config()?)
        .with_context(|| format!("Failed to create client (token is read from ${token_env})"))?;
    let rt = Runtime::new()?;
    Ok(Session { client, rt })
}

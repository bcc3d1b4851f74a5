//! Command handlers for the adg-analyze CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod analyze;
pub mod classify;
pub mod config;

use anyhow::{Context, Result};
use std::path::Path;

use adg_analyzer::Config;

/// Load configuration from `path` (or the default location) and apply the
/// `ABLETON_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)?
        }
        None => Config::load()?,
    };

    let applied = config.apply_env_overrides();
    if !applied.is_empty() {
        tracing::debug!("Environment overrides applied: {}", applied.join(", "));
    }
    config
        .analyzer
        .validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid configuration after environment overrides")?;
    Ok(config)
}

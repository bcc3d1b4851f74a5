//! Config subcommands handler

use anyhow::Result;
use std::path::Path;

use adg_analyzer::Config;

use super::load_config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    print!("{}", toml_str);
    Ok(())
}

/// Print the config file location (the explicit one if given).
#[cfg(not(tarpaulin_include))]
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

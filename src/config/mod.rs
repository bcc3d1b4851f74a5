//! Configuration management for the analyzer
//!
//! Settings come from `~/.config/adg-analyzer/config.toml` (or an explicit
//! path), then `ABLETON_*` environment variables override the numeric limits.

mod env;
mod io;
mod types;

pub use env::{
    apply_overrides, ENV_ANALYSIS_TIMEOUT, ENV_MAX_FILE_SIZE, ENV_MAX_MEMORY_USAGE,
    ENV_STREAM_PARSING_THRESHOLD,
};
pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Get the config file path (~/.config/adg-analyzer/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/adg-analyzer)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Apply `ABLETON_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Vec<&'static str> {
        env::apply_overrides(&mut self.analyzer, |name| std::env::var(name).ok())
    }

    /// Directory for the file cache backend, with `~/` expanded
    pub fn cache_directory(&self) -> Option<PathBuf> {
        let dir = self.cache.directory.as_deref()?;
        if let Some(stripped) = dir.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return Some(home.join(stripped));
            }
        }
        Some(PathBuf::from(dir))
    }
}

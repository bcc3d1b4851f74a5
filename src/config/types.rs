//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rack::{DepthLimitPolicy, DEFAULT_MAX_DEPTH};

const MB: u64 = 1024 * 1024;

/// Upper bound for `max_depth`; recursion depth follows it directly.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Limits and feature switches for the rack analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Deepest device level kept; deeper subtrees are dropped
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Largest accepted input file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Process memory ceiling in bytes, checked while decoding and before parsing
    #[serde(default = "default_max_memory_usage")]
    pub max_memory_usage: u64,
    /// Wall-clock limit per file in seconds
    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout_secs: u64,
    /// Inputs above this many bytes are decoded in streaming mode
    #[serde(default = "default_stream_parsing_threshold")]
    pub stream_parsing_threshold: u64,
    /// How long a cached result stays valid, in seconds
    #[serde(default = "default_cache_lifetime")]
    pub cache_lifetime_secs: u64,
    #[serde(default = "default_true")]
    pub enable_caching: bool,
    #[serde(default = "default_true")]
    pub enable_error_recovery: bool,
    #[serde(default = "default_true")]
    pub detect_edition: bool,
    #[serde(default = "default_true")]
    pub enable_security_checks: bool,
    #[serde(default = "default_true")]
    pub enable_metadata_enrichment: bool,
    #[serde(default)]
    pub depth_limit_policy: DepthLimitPolicy,
    /// Extra tag -> display name entries, merged over the built-in table
    #[serde(default)]
    pub custom_device_mappings: BTreeMap<String, String>,
}

pub fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

pub fn default_max_file_size() -> u64 {
    100 * MB
}

pub fn default_max_memory_usage() -> u64 {
    512 * MB
}

pub fn default_analysis_timeout() -> u64 {
    300
}

pub fn default_stream_parsing_threshold() -> u64 {
    10 * MB
}

pub fn default_cache_lifetime() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_file_size: default_max_file_size(),
            max_memory_usage: default_max_memory_usage(),
            analysis_timeout_secs: default_analysis_timeout(),
            stream_parsing_threshold: default_stream_parsing_threshold(),
            cache_lifetime_secs: default_cache_lifetime(),
            enable_caching: true,
            enable_error_recovery: true,
            detect_edition: true,
            enable_security_checks: true,
            enable_metadata_enrichment: true,
            depth_limit_policy: DepthLimitPolicy::default(),
            custom_device_mappings: BTreeMap::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Set the maximum device depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the per-file timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.analysis_timeout_secs = secs;
        self
    }

    /// Enable or disable result caching.
    pub fn caching(mut self, enabled: bool) -> Self {
        self.enable_caching = enabled;
        self
    }

    /// Enable or disable partial recovery after a failed parse.
    pub fn error_recovery(mut self, enabled: bool) -> Self {
        self.enable_error_recovery = enabled;
        self
    }

    /// Add a custom device mapping.
    pub fn map_device(mut self, tag: impl Into<String>, name: impl Into<String>) -> Self {
        self.custom_device_mappings.insert(tag.into(), name.into());
        self
    }

    /// Validate limits. Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("analyzer.max_depth must be > 0".to_string());
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(format!(
                "analyzer.max_depth {} exceeds maximum ({})",
                self.max_depth, MAX_DEPTH_LIMIT
            ));
        }
        if self.max_file_size == 0 {
            return Err("analyzer.max_file_size must be > 0".to_string());
        }
        if self.max_memory_usage == 0 {
            return Err("analyzer.max_memory_usage must be > 0".to_string());
        }
        if self.analysis_timeout_secs == 0 {
            return Err("analyzer.analysis_timeout_secs must be > 0".to_string());
        }
        for (tag, name) in &self.custom_device_mappings {
            if tag.trim().is_empty() || name.trim().is_empty() {
                return Err(format!(
                    "analyzer.custom_device_mappings has an empty entry ('{}' = '{}')",
                    tag, name
                ));
            }
        }
        Ok(())
    }
}

/// Which cache backend the CLI wires into the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local LRU
    #[default]
    Memory,
    /// JSON files in `cache.directory`, shared between processes
    File,
    None,
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Directory for the file backend (defaults to the system temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Entry limit for the memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

pub fn default_max_entries() -> usize {
    crate::cache::DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            directory: None,
            max_entries: default_max_entries(),
        }
    }
}

//! Unit tests for config module

use adg_analyzer::config::{
    apply_overrides, CacheBackend, ENV_ANALYSIS_TIMEOUT, ENV_MAX_FILE_SIZE, MAX_DEPTH_LIMIT,
};
use adg_analyzer::rack::DepthLimitPolicy;
use adg_analyzer::{AnalyzerConfig, Config};
use tempfile::TempDir;

#[test]
fn default_config_has_expected_values() {
    let config = AnalyzerConfig::default();
    assert_eq!(config.max_depth, 15);
    assert_eq!(config.max_file_size, 100 * 1024 * 1024);
    assert_eq!(config.max_memory_usage, 512 * 1024 * 1024);
    assert_eq!(config.analysis_timeout_secs, 300);
    assert_eq!(config.stream_parsing_threshold, 10 * 1024 * 1024);
    assert_eq!(config.cache_lifetime_secs, 3600);
    assert!(config.enable_caching);
    assert!(config.enable_error_recovery);
    assert!(config.detect_edition);
    assert!(config.enable_security_checks);
    assert!(config.enable_metadata_enrichment);
    assert_eq!(config.depth_limit_policy, DepthLimitPolicy::Silent);
    assert!(config.custom_device_mappings.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn config_serialization_roundtrip() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn partial_toml_keeps_defaults() {
    let toml_str = r#"
[analyzer]
max_depth = 4
depth_limit_policy = "warn_once"

[analyzer.custom_device_mappings]
MyDevice = "My Device"

[cache]
backend = "file"
directory = "/tmp/racks"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.analyzer.max_depth, 4);
    assert_eq!(config.analyzer.depth_limit_policy, DepthLimitPolicy::WarnOnce);
    assert_eq!(config.analyzer.analysis_timeout_secs, 300);
    assert_eq!(
        config.analyzer.custom_device_mappings.get("MyDevice").map(String::as_str),
        Some("My Device")
    );
    assert_eq!(config.cache.backend, CacheBackend::File);
    assert_eq!(config.cache.max_entries, 256);
}

#[test]
fn validate_rejects_bad_limits() {
    assert!(AnalyzerConfig::default().max_depth(0).validate().is_err());
    assert!(AnalyzerConfig::default()
        .max_depth(MAX_DEPTH_LIMIT + 1)
        .validate()
        .is_err());
    assert!(AnalyzerConfig::default().timeout(0).validate().is_err());
    assert!(AnalyzerConfig::default()
        .map_device("Tag", " ")
        .validate()
        .is_err());

    let mut config = AnalyzerConfig::default();
    config.max_file_size = 0;
    assert!(config.validate().is_err());

    // A streaming threshold above the size limit just disables streaming
    let mut config = AnalyzerConfig::default();
    config.stream_parsing_threshold = config.max_file_size * 2;
    assert!(config.validate().is_ok());
}

#[test]
fn load_from_missing_file_returns_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.analyzer = config.analyzer.max_depth(7).map_device("Foo", "Foo Device");
    config.cache.backend = CacheBackend::None;

    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn load_rejects_invalid_files() {
    let dir = TempDir::new().unwrap();
    let garbage = dir.path().join("garbage.toml");
    std::fs::write(&garbage, "analyzer = [").unwrap();
    let err = Config::load_from(&garbage).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "[analyzer]\nmax_depth = 0\n").unwrap();
    let err = Config::load_from(&invalid).unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}

#[test]
fn env_overrides_replace_limits() {
    let mut config = AnalyzerConfig::default();
    let applied = apply_overrides(&mut config, |name| match name {
        ENV_MAX_FILE_SIZE => Some("4096".to_string()),
        ENV_ANALYSIS_TIMEOUT => Some("not-a-number".to_string()),
        _ => None,
    });

    assert_eq!(applied, vec![ENV_MAX_FILE_SIZE]);
    assert_eq!(config.max_file_size, 4096);
    assert_eq!(config.analysis_timeout_secs, 300);
}

#[test]
fn cache_directory_expands_home() {
    let mut config = Config::default();
    assert!(config.cache_directory().is_none());

    config.cache.directory = Some("/var/cache/racks".to_string());
    assert_eq!(
        config.cache_directory().unwrap(),
        std::path::PathBuf::from("/var/cache/racks")
    );

    config.cache.directory = Some("~/racks".to_string());
    if let Some(home) = dirs::home_dir() {
        assert_eq!(config.cache_directory().unwrap(), home.join("racks"));
    }
}

//! Environment variable overrides for analyzer limits.

use super::types::AnalyzerConfig;

pub const ENV_MAX_FILE_SIZE: &str = "ABLETON_MAX_FILE_SIZE";
pub const ENV_MAX_MEMORY_USAGE: &str = "ABLETON_MAX_MEMORY_USAGE";
pub const ENV_ANALYSIS_TIMEOUT: &str = "ABLETON_ANALYSIS_TIMEOUT";
pub const ENV_STREAM_PARSING_THRESHOLD: &str = "ABLETON_STREAM_PARSING_THRESHOLD";

/// Apply overrides from `lookup`. Unparseable or zero values are ignored
/// with a warning. Returns the names of the variables that took effect.
pub fn apply_overrides<F>(config: &mut AnalyzerConfig, lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    let targets: [(&'static str, &mut u64); 4] = [
        (ENV_MAX_FILE_SIZE, &mut config.max_file_size),
        (ENV_MAX_MEMORY_USAGE, &mut config.max_memory_usage),
        (ENV_ANALYSIS_TIMEOUT, &mut config.analysis_timeout_secs),
        (ENV_STREAM_PARSING_THRESHOLD, &mut config.stream_parsing_threshold),
    ];

    for (name, slot) in targets {
        let Some(raw) = lookup(name) else {
            continue;
        };
        match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => {
                *slot = value;
                applied.push(name);
            }
            _ => tracing::warn!("Ignoring {}={:?}: expected a positive integer", name, raw),
        }
    }
    applied
}

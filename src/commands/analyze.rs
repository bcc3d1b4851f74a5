//! Analyze command handler
//!
//! Builds one `RackAnalyzer` (with the configured cache backend) and runs it
//! over every file on a rayon pool. Results print to stdout as JSON in input
//! order; validation failures go to stderr.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{json, Value};

use adg_analyzer::config::CacheBackend;
use adg_analyzer::{
    AnalysisCache, AnalysisError, Config, FileCache, MemoryCache, RackAnalysis, RackAnalyzer,
};

use super::load_config;
use crate::cli::AnalyzeArgs;

/// Analyze the files named in `args`.
///
/// Returns `false` when at least one file failed validation.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &AnalyzeArgs, config_path: Option<&Path>) -> Result<bool> {
    let mut config = load_config(config_path)?;
    if let Some(depth) = args.max_depth {
        config.analyzer.max_depth = depth;
        config
            .analyzer
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid --max-depth: {}", e))?;
    }
    if args.no_cache {
        config.analyzer.enable_caching = false;
    }

    let mut analyzer = RackAnalyzer::new(config.analyzer.clone());
    if let Some(cache) = build_cache(&config, args) {
        analyzer = analyzer.with_cache(cache);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .thread_name(|i| format!("analyzer-{}", i))
        .build()
        .context("Failed to create thread pool")?;

    let outcomes: Vec<Result<RackAnalysis, AnalysisError>> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| analyzer.analyze(path))
            .collect()
    });

    let mut all_valid = true;
    let mut reports = Vec::with_capacity(outcomes.len());
    for (path, outcome) in args.files.iter().zip(outcomes) {
        match outcome {
            Ok(analysis) => {
                reports.push(serde_json::to_value(&analysis).context("Failed to serialize result")?)
            }
            Err(e) => {
                all_valid = false;
                eprintln!("Skipped {}: {}", path.display(), describe(&e));
                reports.push(error_report(path, &e));
            }
        }
    }

    let output = if reports.len() == 1 {
        reports.remove(0)
    } else {
        Value::Array(reports)
    };
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(all_valid)
}

/// Cache backend for this run. `--cache-dir` wins over the config file.
fn build_cache(config: &Config, args: &AnalyzeArgs) -> Option<Arc<dyn AnalysisCache>> {
    if args.no_cache {
        return None;
    }
    if let Some(dir) = &args.cache_dir {
        return Some(Arc::new(FileCache::new(dir)));
    }
    match config.cache.backend {
        CacheBackend::Memory => Some(Arc::new(MemoryCache::new(config.cache.max_entries))),
        CacheBackend::File => Some(Arc::new(
            config
                .cache_directory()
                .map(FileCache::new)
                .unwrap_or_else(FileCache::in_temp_dir),
        )),
        CacheBackend::None => None,
    }
}

/// Human-readable validation failure, with sizes in binary units.
pub fn describe(err: &AnalysisError) -> String {
    match err {
        AnalysisError::FileTooLarge { size, min, max } => format!(
            "file size {} is outside the allowed range {} to {}",
            format_size(*size),
            format_size(*min),
            format_size(*max)
        ),
        AnalysisError::MemoryLimitExceeded { used, limit } => format!(
            "not enough memory headroom ({} needed, limit {})",
            format_size(*used),
            format_size(*limit)
        ),
        other => other.to_string(),
    }
}

fn error_report(path: &Path, err: &AnalysisError) -> Value {
    json!({
        "file": path.display().to_string(),
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}

fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

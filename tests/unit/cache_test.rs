//! Unit tests for result caching through the analyzer

use std::sync::Arc;
use std::time::Duration;

use adg_analyzer::cache::cache_key;
use adg_analyzer::hash::sha256_hex;
use adg_analyzer::{AnalysisCache, AnalyzerConfig, FileCache, MemoryCache, RackAnalysis, RackAnalyzer};
use tempfile::TempDir;

use super::helpers::{fixture_adg, gzip, gzip_with_mtime, load_fixture, without_timing};

fn from_cache(analysis: &RackAnalysis) -> bool {
    analysis
        .performance_metrics
        .as_ref()
        .is_some_and(|m| m.from_cache)
}

fn cached_analyzer(cache: Arc<MemoryCache>) -> RackAnalyzer {
    RackAnalyzer::new(AnalyzerConfig::default()).with_cache(cache)
}

#[test]
fn identical_bytes_hit_the_cache_under_any_name() {
    let cache = Arc::new(MemoryCache::new(16));
    let analyzer = cached_analyzer(Arc::clone(&cache));
    let bytes = fixture_adg("bass_rack.xml");

    let first = analyzer.analyze_bytes("one.adg", &bytes).unwrap();
    let second = analyzer.analyze_bytes("two.adg", &bytes).unwrap();

    assert_eq!(cache.len(), 1);
    assert!(!from_cache(&first));
    assert!(from_cache(&second));
    assert_eq!(second.analysis_time_ms, first.analysis_time_ms);
    assert_eq!(without_timing(first), without_timing(second));
}

#[test]
fn cached_value_is_returned_unchanged() {
    let cache = Arc::new(MemoryCache::new(16));
    let bytes = fixture_adg("bass_rack.xml");
    let key = cache_key(&sha256_hex(&bytes));
    let planted = RackAnalysis::new("Planted", "h");
    cache.set(&key, &planted, Duration::from_secs(60));

    let analysis = cached_analyzer(cache).analyze_bytes("rack.adg", &bytes).unwrap();
    assert_eq!(analysis, planted);
}

#[test]
fn one_byte_difference_misses() {
    let cache = Arc::new(MemoryCache::new(16));
    let xml = load_fixture("bass_rack.xml");
    let original = gzip(xml.as_bytes());
    let altered = gzip_with_mtime(xml.as_bytes(), 1);
    let differing = original.iter().zip(&altered).filter(|(a, b)| a != b).count();
    assert_eq!((original.len(), differing), (altered.len(), 1));

    let key = cache_key(&sha256_hex(&original));
    cache.set(&key, &RackAnalysis::new("Planted", "h"), Duration::from_secs(60));

    let analysis = cached_analyzer(Arc::clone(&cache))
        .analyze_bytes("rack.adg", &altered)
        .unwrap();
    assert_eq!(analysis.rack_name, "Sub Bass");
    assert_eq!(cache.len(), 2);
}

#[test]
fn failed_results_are_not_cached() {
    let cache = Arc::new(MemoryCache::new(16));
    let bytes = gzip("not xml at all, just words and more words ".repeat(4).as_bytes());
    let analysis = cached_analyzer(Arc::clone(&cache))
        .analyze_bytes("bad.adg", &bytes)
        .unwrap();

    assert!(!analysis.is_valid());
    assert!(cache.is_empty());
}

#[test]
fn caching_switch_bypasses_cache() {
    let cache = Arc::new(MemoryCache::new(16));
    let analyzer =
        RackAnalyzer::new(AnalyzerConfig::default().caching(false)).with_cache(cache.clone());
    analyzer
        .analyze_bytes("rack.adg", &fixture_adg("bass_rack.xml"))
        .unwrap();
    assert!(cache.is_empty());
}

#[test]
fn file_cache_is_shared_between_analyzers() {
    let dir = TempDir::new().unwrap();
    let bytes = fixture_adg("nested_fx_rack.xml");

    let first = RackAnalyzer::default()
        .with_cache(Arc::new(FileCache::new(dir.path())))
        .analyze_bytes("Space.adg", &bytes)
        .unwrap();
    let second = RackAnalyzer::default()
        .with_cache(Arc::new(FileCache::new(dir.path())))
        .analyze_bytes("Space.adg", &bytes)
        .unwrap();

    assert!(from_cache(&second));
    let key = cache_key(&first.file_hash);
    assert_eq!(without_timing(first), without_timing(second));
    assert!(dir.path().join(format!("{}.json", key)).exists());
}

//! `RackAnalyzer` facade for analyzing rack files.
//!
//! # Workflow
//!
//! 1. Validate the file (existence, size, extension, memory headroom)
//! 2. Hash the content and consult the cache
//! 3. Decompress and parse under the per-file deadline
//! 4. Extract the chain/device tree, version and macros
//! 5. Enrich metadata and infer the required edition
//! 6. Cache valid results
//!
//! Only step 1 reports failure as `Err`. Anything that goes wrong later is
//! recorded in the returned [`RackAnalysis`], after one recovery attempt
//! that tries to salvage the rack name and version.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::deadline::Deadline;
use super::edition::analyze_edition;
use super::enrich::enrich;
use super::error::{AnalysisError, MIN_FILE_SIZE};
use super::memory;
use super::result::{PerformanceMetrics, RackAnalysis};
use crate::adg::{xml, Decompressed, Decompressor, QueryCache, Strategy};
use crate::cache::{cache_key, AnalysisCache};
use crate::config::AnalyzerConfig;
use crate::devices::DeviceClassifier;
use crate::hash;
use crate::rack::{extract_version, RackExtractor};

/// Where the raw `.adg` bytes come from.
#[derive(Clone, Copy)]
enum Source<'b> {
    File(&'b Path),
    Bytes(&'b [u8]),
}

/// Analyzes rack files. Cheap to share between threads; every call owns its
/// own deadline and query cache.
pub struct RackAnalyzer {
    config: AnalyzerConfig,
    classifier: DeviceClassifier,
    decompressor: Decompressor,
    cache: Option<Arc<dyn AnalysisCache>>,
}

impl Default for RackAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl RackAnalyzer {
    /// Create an analyzer without a cache.
    pub fn new(config: AnalyzerConfig) -> Self {
        let classifier = DeviceClassifier::new(&config.custom_device_mappings);
        let decompressor =
            Decompressor::new(config.stream_parsing_threshold, config.max_memory_usage);
        Self {
            config,
            classifier,
            decompressor,
            cache: None,
        }
    }

    /// Attach a result cache. Ignored while `enable_caching` is off.
    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn classifier(&self) -> &DeviceClassifier {
        &self.classifier
    }

    /// Analyze the rack file at `path`.
    ///
    /// # Errors
    ///
    /// Only validation failures, before any byte is parsed:
    /// - `FileNotFound` when the path is missing, unreadable or not a file
    /// - `FileTooLarge` when the size is outside `[100 bytes, max_file_size]`
    /// - `SecurityViolation` for a non-`.adg` extension (security checks on)
    /// - `MemoryLimitExceeded` when the process lacks headroom for the file
    pub fn analyze(&self, path: &Path) -> Result<RackAnalysis, AnalysisError> {
        let started = Instant::now();
        let path_str = path.display().to_string();
        let _span = tracing::debug_span!("analyze", file = %path_str).entered();

        let metadata = std::fs::metadata(path).map_err(|e| AnalysisError::from_io(&path_str, &e))?;
        if !metadata.is_file() {
            return Err(AnalysisError::FileNotFound { path: path_str });
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path_str.as_str());
        self.validate(filename, metadata.len())?;

        let file_hash =
            hash::sha256_file(path).map_err(|e| AnalysisError::from_io(&path_str, &e))?;
        let deadline = self.deadline();
        Ok(self.analyze_source(filename, Source::File(path), file_hash, started, deadline))
    }

    /// Analyze an in-memory `.adg` payload. `filename` supplies the
    /// extension check and the last-resort rack name.
    ///
    /// # Errors
    ///
    /// Same validation failures as [`analyze`](Self::analyze), minus
    /// `FileNotFound`.
    pub fn analyze_bytes(&self, filename: &str, bytes: &[u8]) -> Result<RackAnalysis, AnalysisError> {
        let started = Instant::now();
        let _span = tracing::debug_span!("analyze", file = %filename).entered();

        self.validate(filename, bytes.len() as u64)?;
        let file_hash = hash::sha256_hex(bytes);
        let deadline = self.deadline();
        Ok(self.analyze_source(filename, Source::Bytes(bytes), file_hash, started, deadline))
    }

    fn validate(&self, filename: &str, size: u64) -> Result<(), AnalysisError> {
        if size < MIN_FILE_SIZE || size > self.config.max_file_size {
            return Err(AnalysisError::FileTooLarge {
                size,
                min: MIN_FILE_SIZE,
                max: self.config.max_file_size,
            });
        }

        if self.config.enable_security_checks {
            let is_adg = Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("adg"));
            if !is_adg {
                return Err(AnalysisError::SecurityViolation(format!(
                    "Invalid file extension: {}",
                    filename
                )));
            }
        }

        memory::ensure_headroom(size, self.config.max_memory_usage)
    }

    /// Fresh per-call deadline from `analysis_timeout_secs`.
    fn deadline(&self) -> Deadline {
        Deadline::new(Duration::from_secs(self.config.analysis_timeout_secs))
    }

    fn analyze_source(
        &self,
        filename: &str,
        source: Source<'_>,
        file_hash: String,
        started: Instant,
        deadline: Deadline,
    ) -> RackAnalysis {
        let key = cache_key(&file_hash);
        let cache = self.cache.as_ref().filter(|_| self.config.enable_caching);

        if let Some(mut cached) = cache.and_then(|c| c.get(&key)) {
            tracing::info!("Cache hit for {}", filename);
            if let Some(metrics) = cached.performance_metrics.as_mut() {
                metrics.from_cache = true;
            }
            return cached;
        }

        let mut analysis = match self.run_pipeline(filename, source, &file_hash, &deadline) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {}", filename, e.tagged());
                self.recover(filename, source, &file_hash, &e)
            }
        };

        analysis.analysis_time_ms = elapsed_ms(started);
        if let Some(metrics) = analysis.performance_metrics.as_mut() {
            metrics.analysis_duration_ms = analysis.analysis_time_ms;
        }

        if analysis.is_valid() {
            if let Some(cache) = cache {
                let ttl = Duration::from_secs(self.config.cache_lifetime_secs);
                cache.set(&key, &analysis, ttl);
            }
        }
        analysis
    }

    fn decompress(
        &self,
        source: Source<'_>,
        deadline: &Deadline,
    ) -> Result<Decompressed, AnalysisError> {
        match source {
            Source::File(path) => self.decompressor.decompress_file(path, deadline),
            Source::Bytes(bytes) => self.decompressor.decompress(bytes, deadline),
        }
    }

    fn run_pipeline(
        &self,
        filename: &str,
        source: Source<'_>,
        file_hash: &str,
        deadline: &Deadline,
    ) -> Result<RackAnalysis, AnalysisError> {
        let decompressed = self.decompress(source, deadline)?;
        let strategy = decompressed.strategy;
        let decompressed_bytes = decompressed.xml.len() as u64;
        tracing::debug!("Decompressed {} bytes ({:?})", decompressed_bytes, strategy);

        let text = xml::decode_text(decompressed.xml)?;
        deadline.check()?;
        let doc = xml::parse(&text, self.config.max_memory_usage)?;

        let queries = QueryCache::new();
        let extraction = RackExtractor::new(&self.classifier, &queries, deadline)
            .max_depth(self.config.max_depth)
            .depth_limit_policy(self.config.depth_limit_policy)
            .extract(&doc, filename)?;
        let (ableton_version, version_details) = extract_version(doc.root_element());

        let mut analysis = RackAnalysis::new(extraction.rack_name, file_hash);
        analysis.rack_type = Some(extraction.rack_type);
        analysis.macro_controls = extraction.macro_controls;
        analysis.chains = extraction.chains;
        analysis.parsing_warnings = extraction.warnings;
        analysis.ableton_version = ableton_version;
        analysis.version_details = version_details;

        if self.config.enable_metadata_enrichment {
            analysis.enriched_metadata = Some(enrich(&queries, doc.root()));
        }
        deadline.check()?;

        if self.config.detect_edition {
            let edition = analyze_edition(&analysis.chains);
            analysis.required_edition = Some(edition.required_edition);
            analysis.edition_analysis = Some(edition);
        }

        analysis.performance_metrics = Some(metrics(
            Some(strategy),
            decompressed_bytes,
            &queries,
        ));
        tracing::debug!(
            "Extracted {} chains, {} devices from {}",
            analysis.chains.len(),
            analysis.total_devices(),
            filename
        );
        Ok(analysis)
    }

    /// Second attempt after a failed pipeline: decode and parse again and
    /// keep only the name and version.
    ///
    /// The retry runs under a fresh deadline of the full timeout, so a file
    /// that timed out can take up to twice `analysis_timeout_secs` in total.
    /// Environmental errors skip the retry.
    fn recover(
        &self,
        filename: &str,
        source: Source<'_>,
        file_hash: &str,
        err: &AnalysisError,
    ) -> RackAnalysis {
        let fallback_name = file_stem(filename);
        if !self.config.enable_error_recovery || err.is_environmental() {
            return RackAnalysis::error(fallback_name, file_hash, err);
        }

        let deadline = self.deadline();
        let attempt = self.decompress(source, &deadline).and_then(|decompressed| {
            let strategy = decompressed.strategy;
            let decompressed_bytes = decompressed.xml.len() as u64;
            let text = xml::decode_text(decompressed.xml)?;
            let doc = xml::parse(&text, self.config.max_memory_usage)?;

            let queries = QueryCache::new();
            let extractor = RackExtractor::new(&self.classifier, &queries, &deadline);
            let rack_name = extractor.extract_rack_name(doc.root(), None, filename);
            let (ableton_version, version_details) = extract_version(doc.root_element());

            let mut analysis = RackAnalysis::partial(rack_name, file_hash, err);
            analysis.ableton_version = ableton_version;
            analysis.version_details = version_details;
            analysis.performance_metrics =
                Some(metrics(Some(strategy), decompressed_bytes, &queries));
            Ok(analysis)
        });

        match attempt {
            Ok(analysis) => {
                tracing::warn!("Recovered partial analysis for {}", filename);
                analysis
            }
            Err(retry_err) => {
                let mut analysis = RackAnalysis::new(fallback_name, file_hash);
                analysis
                    .parsing_errors
                    .push(format!("{} | Recovery failed: {}", err.tagged(), retry_err));
                analysis
            }
        }
    }
}

fn metrics(
    strategy: Option<Strategy>,
    decompressed_bytes: u64,
    queries: &QueryCache<'_, '_>,
) -> PerformanceMetrics {
    PerformanceMetrics {
        memory_used: memory::current_usage(),
        peak_memory_used: memory::peak_usage(),
        analysis_duration_ms: 0,
        xpath_cache_hits: queries.hits(),
        xpath_cache_misses: queries.misses(),
        decompressed_bytes,
        decompression: strategy,
        from_cache: false,
    }
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

//! The analysis result value.

use serde::{Deserialize, Serialize};

use super::edition::{Edition, EditionAnalysis};
use super::enrich::EnrichedMetadata;
use super::error::AnalysisError;
use crate::adg::Strategy;
use crate::devices::RackType;
use crate::rack::{Chain, MacroControl, VersionDetails};

/// Warning attached to every partially recovered result.
pub const PARTIAL_RECOVERY_WARNING: &str = "Some data could not be extracted due to errors";

/// Everything known about one rack file.
///
/// Always structurally valid. `parsing_errors` non-empty means the file is
/// unusable for cataloguing; `parsing_warnings` are recoverable anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackAnalysis {
    pub rack_name: String,
    pub rack_type: Option<RackType>,
    pub use_case: String,
    pub macro_controls: Vec<MacroControl>,
    pub chains: Vec<Chain>,
    pub parsing_errors: Vec<String>,
    pub parsing_warnings: Vec<String>,
    pub ableton_version: Option<String>,
    pub version_details: VersionDetails,
    pub file_hash: String,
    pub analysis_time_ms: u64,
    pub performance_metrics: Option<PerformanceMetrics>,
    pub required_edition: Option<Edition>,
    pub edition_analysis: Option<EditionAnalysis>,
    pub enriched_metadata: Option<EnrichedMetadata>,
}

/// Resource usage of one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub memory_used: Option<u64>,
    pub peak_memory_used: Option<u64>,
    pub analysis_duration_ms: u64,
    pub xpath_cache_hits: u64,
    pub xpath_cache_misses: u64,
    pub decompressed_bytes: u64,
    pub decompression: Option<Strategy>,
    pub from_cache: bool,
}

impl RackAnalysis {
    /// Empty result for `rack_name`, to be filled in by the pipeline.
    pub fn new(rack_name: impl Into<String>, file_hash: impl Into<String>) -> Self {
        let rack_name = rack_name.into();
        Self {
            use_case: rack_name.clone(),
            rack_name,
            rack_type: None,
            macro_controls: Vec::new(),
            chains: Vec::new(),
            parsing_errors: Vec::new(),
            parsing_warnings: Vec::new(),
            ableton_version: None,
            version_details: VersionDetails::default(),
            file_hash: file_hash.into(),
            analysis_time_ms: 0,
            performance_metrics: None,
            required_edition: None,
            edition_analysis: None,
            enriched_metadata: None,
        }
    }

    /// Error-tagged result: no rack type, no chains, one `"CODE: message"`
    /// entry in `parsing_errors`.
    pub fn error(rack_name: impl Into<String>, file_hash: impl Into<String>, err: &AnalysisError) -> Self {
        let mut analysis = Self::new(rack_name, file_hash);
        analysis.parsing_errors.push(err.tagged());
        analysis
    }

    /// Result for a document that loaded but whose structure could not be
    /// extracted.
    pub fn partial(rack_name: impl Into<String>, file_hash: impl Into<String>, err: &AnalysisError) -> Self {
        let mut analysis = Self::new(rack_name, file_hash);
        analysis.rack_type = Some(RackType::Unknown);
        analysis
            .parsing_errors
            .push(format!("Partial parsing: {}", err.tagged()));
        analysis
            .parsing_warnings
            .push(PARTIAL_RECOVERY_WARNING.to_string());
        analysis
    }

    /// Usable for cataloguing.
    pub fn is_valid(&self) -> bool {
        self.parsing_errors.is_empty()
    }

    /// Devices across all chains, nested ones included.
    pub fn total_devices(&self) -> usize {
        self.chains.iter().map(Chain::device_count).sum()
    }
}

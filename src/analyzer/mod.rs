//! Rack analysis pipeline.
//!
//! [`RackAnalyzer`] is the entry point. It validates the file, runs the
//! [`adg`](crate::adg) and [`rack`](crate::rack) layers under a deadline and
//! a memory ceiling, then layers edition inference and metadata enrichment
//! on top of the extracted tree.
//!
//! # Module Structure
//!
//! - [`service`] - the `RackAnalyzer` facade
//! - [`result`] - the `RackAnalysis` value and its metrics
//! - [`edition`] - minimum Live edition inference
//! - [`enrich`] - optional metadata passes over the raw document
//! - [`error`] - error taxonomy and codes
//! - [`deadline`], [`memory`] - per-call resource guards

pub mod deadline;
pub mod edition;
pub mod enrich;
pub mod error;
pub mod memory;
pub mod result;
pub mod service;

pub use deadline::Deadline;
pub use edition::{analyze_edition, device_tier, Edition, EditionAnalysis};
pub use enrich::{
    AutomationMapping, ChainSelectorInfo, EnrichedMetadata, SampleReference, Zone, ZoneInfo,
};
pub use error::{AnalysisError, MIN_FILE_SIZE};
pub use result::{PerformanceMetrics, RackAnalysis, PARTIAL_RECOVERY_WARNING};
pub use service::RackAnalyzer;

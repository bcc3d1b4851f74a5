//! Rack data model and tree extraction.

pub mod extractor;
pub mod macros;
pub mod types;
pub mod version;

pub use extractor::{DepthLimitPolicy, Extraction, RackExtractor, DEFAULT_MAX_DEPTH};
pub use types::{
    flatten_devices, Chain, ChainAnnotations, Device, KeyRange, MacroControl, VelocityRange,
};
pub use version::{extract_version, VersionDetails};

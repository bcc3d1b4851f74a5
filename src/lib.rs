//! Ableton Live device rack (`.adg`) analyzer library
//!
//! Decodes gzip-compressed rack presets and extracts the signal-chain
//! topology: racks hold chains, chains hold devices, group devices hold
//! nested chains. Each file yields one [`RackAnalysis`].
//!
//! ```no_run
//! use adg_analyzer::{AnalyzerConfig, RackAnalyzer};
//!
//! let analyzer = RackAnalyzer::new(AnalyzerConfig::default());
//! let analysis = analyzer.analyze("Bass Rack.adg".as_ref())?;
//! println!("{} chains", analysis.chains.len());
//! # Ok::<(), adg_analyzer::AnalysisError>(())
//! ```

pub mod adg;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod devices;
pub mod hash;
pub mod rack;

pub use analyzer::{AnalysisError, Edition, EditionAnalysis, RackAnalysis, RackAnalyzer};
pub use cache::{AnalysisCache, FileCache, MemoryCache};
pub use config::{AnalyzerConfig, Config};
pub use devices::{DeviceClassifier, RackType};
pub use rack::{Chain, Device, MacroControl};

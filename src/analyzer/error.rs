//! Error taxonomy for rack analysis.
//!
//! `AnalysisError` covers every failure mode the pipeline can hit. Whether a
//! given error reaches the caller as `Err` or is folded into a
//! [`RackAnalysis`](crate::RackAnalysis) as data depends on the stage it came
//! from, see [`RackAnalyzer::analyze`](crate::RackAnalyzer::analyze).

use thiserror::Error;

/// Smallest file that can plausibly hold a gzip member plus a rack document.
pub const MIN_FILE_SIZE: u64 = 100;

/// Error type for analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input file is missing or unreadable.
    #[error("File not found or not readable: {path}")]
    FileNotFound { path: String },

    /// File size outside `[MIN_FILE_SIZE, max]`. Covers undersized files too.
    #[error("File size {size} bytes outside allowed range [{min}, {max}]")]
    FileTooLarge { size: u64, min: u64, max: u64 },

    #[error("Failed to decompress rack data: {0}")]
    DecompressionFailed(String),

    #[error("Failed to parse XML: {0}")]
    XmlParseError(String),

    /// No group device found that could serve as the rack root.
    #[error("Invalid rack format: {0}")]
    InvalidRackFormat(String),

    /// Wrong extension, or a DTD/entity declaration in the document.
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    #[error("Memory limit exceeded: {used} bytes in use, limit is {limit} bytes")]
    MemoryLimitExceeded { used: u64, limit: u64 },

    #[error("Analysis timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("{0}")]
    Unknown(String),
}

impl AnalysisError {
    /// Stable upper-snake code, embedded in `parsing_errors` entries.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AnalysisError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AnalysisError::DecompressionFailed(_) => "DECOMPRESSION_FAILED",
            AnalysisError::XmlParseError(_) => "XML_PARSE_ERROR",
            AnalysisError::InvalidRackFormat(_) => "INVALID_RACK_FORMAT",
            AnalysisError::SecurityViolation(_) => "SECURITY_VIOLATION",
            AnalysisError::MemoryLimitExceeded { .. } => "MEMORY_LIMIT_EXCEEDED",
            AnalysisError::Timeout { .. } => "TIMEOUT",
            AnalysisError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// `"CODE: message"`, the form stored in `parsing_errors`.
    pub fn tagged(&self) -> String {
        format!("{}: {}", self.code(), self)
    }

    /// Whether the error is about the input file or the process's memory
    /// ceiling rather than the document's contents. These never enter
    /// partial recovery.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            AnalysisError::FileNotFound { .. }
                | AnalysisError::FileTooLarge { .. }
                | AnalysisError::MemoryLimitExceeded { .. }
        )
    }

    /// Map an I/O error from reading `path`.
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                AnalysisError::FileNotFound {
                    path: path.to_string(),
                }
            }
            _ => AnalysisError::Unknown(format!("IO error reading {}: {}", path, err)),
        }
    }
}

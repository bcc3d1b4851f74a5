//! Wall-clock deadline for one analysis call.

use std::time::{Duration, Instant};

use super::error::AnalysisError;

/// Deadline checked at stage boundaries and inside long loops.
///
/// This is the only cancellation mechanism; there is no external cancel
/// signal.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    /// A deadline that never expires.
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            limit: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// # Errors
    ///
    /// `AnalysisError::Timeout` once the limit has passed.
    pub fn check(&self) -> Result<(), AnalysisError> {
        match self.limit {
            Some(limit) if self.elapsed() > limit => Err(AnalysisError::Timeout {
                secs: limit.as_secs(),
            }),
            _ => Ok(()),
        }
    }
}

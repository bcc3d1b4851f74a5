//! Process memory probes.
//!
//! Used to enforce the memory ceiling before parsing and while streaming a
//! large decode, and to report usage in performance metrics.

use super::error::AnalysisError;

/// Current resident set size in bytes, if the platform exposes it.
#[cfg(target_os = "linux")]
pub fn current_usage() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    // SAFETY: sysconf has no preconditions and only reads a constant.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }
    Some(resident_pages * page_size as u64)
}

#[cfg(not(target_os = "linux"))]
pub fn current_usage() -> Option<u64> {
    peak_usage()
}

/// Peak resident set size in bytes.
#[cfg(unix)]
pub fn peak_usage() -> Option<u64> {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: usage is a valid, writable rusage struct.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if ret != 0 {
        return None;
    }
    let max_rss = usage.ru_maxrss.max(0) as u64;
    // ru_maxrss is kilobytes on Linux, bytes on macOS
    if cfg!(target_os = "macos") {
        Some(max_rss)
    } else {
        Some(max_rss * 1024)
    }
}

#[cfg(not(unix))]
pub fn peak_usage() -> Option<u64> {
    None
}

/// Fail when `extra` bytes on top of the current process usage would exceed
/// `limit`. Platforms without a probe only count `extra`.
///
/// # Errors
///
/// `AnalysisError::MemoryLimitExceeded` with the projected usage.
pub fn ensure_headroom(extra: u64, limit: u64) -> Result<(), AnalysisError> {
    let used = current_usage().unwrap_or(0).saturating_add(extra);
    if used > limit {
        return Err(AnalysisError::MemoryLimitExceeded { used, limit });
    }
    Ok(())
}

//! Directory-backed cache shared between processes.
//!
//! One JSON file per key holding the expiry time and the result. Each write
//! goes to its own uniquely named temporary file in the cache directory and
//! is renamed into place, so readers never see a half-written entry even
//! when several writers race on the same key.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::AnalysisCache;
use crate::RackAnalysis;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    expires_at: u64,
    analysis: RackAnalysis,
}

pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache under the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("adg-analyzer-cache"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn write_entry(&self, key: &str, entry: &StoredEntry) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl AnalysisCache for FileCache {
    fn get(&self, key: &str) -> Option<RackAnalysis> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).ok()?;
        let entry: StoredEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {:?}: {}", path, e);
                let _ = fs::remove_file(&path);
                return None;
            }
        };
        if entry.expires_at <= unix_now() {
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(entry.analysis)
    }

    fn set(&self, key: &str, value: &RackAnalysis, ttl: Duration) {
        let entry = StoredEntry {
            expires_at: unix_now().saturating_add(ttl.as_secs()),
            analysis: value.clone(),
        };
        if let Err(e) = self.write_entry(key, &entry) {
            tracing::warn!("Failed to write cache entry {}: {}", key, e);
        }
    }

    fn delete(&self, key: &str) {
        let _ = fs::remove_file(self.entry_path(key));
    }

    fn clear(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                let _ = fs::remove_file(path);
            }
        }
    }
}

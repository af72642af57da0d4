//! Persistent per-file extraction cache

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::model::{ExtractionRecord, SourceFile, fingerprint};

/// Cache directory: .grove/
pub const CACHE_DIR: &str = ".grove";

/// Extraction cache file
pub const CACHE_FILE: &str = "extraction.bin";

/// One cached extraction, valid while fingerprint/mtime still match the
/// file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: u64,
    pub mtime_secs: i64,
    pub record: ExtractionRecord,
}

#[derive(Serialize, Deserialize)]
struct CacheSnapshot {
    version: String,
    saved_at: String,
    entries: BTreeMap<String, CacheEntry>,
}

/// Extraction results keyed by file path. Lookups and inserts are safe from
/// parallel extraction workers; persistence happens once per run.
pub struct ExtractionCache {
    path: PathBuf,
    entries: DashMap<String, CacheEntry>,
}

impl ExtractionCache {
    /// Load the cache persisted under `root`, or start cold. Unreadable or
    /// corrupt state is never fatal.
    pub fn open(root: &Path) -> Self {
        let path = root.join(CACHE_DIR).join(CACHE_FILE);
        let entries = DashMap::new();
        match std::fs::read(&path) {
            Ok(bytes) => match bincode::deserialize::<CacheSnapshot>(&bytes) {
                Ok(snapshot) => {
                    for (key, entry) in snapshot.entries {
                        entries.insert(key, entry);
                    }
                    tracing::debug!("loaded {} cache entries from {}", entries.len(), path.display());
                }
                Err(e) => {
                    tracing::warn!("cache at {} is unreadable, starting cold: {}", path.display(), e);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("cannot read cache at {}, starting cold: {}", path.display(), e);
            }
        }
        ExtractionCache { path, entries }
    }

    /// An in-memory cache that never persists. Used by callers that opt out
    /// of caching.
    pub fn ephemeral() -> Self {
        ExtractionCache {
            path: PathBuf::new(),
            entries: DashMap::new(),
        }
    }

    /// Return the cached extraction for `file` if still valid. Mtime is
    /// compared first as a cheap pre-filter; on mismatch the content is
    /// hashed, and an unchanged fingerprint still counts as a hit (the
    /// stored mtime is refreshed).
    pub fn lookup(&self, file: &SourceFile) -> Option<ExtractionRecord> {
        let mut entry = self.entries.get_mut(&file.rel_path)?;
        if entry.mtime_secs == file.mtime_secs {
            return Some(entry.record.clone());
        }
        if entry.fingerprint == fingerprint(&file.content) {
            entry.mtime_secs = file.mtime_secs;
            return Some(entry.record.clone());
        }
        None
    }

    /// Store or overwrite the entry for `file`.
    pub fn insert(&self, file: &SourceFile, record: ExtractionRecord) {
        self.entries.insert(
            file.rel_path.clone(),
            CacheEntry {
                fingerprint: file.fingerprint,
                mtime_secs: file.mtime_secs,
                record,
            },
        );
    }

    /// Drop entries whose file is no longer part of the project.
    pub fn retain_files<'a>(&self, live: impl IntoIterator<Item = &'a str>) {
        let live: std::collections::HashSet<&str> = live.into_iter().collect();
        self.entries.retain(|path, _| live.contains(path.as_str()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist to disk. Failure is logged, not fatal.
    pub fn flush(&self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        let snapshot = CacheSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            entries: self
                .entries
                .iter()
                .map(|kv| (kv.key().clone(), kv.value().clone()))
                .collect(),
        };
        let result = self
            .path
            .parent()
            .map(std::fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| {
                let bytes = bincode::serialize(&snapshot)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                std::fs::write(&self.path, bytes)
            });
        match result {
            Ok(()) => tracing::debug!("cache flushed to {}", self.path.display()),
            Err(e) => tracing::warn!("cannot persist cache to {}: {}", self.path.display(), e),
        }
    }
}

/// Remove the cache directory under `root`.
pub fn clear_cache(root: &Path) -> std::io::Result<()> {
    let dir = root.join(CACHE_DIR);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    Ok(())
}

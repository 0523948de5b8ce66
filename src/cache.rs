//! Persisted resolution cache
//!
//! A successful resolution is stored under a fixed key as a small JSON
//! document `{ "baseUrl": ..., "timestamp": ... }` and considered valid
//! while younger than the configured TTL. Expiry is passive: entries are
//! overwritten by the next successful resolution, never deleted by the
//! resolver itself.

use crate::error::CacheError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Store key for the resolved endpoint entry.
pub const CACHE_KEY: &str = "@network_config";

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A successfully resolved base URL with its resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    /// Resolved base URL, API prefix included
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// Resolution time, milliseconds since the Unix epoch
    #[serde(rename = "timestamp")]
    pub resolved_at_ms: u64,
}

impl ResolvedEndpoint {
    /// Create an entry stamped with the current time.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timestamp(base_url, now_ms())
    }

    /// Create an entry with an explicit timestamp.
    pub fn with_timestamp(base_url: impl Into<String>, resolved_at_ms: u64) -> Self {
        Self {
            base_url: base_url.into(),
            resolved_at_ms,
        }
    }

    /// Whether the entry is still within its TTL at `now_ms`.
    pub fn is_fresh(&self, ttl: Duration, now_ms: u64) -> bool {
        let age_ms = now_ms.saturating_sub(self.resolved_at_ms);
        age_ms < ttl.as_millis() as u64
    }

    /// Age of the entry at `now_ms`.
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.resolved_at_ms))
    }
}

/// Keyed store for resolved endpoints.
///
/// Implementations absorb nothing themselves: read/write failures are
/// reported and it is the caller's policy (the resolver's) to treat them as
/// no-ops.
pub trait CacheStore: Send + Sync {
    /// Load the entry under `key`, `None` if absent.
    fn load(&self, key: &str) -> Result<Option<ResolvedEndpoint>, CacheError>;

    /// Store `entry` under `key`, overwriting any previous value.
    fn store(&self, key: &str, entry: &ResolvedEndpoint) -> Result<(), CacheError>;

    /// Remove the entry under `key`, if any.
    fn clear(&self, key: &str) -> Result<(), CacheError>;
}

/// File-backed cache store, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default cache directory.
    ///
    /// `APISCOUT_CACHE_DIR` overrides the platform cache dir.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("APISCOUT_CACHE_DIR") {
            let dir = dir.trim();
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("apiscout")
    }

    /// Create a store at the default directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_dir())
    }

    /// File path backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", key.trim_start_matches('@')))
    }
}

impl CacheStore for FileCache {
    fn load(&self, key: &str) -> Result<Option<ResolvedEndpoint>, CacheError> {
        let path = self.entry_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Read(format!("{}: {}", path.display(), e))),
        };
        let entry = serde_json::from_str(&content)
            .map_err(|e| CacheError::Malformed(format!("{}: {}", path.display(), e)))?;
        Ok(Some(entry))
    }

    fn store(&self, key: &str, entry: &ResolvedEndpoint) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| CacheError::Write(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.entry_path(key);
        let content = serde_json::to_string(entry)
            .map_err(|e| CacheError::Write(format!("serialize: {}", e)))?;
        std::fs::write(&path, content)
            .map_err(|e| CacheError::Write(format!("{}: {}", path.display(), e)))
    }

    fn clear(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Write(format!("{}: {}", path.display(), e))),
        }
    }
}

/// In-memory cache store, for tests and cache-less resolution.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ResolvedEndpoint>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<ResolvedEndpoint>, CacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Read("poisoned lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, entry: &ResolvedEndpoint) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Write("poisoned lock".to_string()))?;
        entries.insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Write("poisoned lock".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

//! BlobStore - key → blob persistence with degrade-to-memory
//!
//! One logical table `cache(key, data, fetched_at)`. The durable backing is
//! a SQLite file; when that cannot be created or opened the store silently
//! switches to in-memory SQLite (and, failing that, a plain map) and records
//! why. Opening never fails.

use crate::config::default_cache_path;
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Sentinel location forcing in-memory mode
pub const MEMORY_LOCATION: &str = ":memory:";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS cache (
    key TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    fetched_at TEXT NOT NULL
)";

// ============================================================================
// Location / Entry / Stats
// ============================================================================

/// Where a store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Path(PathBuf),
    Memory,
}

impl StoreLocation {
    /// `":memory:"` → `Memory`, anything else is a file path
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == MEMORY_LOCATION {
            StoreLocation::Memory
        } else {
            StoreLocation::Path(PathBuf::from(raw))
        }
    }
}

impl Default for StoreLocation {
    fn default() -> Self {
        StoreLocation::Path(default_cache_path())
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Path(path) => write!(f, "{}", path.display()),
            StoreLocation::Memory => f.write_str(MEMORY_LOCATION),
        }
    }
}

/// Which backing actually serves reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    SqliteFile,
    SqliteMemory,
    VolatileMap,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::SqliteFile => "sqlite",
            BackendKind::SqliteMemory => "sqlite_memory",
            BackendKind::VolatileMap => "volatile_map",
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, BackendKind::SqliteFile)
    }
}

/// One stored row
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub blob: Vec<u8>,
    /// RFC 3339, UTC
    pub fetched_at: String,
}

/// Snapshot for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub location: String,
    pub backend: BackendKind,
    pub degraded: bool,
    pub degraded_reason: Option<String>,
    pub entries: u64,
    pub total_bytes: u64,
}

// ============================================================================
// BlobStore
// ============================================================================

enum Backend {
    Sqlite(Connection),
    Map(HashMap<String, CacheEntry>),
}

struct StoreInner {
    location: StoreLocation,
    kind: BackendKind,
    degraded_reason: Option<String>,
    backend: Mutex<Backend>,
}

/// Shared handle to the cache; clones see the same entries
#[derive(Clone)]
pub struct BlobStore {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore")
            .field("location", &self.inner.location)
            .field("backend", &self.inner.kind)
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

impl BlobStore {
    /// Open a store; `None` resolves the default durable path.
    ///
    /// Never fails: if the durable path is unusable the store runs in
    /// memory with `is_degraded() == true`.
    pub fn open(location: Option<StoreLocation>) -> Self {
        let location = location.unwrap_or_default();

        match &location {
            StoreLocation::Memory => Self::memory_backed(location, None),
            StoreLocation::Path(path) => match open_file(path) {
                Ok(conn) => {
                    info!("Cache store opened at {}", path.display());
                    Self::from_parts(location, BackendKind::SqliteFile, None, Backend::Sqlite(conn))
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        "Cache path {} unavailable, falling back to memory: {}",
                        path.display(),
                        reason
                    );
                    Self::memory_backed(location, Some(reason))
                }
            },
        }
    }

    /// Isolated in-memory store
    pub fn in_memory() -> Self {
        Self::open(Some(StoreLocation::Memory))
    }

    fn memory_backed(location: StoreLocation, degraded_reason: Option<String>) -> Self {
        match open_memory() {
            Ok(conn) => Self::from_parts(
                location,
                BackendKind::SqliteMemory,
                degraded_reason,
                Backend::Sqlite(conn),
            ),
            Err(e) => {
                warn!("In-memory SQLite unavailable, using a plain map: {}", e);
                let reason = degraded_reason.or_else(|| Some(e.to_string()));
                Self::from_parts(
                    location,
                    BackendKind::VolatileMap,
                    reason,
                    Backend::Map(HashMap::new()),
                )
            }
        }
    }

    fn from_parts(
        location: StoreLocation,
        kind: BackendKind,
        degraded_reason: Option<String>,
        backend: Backend,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                location,
                kind,
                degraded_reason,
                backend: Mutex::new(backend),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Backend>> {
        self.inner
            .backend
            .lock()
            .map_err(|_| Error::Internal("Lock poisoned".to_string()))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Location requested at open time
    pub fn location(&self) -> &StoreLocation {
        &self.inner.location
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.inner.kind
    }

    /// True when a durable path was requested but memory is serving
    pub fn is_degraded(&self) -> bool {
        self.inner.degraded_reason.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.inner.degraded_reason.as_deref()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Point lookup; `None` is a miss
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_entry(key)?.map(|entry| entry.blob))
    }

    /// Point lookup including provenance
    pub fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let guard = self.lock()?;
        match &*guard {
            Backend::Sqlite(conn) => conn
                .query_row(
                    "SELECT key, data, fetched_at FROM cache WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok(CacheEntry {
                            key: row.get(0)?,
                            blob: row.get(1)?,
                            fetched_at: row.get(2)?,
                        })
                    },
                )
                .optional()
                .map_err(|e| Error::Storage(format!("Failed to read cache entry: {}", e))),
            Backend::Map(map) => Ok(map.get(key).cloned()),
        }
    }

    /// Insert or replace the blob stored under `key`
    pub fn set(&self, key: &str, blob: &[u8]) -> Result<()> {
        let fetched_at = Utc::now().to_rfc3339();
        let mut guard = self.lock()?;
        match &mut *guard {
            Backend::Sqlite(conn) => {
                conn.execute(
                    "INSERT INTO cache (key, data, fetched_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        data = excluded.data,
                        fetched_at = excluded.fetched_at",
                    params![key, blob, fetched_at],
                )
                .map_err(|e| Error::Storage(format!("Failed to write cache entry: {}", e)))?;
            }
            Backend::Map(map) => {
                map.insert(
                    key.to_string(),
                    CacheEntry {
                        key: key.to_string(),
                        blob: blob.to_vec(),
                        fetched_at,
                    },
                );
            }
        }
        debug!("Cached {} ({} bytes)", key, blob.len());
        Ok(())
    }

    /// Drop and recreate the cache table
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.lock()?;
        match &mut *guard {
            Backend::Sqlite(conn) => {
                let tx = conn
                    .transaction()
                    .map_err(|e| Error::Storage(format!("Failed to begin reset: {}", e)))?;
                tx.execute_batch("DROP TABLE IF EXISTS cache;")
                    .map_err(|e| Error::Storage(format!("Failed to drop cache table: {}", e)))?;
                tx.execute_batch(CREATE_TABLE_SQL)
                    .map_err(|e| Error::Storage(format!("Failed to recreate cache table: {}", e)))?;
                tx.commit()
                    .map_err(|e| Error::Storage(format!("Failed to commit reset: {}", e)))?;
            }
            Backend::Map(map) => map.clear(),
        }
        info!("Cache reset ({})", self.inner.location);
        Ok(())
    }

    /// Entry count and payload size
    pub fn stats(&self) -> Result<StoreStats> {
        let (entries, total_bytes) = {
            let guard = self.lock()?;
            match &*guard {
                Backend::Sqlite(conn) => conn
                    .query_row(
                        "SELECT COUNT(*), COALESCE(SUM(LENGTH(data)), 0) FROM cache",
                        [],
                        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
                    )
                    .map(|(count, bytes)| (count.max(0) as u64, bytes.max(0) as u64))
                    .map_err(|e| Error::Storage(format!("Failed to read cache stats: {}", e)))?,
                Backend::Map(map) => (
                    map.len() as u64,
                    map.values().map(|entry| entry.blob.len() as u64).sum(),
                ),
            }
        };

        Ok(StoreStats {
            location: self.inner.location.to_string(),
            backend: self.inner.kind,
            degraded: self.is_degraded(),
            degraded_reason: self.inner.degraded_reason.clone(),
            entries,
            total_bytes,
        })
    }

    // ========================================================================
    // Async wrappers (blocking pool)
    // ========================================================================

    pub async fn get_async(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.get(&key))
            .await
            .map_err(|e| Error::Internal(format!("Cache read task failed: {}", e)))?
    }

    pub async fn set_async(&self, key: &str, blob: Vec<u8>) -> Result<()> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.set(&key, &blob))
            .await
            .map_err(|e| Error::Internal(format!("Cache write task failed: {}", e)))?
    }

    pub async fn reset_async(&self) -> Result<()> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.reset())
            .await
            .map_err(|e| Error::Internal(format!("Cache reset task failed: {}", e)))?
    }
}

fn open_file(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Storage(format!(
                "Failed to create cache directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let conn = Connection::open(path)
        .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
        .map_err(|e| Error::Storage(format!("Failed to set pragmas: {}", e)))?;

    initialize_schema(&conn)?;
    Ok(conn)
}

fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::Storage(format!("Failed to create in-memory database: {}", e)))?;
    initialize_schema(&conn)?;
    Ok(conn)
}

fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)
        .map_err(|e| Error::Storage(format!("Failed to initialize schema: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(StoreLocation::parse(":memory:"), StoreLocation::Memory);
        assert_eq!(
            StoreLocation::parse("/tmp/x.db"),
            StoreLocation::Path(PathBuf::from("/tmp/x.db"))
        );
        assert_eq!(StoreLocation::Memory.to_string(), ":memory:");
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = BlobStore::in_memory();
        assert_eq!(store.get("nope").unwrap(), None);
        assert!(!store.is_degraded());
        assert_eq!(store.backend_kind(), BackendKind::SqliteMemory);
    }

    #[test]
    fn test_set_upserts() {
        let store = BlobStore::in_memory();
        store.set("k", b"first").unwrap();
        store.set("k", b"second").unwrap();

        assert_eq!(store.get("k").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.stats().unwrap().entries, 1);
    }

    #[test]
    fn test_entry_records_fetched_at() {
        let store = BlobStore::in_memory();
        store.set("k", b"blob").unwrap();

        let entry = store.get_entry("k").unwrap().unwrap();
        assert_eq!(entry.key, "k");
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.fetched_at).is_ok());
    }

    #[test]
    fn test_reset_clears_entries() {
        let store = BlobStore::in_memory();
        store.set("k", b"blob").unwrap();
        store.set("other", b"blob").unwrap();

        store.reset().unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get("other").unwrap(), None);
        // still usable afterwards
        store.set("k", b"again").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"again".to_vec()));
    }

    #[test]
    fn test_clones_share_state() {
        let store = BlobStore::in_memory();
        let clone = store.clone();
        clone.set("shared", b"1").unwrap();
        assert_eq!(store.get("shared").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_separate_memory_stores_are_isolated() {
        let a = BlobStore::in_memory();
        let b = BlobStore::in_memory();
        a.set("k", b"a").unwrap();
        assert_eq!(b.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.db");

        {
            let store = BlobStore::open(Some(StoreLocation::Path(path.clone())));
            assert_eq!(store.backend_kind(), BackendKind::SqliteFile);
            assert!(!store.is_degraded());
            store.set("k", b"durable").unwrap();
        }

        let reopened = BlobStore::open(Some(StoreLocation::Path(path)));
        assert_eq!(reopened.get("k").unwrap(), Some(b"durable".to_vec()));
    }

    #[test]
    fn test_unwritable_location_degrades_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("sub").join("cache.db");

        let store = BlobStore::open(Some(StoreLocation::Path(path)));

        assert!(store.is_degraded());
        assert!(store.degraded_reason().unwrap().contains("Failed to create cache directory"));
        assert!(!store.backend_kind().is_durable());

        store.set("k", b"still works").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"still works".to_vec()));

        let stats = store.stats().unwrap();
        assert!(stats.degraded);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.total_bytes, 11);
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let store = BlobStore::in_memory();
        store.set_async("k", b"v".to_vec()).await.unwrap();
        assert_eq!(store.get_async("k").await.unwrap(), Some(b"v".to_vec()));
        store.reset_async().await.unwrap();
        assert_eq!(store.get_async("k").await.unwrap(), None);
    }
}

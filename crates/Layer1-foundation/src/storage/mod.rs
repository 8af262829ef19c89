//! Storage module for baseball-mcp
//!
//! - `blob_store`: SQLite key → blob cache with in-memory fallback

mod blob_store;

pub use blob_store::{
    BackendKind, BlobStore, CacheEntry, StoreLocation, StoreStats, MEMORY_LOCATION,
};

//! # baseball-foundation
//!
//! Foundation layer for baseball-mcp:
//! - Core: trait definitions (StatsProvider, Tool, ToolContext)
//! - Storage: SQLite blob store with degrade-to-memory
//! - Table: the cached value type, its blob codec and TSV rendering
//! - Cache: deterministic cache keys and team-code aliases
//! - Config: layered server settings
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Loader (Layer2-core)                                   │
//! │     │ CacheKey::... ──► key                             │
//! │     ▼                                                   │
//! │  BlobStore.get(key) ── hit ──► codec::decode ──► Table  │
//! │     │ miss / Malformed                                  │
//! │     ▼                                                   │
//! │  StatsProvider.fetch ──► Table ──► codec::encode        │
//! │                                     │                   │
//! │                          BlobStore.set(key, blob)       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod table;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core
// ============================================================================
pub use core::{
    DivisionStandings, StatcastType, StatsProvider, Tool, ToolContext, ToolMeta, ToolResult,
};

// ============================================================================
// Config
// ============================================================================
pub use config::{BaseballConfig, UpstreamConfig};

// ============================================================================
// Storage
// ============================================================================
pub use storage::{BackendKind, BlobStore, CacheEntry, StoreLocation, StoreStats};

// ============================================================================
// Table
// ============================================================================
pub use table::{Cell, DecodeResult, Table};

// ============================================================================
// Cache keys
// ============================================================================
pub use cache::{normalize_team, CacheKey, DataKind, TEAM_DIRECTORY};

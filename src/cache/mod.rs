//! Compiled route caching.
//!
//! # Data Flow
//! ```text
//! routes file ─┬─ mtime == entry.timestamp → serve entry.routes
//!              └─ mtime != entry.timestamp → parse → write (mtime, routes)
//! ```
//!
//! # Design Decisions
//! - The file's modification time is the only staleness signal
//! - Backends are opaque: JSON file on disk or process memory
//! - Cache failures never reach the caller; the loader falls back to parsing
//! - No locking between read and write; the last writer wins

pub mod file;
pub mod memory;

use std::time::SystemTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::route::Route;

pub use file::FileCache;
pub use memory::MemoryCache;

/// A compiled route table tagged with the source file's modification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: SystemTime,
    pub routes: Vec<Route>,
}

impl CacheEntry {
    pub fn new(timestamp: SystemTime, routes: Vec<Route>) -> Self {
        Self { timestamp, routes }
    }

    /// Returns true if the entry was built from a file with this mtime.
    pub fn is_fresh(&self, modified: SystemTime) -> bool {
        self.timestamp == modified
    }
}

/// Errors from a cache backing store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store is not configured or not reachable.
    #[error("cache store unusable: {0}")]
    Unusable(String),

    /// Nothing has been written yet.
    #[error("cache is empty")]
    Empty,

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored entry could not be decoded.
    #[error("cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence for a single compiled route table.
pub trait RouteCache: Send + Sync + std::fmt::Debug {
    /// Returns true if the backing store is configured and reachable.
    fn useable(&self) -> bool;

    /// Returns true if an entry has been written.
    fn filled(&self) -> bool;

    /// Read the stored entry.
    fn read(&self) -> Result<CacheEntry, CacheError>;

    /// Store `entry`, replacing any previous one.
    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Remove the stored entry. Clearing an empty cache succeeds.
    fn clear(&self) -> Result<(), CacheError>;
}

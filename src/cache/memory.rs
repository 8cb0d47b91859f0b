//! In-process cache backend.

use std::sync::Arc;
use arc_swap::ArcSwapOption;

use crate::cache::{CacheEntry, CacheError, RouteCache};

/// Keeps the entry in memory. Always usable.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entry: ArcSwapOption<CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RouteCache for MemoryCache {
    fn useable(&self) -> bool {
        true
    }

    fn filled(&self) -> bool {
        self.entry.load().is_some()
    }

    fn read(&self) -> Result<CacheEntry, CacheError> {
        self.entry
            .load_full()
            .map(|entry| (*entry).clone())
            .ok_or(CacheError::Empty)
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.entry.store(Some(Arc::new(entry.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entry.store(None);
        Ok(())
    }
}

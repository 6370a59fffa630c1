//! In-memory cache backend

use crate::cache::traits::{CacheError, CacheResult, ResponseCache};
use crate::cache::{CacheKey, CachedResponse};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Process-local response cache
///
/// Nothing survives the process. Useful for tests and for programs that do
/// not want a cache file.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, CachedResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &CacheKey, response: &CachedResponse) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.clone(), response.clone());
        Ok(())
    }

    fn remove_expired(&self, ttl: Duration) -> CacheResult<usize> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, response| !response.is_stale(ttl));
        Ok(before - entries.len())
    }

    fn len(&self) -> CacheResult<usize> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.len())
    }

    fn clear(&self) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

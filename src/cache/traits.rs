//! Cache traits and error types
//!
//! This module defines the trait interface for response cache backends and
//! associated error types.

use crate::cache::{CacheKey, CachedResponse};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache lock poisoned")]
    Poisoned,

    #[error("Corrupt cache entry for {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for response cache backends
///
/// Implementations are shared between every fetcher of a process, so they
/// must tolerate concurrent readers. Inserting one key must not disturb
/// concurrent reads of another.
pub trait ResponseCache: Send + Sync {
    /// Looks up a stored response
    fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>>;

    /// Stores a response, replacing any previous entry for the key
    fn put(&self, key: &CacheKey, response: &CachedResponse) -> CacheResult<()>;

    /// Removes entries older than `ttl`, returning how many were removed
    fn remove_expired(&self, ttl: Duration) -> CacheResult<usize>;

    /// Number of stored entries, stale ones included
    fn len(&self) -> CacheResult<usize>;

    /// Returns true if nothing is stored
    fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Removes every entry
    fn clear(&self) -> CacheResult<()>;
}

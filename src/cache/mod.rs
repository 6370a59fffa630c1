//! Response cache for fetched pages
//!
//! This module holds everything the page fetcher needs to avoid asking the
//! site twice for the same page:
//! - Request fingerprints (`CacheKey`)
//! - Stored responses with their fetch time (`CachedResponse`)
//! - The `ResponseCache` trait with in-memory and SQLite backends
//!
//! Entries expire after a fixed TTL. Stale entries are never served and are
//! swept explicitly, typically when the cache is opened at process start.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
pub use traits::{CacheError, CacheResult, ResponseCache};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint of a request: method, URL and headers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a request
    ///
    /// Header order does not matter; names are compared case-insensitively.
    pub fn for_request(method: &str, url: &str, headers: &[(&str, &str)]) -> Self {
        let mut sorted: Vec<(String, &str)> = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), *value))
            .collect();
        sorted.sort();

        let mut hasher = Sha256::new();
        hasher.update(method.to_ascii_uppercase().as_bytes());
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
        for (name, value) in sorted {
            hasher.update(b"\n");
            hasher.update(name.as_bytes());
            hasher.update(b":");
            hasher.update(value.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Wraps an already computed fingerprint (e.g. read back from disk)
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A response body stored in the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Absolute URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Decoded response body
    pub body: String,

    /// When the response was received
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Creates a response stamped with the current time
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Returns how long ago the response was received
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if the response is older than `ttl`
    pub fn is_stale(&self, ttl: std::time::Duration) -> bool {
        match Duration::from_std(ttl) {
            Ok(ttl) => self.age() > ttl,
            // A TTL too large to represent never expires
            Err(_) => false,
        }
    }
}

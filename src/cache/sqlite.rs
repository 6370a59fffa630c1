//! SQLite cache backend
//!
//! Persists responses between runs so that a program started again within
//! the TTL does not hit the site for pages it has already seen.

use crate::cache::schema::initialize_schema;
use crate::cache::traits::{CacheError, CacheResult, ResponseCache};
use crate::cache::{CacheKey, CachedResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// SQLite-backed response cache
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Opens (or creates) a cache file and sweeps entries older than `ttl`
    pub fn open(path: &Path, ttl: Duration) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_schema(&conn)?;

        let cache = Self {
            conn: Mutex::new(conn),
        };
        let removed = cache.remove_expired(ttl)?;
        tracing::info!(
            "Opened response cache at {} ({} expired entries removed)",
            path.display(),
            removed
        );
        Ok(cache)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let row = conn
            .query_row(
                "SELECT url, status, body, fetched_at FROM responses WHERE key = ?1",
                params![key.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u16>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((url, status, body, fetched_at)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| CacheError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Some(CachedResponse {
            url,
            status,
            body,
            fetched_at,
        }))
    }

    fn put(&self, key: &CacheKey, response: &CachedResponse) -> CacheResult<()> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO responses (key, url, status, body, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key.as_str(),
                response.url,
                response.status,
                response.body,
                format_timestamp(response.fetched_at)
            ],
        )?;
        Ok(())
    }

    fn remove_expired(&self, ttl: Duration) -> CacheResult<usize> {
        let ttl = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => ttl,
            Err(_) => return Ok(0),
        };
        let cutoff = format_timestamp(Utc::now() - ttl);

        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let removed = conn.execute(
            "DELETE FROM responses WHERE fetched_at < ?1",
            params![cutoff],
        )?;
        Ok(removed)
    }

    fn len(&self) -> CacheResult<usize> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn clear(&self) -> CacheResult<()> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute("DELETE FROM responses", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(path: &str) -> CacheKey {
        CacheKey::for_request("GET", &format!("https://x/{}", path), &[])
    }

    #[test]
    fn test_put_then_get() {
        let cache = SqliteCache::new_in_memory().unwrap();
        let response = CachedResponse::new("https://x/bands/_/1", 200, "<h1>Band</h1>");

        cache.put(&key("bands/_/1"), &response).unwrap();

        let stored = cache.get(&key("bands/_/1")).unwrap().unwrap();
        assert_eq!(stored.url, response.url);
        assert_eq!(stored.status, 200);
        assert_eq!(stored.body, response.body);
        assert_eq!(
            stored.fetched_at.timestamp_micros(),
            response.fetched_at.timestamp_micros()
        );
    }

    #[test]
    fn test_missing_key() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert!(cache.get(&key("nothing")).unwrap().is_none());
    }

    #[test]
    fn test_put_replaces() {
        let cache = SqliteCache::new_in_memory().unwrap();
        cache
            .put(&key("a"), &CachedResponse::new("https://x/a", 200, "first"))
            .unwrap();
        cache
            .put(&key("a"), &CachedResponse::new("https://x/a", 200, "second"))
            .unwrap();

        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(cache.get(&key("a")).unwrap().unwrap().body, "second");
    }

    #[test]
    fn test_remove_expired() {
        let cache = SqliteCache::new_in_memory().unwrap();
        let mut old = CachedResponse::new("https://x/old", 200, "old");
        old.fetched_at = Utc::now() - chrono::Duration::minutes(10);

        cache.put(&key("old"), &old).unwrap();
        cache
            .put(&key("fresh"), &CachedResponse::new("https://x/fresh", 200, "fresh"))
            .unwrap();

        let removed = cache.remove_expired(Duration::from_secs(300)).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.len().unwrap(), 1);
        assert!(cache.get(&key("fresh")).unwrap().is_some());
    }

    #[test]
    fn test_persists_and_sweeps_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.sqlite");

        {
            let cache = SqliteCache::open(&path, Duration::from_secs(300)).unwrap();
            let mut old = CachedResponse::new("https://x/old", 200, "old");
            old.fetched_at = Utc::now() - chrono::Duration::hours(2);
            cache.put(&key("old"), &old).unwrap();
            cache
                .put(&key("fresh"), &CachedResponse::new("https://x/fresh", 200, "fresh"))
                .unwrap();
        }

        let reopened = SqliteCache::open(&path, Duration::from_secs(300)).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get(&key("fresh")).unwrap().unwrap().body, "fresh");
    }

    #[test]
    fn test_clear() {
        let cache = SqliteCache::new_in_memory().unwrap();
        cache
            .put(&key("a"), &CachedResponse::new("https://x/a", 200, "a"))
            .unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }
}

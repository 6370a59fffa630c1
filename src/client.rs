//! Client entry point
//!
//! `Metallum` assembles the HTTP client, response cache and throttle from a
//! [`Config`] and exposes the lookups and searches.

use crate::cache::{MemoryCache, ResponseCache, SqliteCache};
use crate::config::{load_config, validate, Config};
use crate::entity::Entity;
use crate::fetch::{build_http_client, PageFetcher};
use crate::models::{album_path, band_path, lyrics_path, Album, Band, Lyrics};
use crate::search::{
    AlbumResult, AlbumSearch, BandResult, BandSearch, SearchResults, SearchRow, SongResult,
    SongSearch,
};
use crate::{MetallumError, Result};
use std::path::Path;
use std::sync::Arc;

/// Client for the Encyclopaedia Metallum
///
/// Cloning is cheap; clones share the cache and throttle.
#[derive(Debug, Clone)]
pub struct Metallum {
    config: Config,
    fetcher: PageFetcher,
}

impl Metallum {
    /// Creates a client with the cache the configuration names
    ///
    /// A configured cache file is opened (and created if missing), with
    /// entries older than the TTL swept. With `in-memory = true` (or no
    /// path) the cache lives in memory only.
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;

        let cache: Arc<dyn ResponseCache> = match config.cache.file() {
            Some(path) => Arc::new(SqliteCache::open(path, config.cache.ttl())?),
            None => Arc::new(MemoryCache::new()),
        };

        Self::with_cache(config, cache)
    }

    /// Creates a client with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Loads a TOML configuration file and creates a client from it
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Self::new(load_config(path)?)
    }

    /// Creates a client around an existing cache
    pub fn with_cache(config: Config, cache: Arc<dyn ResponseCache>) -> Result<Self> {
        validate(&config)?;

        let client = build_http_client(&config).map_err(|e| MetallumError::Http {
            url: config.client.base_url.clone(),
            source: e,
        })?;
        let fetcher = PageFetcher::new(client, &config, cache);

        tracing::debug!(
            "Client ready for {} (delay {:?}, cache ttl {:?})",
            config.client.base_url,
            fetcher.request_delay(),
            fetcher.ttl()
        );
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The fetcher every entity of this client uses
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Removes cached responses older than the TTL
    pub fn flush_expired(&self) -> Result<usize> {
        let removed = self.fetcher.cache().remove_expired(self.fetcher.ttl())?;
        tracing::info!("Removed {} expired cache entries", removed);
        Ok(removed)
    }

    /// Fetches a band by id
    pub async fn band_for_id(&self, id: &str) -> Result<Band> {
        self.entity(&band_path(id)).await
    }

    /// Fetches an album by id, track listing included
    pub async fn album_for_id(&self, id: &str) -> Result<Album> {
        self.entity(&album_path(id)).await
    }

    /// Fetches lyrics by lyrics id
    pub async fn lyrics_for_id(&self, id: &str) -> Result<Lyrics> {
        let page = self.fetcher.fetch(&lyrics_path(id)).await?;
        Ok(Lyrics::parse(id, &page.body))
    }

    /// Runs an advanced band search
    pub async fn band_search(&self, search: &BandSearch) -> Result<SearchResults<BandResult>> {
        self.search(&search.path()).await
    }

    /// Runs an advanced album search
    pub async fn album_search(&self, search: &AlbumSearch) -> Result<SearchResults<AlbumResult>> {
        self.search(&search.path()).await
    }

    /// Runs an advanced song search
    pub async fn song_search(&self, search: &SongSearch) -> Result<SearchResults<SongResult>> {
        self.search(&search.path()).await
    }

    async fn entity<E: Entity>(&self, path: &str) -> Result<E> {
        let page = self.fetcher.fetch(path).await?;
        E::from_page(&page, &self.fetcher)
    }

    async fn search<R: SearchRow>(&self, path: &str) -> Result<SearchResults<R>> {
        let page = self.fetcher.fetch(path).await?;
        SearchResults::parse(&page.body, &self.fetcher)
    }
}

//! HTTP page fetcher
//!
//! This module handles every request the client makes:
//! - Building the HTTP client with user agent, timeouts and compression
//! - Resolving relative page paths against the site origin
//! - Serving repeated requests from the shared response cache
//! - Throttling requests the cache could not answer
//! - Classifying transport errors and non-success statuses

use crate::cache::{CacheKey, CachedResponse, ResponseCache};
use crate::config::Config;
use crate::fetch::Throttle;
use crate::{MetallumError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Relative path the page was requested with
    pub path: String,

    /// Absolute URL of the page
    pub url: String,

    /// Decoded body (HTML or JSON)
    pub body: String,

    /// Whether the body came from the cache
    pub from_cache: bool,
}

/// Content encodings the client advertises and decodes
const ACCEPTED_ENCODINGS: &str = "gzip, br";

/// Headers sent with every request, as they enter the cache key
pub(crate) fn request_headers(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("accept-encoding", ACCEPTED_ENCODINGS.to_string()),
        ("user-agent", config.user_agent.header_value()),
    ]
}

/// Builds an HTTP client with proper configuration
///
/// Every request advertises gzip and brotli; reqwest decompresses
/// transparently.
pub fn build_http_client(config: &Config) -> std::result::Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPTED_ENCODINGS));

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .default_headers(headers)
        .timeout(config.client.timeout())
        .connect_timeout(config.client.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

struct FetcherInner {
    client: Client,
    base_url: String,
    key_headers: Vec<(String, String)>,
    cache: Arc<dyn ResponseCache>,
    ttl: Duration,
    throttle: Throttle,
}

/// Fetches pages through the shared cache and throttle
///
/// Cloning is cheap; clones share the client, cache and throttle.
#[derive(Clone)]
pub struct PageFetcher {
    inner: Arc<FetcherInner>,
}

impl PageFetcher {
    /// Creates a fetcher for the configured origin
    pub fn new(client: Client, config: &Config, cache: Arc<dyn ResponseCache>) -> Self {
        let key_headers = request_headers(config)
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        Self {
            inner: Arc::new(FetcherInner {
                client,
                base_url: config.client.base_url.trim_end_matches('/').to_string(),
                key_headers,
                cache,
                ttl: config.cache.ttl(),
                throttle: Throttle::new(config.client.request_delay()),
            }),
        }
    }

    /// Resolves a relative page path against the site origin
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// The cache shared by this fetcher and its clones
    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.inner.cache
    }

    /// Age after which cached pages are fetched again
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Minimum time between two uncached requests
    pub fn request_delay(&self) -> Duration {
        self.inner.throttle.interval()
    }

    /// Fetches a page by relative path
    ///
    /// # Request Flow
    ///
    /// 1. Look the request up in the cache; a fresh hit returns immediately
    /// 2. Wait for the throttle gate
    /// 3. Look again, since another task may have filled the entry meanwhile
    /// 4. Send the request; non-success statuses are errors and not cached
    /// 5. Store the body and release the gate
    ///
    /// Failures are never retried.
    pub async fn fetch(&self, path: &str) -> Result<Page> {
        let url = self.absolute_url(path);
        let key = self.cache_key(&url);

        if let Some(page) = self.lookup(&key, path)? {
            tracing::debug!("Fetched {} (cached)", url);
            return Ok(page);
        }

        let mut permit = self.inner.throttle.acquire().await;

        if let Some(page) = self.lookup(&key, path)? {
            tracing::debug!("Fetched {} (cached while waiting)", url);
            return Ok(page);
        }

        permit.begin();
        let outcome = self.request(&url).await;
        permit.complete();
        let (status, body) = outcome?;

        let response = CachedResponse::new(url.clone(), status, body);
        if let Err(e) = self.inner.cache.put(&key, &response) {
            tracing::warn!("Failed to cache {}: {}", url, e);
        }

        tracing::debug!("Fetched {} (network)", url);
        Ok(Page {
            path: path.to_string(),
            url,
            body: response.body,
            from_cache: false,
        })
    }

    fn cache_key(&self, url: &str) -> CacheKey {
        let headers: Vec<(&str, &str)> = self
            .inner
            .key_headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        CacheKey::for_request("GET", url, &headers)
    }

    fn lookup(&self, key: &CacheKey, path: &str) -> Result<Option<Page>> {
        let cached = self.inner.cache.get(key)?;
        tracing::trace!("Cache lookup for {}: hit={}", path, cached.is_some());

        Ok(cached
            .filter(|response| !response.is_stale(self.inner.ttl))
            .map(|response| Page {
                path: path.to_string(),
                url: response.url,
                body: response.body,
                from_cache: true,
            }))
    }

    async fn request(&self, url: &str) -> Result<(u16, String)> {
        tracing::trace!("GET {}", url);
        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status.as_u16());
            return Err(MetallumError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;
        Ok((status.as_u16(), body))
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("base_url", &self.inner.base_url)
            .field("ttl", &self.inner.ttl)
            .field("request_delay", &self.inner.throttle.interval())
            .finish_non_exhaustive()
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> MetallumError {
    if error.is_timeout() {
        MetallumError::Timeout {
            url: url.to_string(),
        }
    } else {
        MetallumError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

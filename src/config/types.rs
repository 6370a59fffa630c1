use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Origin every relative page path is resolved against
pub const DEFAULT_BASE_URL: &str = "https://www.metal-archives.com";

/// Main configuration structure for Metallum
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Site origin, without a trailing slash
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Minimum time between two uncached requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Client name
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Client version
    #[serde(default = "default_agent_version")]
    pub version: String,

    /// Optional URL with information about the client
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.name, self.version, url),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
            contact_url: None,
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// SQLite file backing the cache
    #[serde(default = "default_cache_path")]
    pub path: Option<PathBuf>,

    /// Keep responses in memory only, ignoring `path`
    #[serde(rename = "in-memory", default)]
    pub in_memory: bool,

    /// Age after which a cached response is stale (seconds)
    #[serde(rename = "ttl-secs", default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Cache configuration that never touches disk
    pub fn in_memory(ttl_secs: u64) -> Self {
        Self {
            path: None,
            in_memory: true,
            ttl_secs,
        }
    }

    /// Cache configuration backed by the given SQLite file
    pub fn on_disk(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            path: Some(path.into()),
            in_memory: false,
            ttl_secs,
        }
    }

    /// The SQLite file to open, or `None` for an in-memory cache
    pub fn file(&self) -> Option<&Path> {
        if self.in_memory {
            None
        } else {
            self.path.as_deref()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            in_memory: false,
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_cache_path() -> Option<PathBuf> {
    Some(std::env::temp_dir().join("metallum_cache.sqlite"))
}

fn default_ttl_secs() -> u64 {
    300
}

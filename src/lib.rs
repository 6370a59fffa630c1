//! Metallum: a read-only client for the Encyclopaedia Metallum
//!
//! This crate turns the site's HTML pages and JSON search responses into
//! bands, albums, tracks, lyrics and search results. Entities seen in
//! listing pages start out as lightweight stubs and fetch their own page
//! the first time a field they cannot supply is read. Every request goes
//! through a shared response cache and a politeness throttle.

pub mod cache;
pub mod client;
pub mod config;
pub mod entity;
pub mod fetch;
pub mod logging;
pub mod markup;
pub mod models;
pub mod search;

use thiserror::Error;

/// Main error type for Metallum operations
#[derive(Debug, Error)]
pub enum MetallumError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("{entity} has no field named '{field}'")]
    UnknownField { entity: &'static str, field: String },

    #[error("No band on the album matches track '{title}'")]
    BandNotFound { title: String },
}

/// Broad classification of a [`MetallumError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or non-success status
    Fetch,
    /// Expected markup or data was missing or malformed
    Parse,
    /// A field or relation that no entity type can supply
    Lookup,
    /// The response cache could not be read or written
    Cache,
    /// Invalid configuration
    Config,
}

impl MetallumError {
    /// Builds a parse error for the given context
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Returns the broad kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http { .. } | Self::Status { .. } | Self::Timeout { .. } => ErrorKind::Fetch,
            Self::UrlParse(_) | Self::Json(_) | Self::Parse { .. } => ErrorKind::Parse,
            Self::UnknownField { .. } | Self::BandNotFound { .. } => ErrorKind::Lookup,
            Self::Cache(_) => ErrorKind::Cache,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Metallum operations
pub type Result<T> = std::result::Result<T, MetallumError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::Metallum;
pub use config::Config;
pub use entity::{Collection, FieldSource, FieldValue, LazyEntity};
pub use models::{Album, AlbumType, Band, LazyAlbum, LazyBand, Lyrics, Track};
pub use search::{AlbumResult, AlbumSearch, BandResult, BandSearch, SearchResults, SongResult, SongSearch};

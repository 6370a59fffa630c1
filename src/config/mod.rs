//! Configuration module for Metallum
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or `Config::default()`) is usable.
//!
//! # Example
//!
//! ```no_run
//! use metallum::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("metallum.toml")).unwrap();
//! println!("Cache entries expire after {}s", config.cache.ttl_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, ClientConfig, Config, UserAgentConfig, DEFAULT_BASE_URL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config};
pub use validation::validate;

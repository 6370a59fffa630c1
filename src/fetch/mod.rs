//! Page fetching
//!
//! This module contains the only code that talks to the network:
//! - HTTP client construction
//! - The page fetcher, which consults the response cache first
//! - The throttle gate enforcing a fixed delay between uncached requests

mod fetcher;
mod throttle;

pub use fetcher::{build_http_client, Page, PageFetcher};
pub use throttle::{Throttle, ThrottlePermit};

//! Markup and JSON access
//!
//! Pure transformations over fetched text: HTML element queries, JSON
//! decoding, and parsers for the display strings found on the site. Nothing
//! here touches the network or the cache.

mod document;
mod text;

pub use document::{attribute, select_within, text, Document};
pub use text::{
    id_from_href, leading_digits, offset_time, parse_audit_timestamp, parse_duration,
    parse_release_date, release_year, split_genres, strip_query, DatePrecision, ReleaseDate, UTC_OFFSET_HOURS,
};

use crate::Result;

/// Decodes a JSON response body
pub fn parse_json(text: &str) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(text)?)
}

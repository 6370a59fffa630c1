//! Parsing helpers for the text found on entity pages
//!
//! Genres, durations, release dates, audit timestamps and identifiers all
//! arrive as display strings.

use crate::{MetallumError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Hours to add to the site's server time to get UTC
pub const UTC_OFFSET_HOURS: i64 = 4;

static TRAILING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)/?$").unwrap());
static LEADING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());
static ORDINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)(st|nd|rd|th)\b").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").unwrap());

/// Splits a genre string on commas and semicolons outside parentheses
///
/// ```
/// use metallum::markup::split_genres;
///
/// assert_eq!(
///     split_genres("Heavy Metal/Hard Rock (early, later), Thrash Metal (mid)"),
///     vec!["Heavy Metal/Hard Rock (early, later)", "Thrash Metal (mid)"]
/// );
/// ```
pub fn split_genres(s: &str) -> Vec<String> {
    let mut genres = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' | ';' if depth == 0 => {
                genres.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    genres.push(current.trim().to_string());

    genres.retain(|genre| !genre.is_empty());
    genres
}

/// Parses `SS`, `MM:SS` or `HH:MM:SS` into seconds
pub fn parse_duration(s: &str) -> Result<u32> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() > 3 {
        return Err(MetallumError::parse("duration", format!("'{}' has too many parts", s)));
    }

    let mut seconds = 0u32;
    for part in &parts {
        let value: u32 = part
            .trim()
            .parse()
            .map_err(|_| MetallumError::parse("duration", format!("'{}' is not a duration", s)))?;
        seconds = seconds
            .checked_mul(60)
            .and_then(|total| total.checked_add(value))
            .ok_or_else(|| MetallumError::parse("duration", format!("'{}' is too long", s)))?;
    }
    Ok(seconds)
}

/// How much of a release date the site knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// A release date, possibly without day or month
///
/// Missing components are filled with 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseDate {
    pub date: NaiveDate,
    pub precision: DatePrecision,
}

impl ReleaseDate {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month, if known
    pub fn month(&self) -> Option<u32> {
        (self.precision >= DatePrecision::Month).then(|| self.date.month())
    }

    /// Day of month, if known
    pub fn day(&self) -> Option<u32> {
        (self.precision == DatePrecision::Day).then(|| self.date.day())
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            DatePrecision::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
            DatePrecision::Month => write!(f, "{}", self.date.format("%Y-%m")),
            DatePrecision::Year => write!(f, "{}", self.date.format("%Y")),
        }
    }
}

/// Parses a release date as displayed by the site
///
/// Accepts `March 3rd, 1986`, `March 1986` and `1986`. Trailing HTML
/// comments (as found in search rows) are ignored.
pub fn parse_release_date(s: &str) -> Result<ReleaseDate> {
    let cleaned = HTML_COMMENT.replace_all(s, "");
    let cleaned = ORDINAL_SUFFIX.replace_all(cleaned.trim(), "$1");
    let cleaned = cleaned.trim();

    if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%B %d, %Y") {
        return Ok(ReleaseDate {
            date,
            precision: DatePrecision::Day,
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {}", cleaned), "%d %B %Y") {
        return Ok(ReleaseDate {
            date,
            precision: DatePrecision::Month,
        });
    }

    if cleaned.len() == 4 {
        if let Some(date) = cleaned
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        {
            return Ok(ReleaseDate {
                date,
                precision: DatePrecision::Year,
            });
        }
    }

    Err(MetallumError::parse(
        "release date",
        format!("'{}' matches no known format", s.trim()),
    ))
}

/// First four-digit year found in a release date the parser does not know
pub fn release_year(s: &str) -> Option<i32> {
    let cleaned = HTML_COMMENT.replace_all(s, "");
    YEAR.captures(&cleaned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Converts the site's server time to UTC
pub fn offset_time(t: NaiveDateTime) -> DateTime<Utc> {
    (t + Duration::hours(UTC_OFFSET_HOURS)).and_utc()
}

/// Finds a `YYYY-MM-DD HH:MM:SS` server timestamp in `s` and converts it to UTC
pub fn parse_audit_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let found = TIMESTAMP.find(s)?;
    NaiveDateTime::parse_from_str(found.as_str(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(offset_time)
}

/// Numeric identifier at the end of an entity link
pub fn id_from_href(href: &str) -> Option<String> {
    let href = href.split(['?', '#']).next().unwrap_or(href);
    TRAILING_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Leading digits of a string (`"5018A"` → `"5018"`)
pub fn leading_digits(s: &str) -> Option<&str> {
    LEADING_DIGITS.find(s.trim()).map(|m| m.as_str())
}

/// Drops the query string from an image URL
pub fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

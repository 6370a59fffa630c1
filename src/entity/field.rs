//! Dynamically named field values
//!
//! Typed accessors are the normal way to read an entity. Field values exist
//! for the places that address fields by name: collection filtering and the
//! lazy resolver's stub/full dispatch.

use crate::markup::ReleaseDate;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Value of a named entity field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Optional field with no value on this entity
    Absent,
    Text(String),
    Integer(i64),
    List(Vec<String>),
    Date(ReleaseDate),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Case-insensitive comparison of the displayed value with `expected`
    ///
    /// An absent value never matches.
    pub fn matches(&self, expected: &str) -> bool {
        !self.is_absent() && self.to_string().to_lowercase() == expected.to_lowercase()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Date(date) => write!(f, "{}", date),
            Self::Timestamp(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<ReleaseDate> for FieldValue {
    fn from(date: ReleaseDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let value = FieldValue::from("Full-length");
        assert!(value.matches("full-length"));
        assert!(value.matches("FULL-LENGTH"));
        assert!(!value.matches("EP"));
    }

    #[test]
    fn test_matches_integer_and_list() {
        assert!(FieldValue::from(1986i64).matches("1986"));
        let genres = FieldValue::from(vec!["Thrash Metal".to_string(), "Hard Rock".to_string()]);
        assert!(genres.matches("thrash metal, hard rock"));
    }

    #[test]
    fn test_absent_never_matches() {
        assert!(!FieldValue::Absent.matches(""));
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Absent);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::from("x").as_text(), Some("x"));
        assert_eq!(FieldValue::from(3u32).as_integer(), Some(3));
        assert_eq!(FieldValue::from(3u32).as_text(), None);
        assert_eq!(
            FieldValue::from(vec!["a".to_string()]).as_list(),
            Some(&["a".to_string()][..])
        );
    }
}

//! Entities, stubs and lazy resolution
//!
//! Every page on the site describes one entity with a numeric identifier
//! and a canonical path derived from it. Listing pages show a few fields of
//! many entities at once; those rows become *stubs*. A stub is wrapped in a
//! [`LazyEntity`], which fetches and parses the entity's own page the first
//! time a field the stub cannot supply is read.
//!
//! # Components
//!
//! - `Entity`: a complete entity parsed from its own page
//! - `Stub`: the partial view of an entity taken from a listing row
//! - `LazyEntity`: the Stub → Full state machine
//! - `FieldSource`: name-addressed field access, used for filtering
//! - `Collection`: an ordered, filterable group of entities

mod collection;
mod field;
mod lazy;

pub use collection::Collection;
pub use field::FieldValue;
pub use lazy::LazyEntity;

use crate::fetch::{Page, PageFetcher};
use crate::{MetallumError, Result};
use std::future::Future;

/// A complete entity parsed from its own page
pub trait Entity: Sized + Send + Sync {
    /// Type name used in error messages
    const NAME: &'static str;

    /// Every field name [`Entity::field_value`] answers
    const FIELDS: &'static [&'static str];

    /// Parses the entity from its fetched page
    fn from_page(page: &Page, fetcher: &PageFetcher) -> Result<Self>;

    /// Reads a field by name
    fn field_value(&self, name: &str) -> Result<FieldValue>;

    /// Returns true if the type defines `name`
    fn defines(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

/// Partial view of an entity, built from a listing row
///
/// Every name in [`Stub::FIELDS`] must also be in the full entity's
/// `FIELDS`, with the same meaning.
pub trait Stub: Send + Sync {
    /// Entity this stub upgrades to
    type Full: Entity;

    /// Field names a stub of this type may supply
    const FIELDS: &'static [&'static str];

    /// Canonical relative path of the entity's own page
    fn path(&self) -> String;

    /// Reads a field from the stub, `None` if this stub cannot supply it
    ///
    /// A name in `FIELDS` may still yield `None` when the listing the stub
    /// came from did not show that column.
    fn stub_field(&self, name: &str) -> Option<FieldValue>;
}

/// Anything whose fields can be read by name
pub trait FieldSource {
    /// Reads a field by name, fetching whatever page is needed to answer
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send;
}

impl<T: Entity> FieldSource for T {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.field_value(name))
    }
}

/// Error for a field name an entity type does not define
pub(crate) fn unknown_field(entity: &'static str, name: &str) -> MetallumError {
    MetallumError::UnknownField {
        entity,
        field: name.to_string(),
    }
}

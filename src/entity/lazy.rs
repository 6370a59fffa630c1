//! Lazy resolution of stubs into full entities

use crate::entity::{unknown_field, Entity, FieldSource, FieldValue, Stub};
use crate::fetch::PageFetcher;
use crate::Result;
use std::fmt;
use std::future::Future;
use tokio::sync::OnceCell;

/// A stub that upgrades itself to its full entity on demand
///
/// # States
///
/// - **Stub**: initial state. Reads of fields the stub supplies are
///   answered without any request.
/// - **Full**: terminal state, entered the first time a field the stub
///   cannot supply is read. The entity's page is fetched once; every later
///   read, stub fields included, is answered by the full entity.
///
/// Concurrent first reads share a single fetch. A failed fetch leaves the
/// entity in the stub state, so the next read tries again.
pub struct LazyEntity<S: Stub> {
    stub: S,
    full: OnceCell<S::Full>,
    fetcher: PageFetcher,
}

impl<S: Stub> LazyEntity<S> {
    pub fn new(stub: S, fetcher: PageFetcher) -> Self {
        Self {
            stub,
            full: OnceCell::new(),
            fetcher,
        }
    }

    /// The stub this entity was built from
    pub fn stub(&self) -> &S {
        &self.stub
    }

    /// Canonical relative path of the entity's page
    pub fn path(&self) -> String {
        self.stub.path()
    }

    /// Returns true once the full entity has been fetched
    pub fn is_resolved(&self) -> bool {
        self.full.initialized()
    }

    /// The full entity, if already fetched
    pub fn resolved(&self) -> Option<&S::Full> {
        self.full.get()
    }

    /// Fetches the full entity if needed and returns it
    pub async fn resolve(&self) -> Result<&S::Full> {
        self.full
            .get_or_try_init(|| async {
                let path = self.stub.path();
                tracing::debug!("Resolving {} stub from {}", S::Full::NAME, path);
                let page = self.fetcher.fetch(&path).await?;
                S::Full::from_page(&page, &self.fetcher)
            })
            .await
    }

    /// Reads a field by name
    ///
    /// Resolution order: a resolved entity answers directly; otherwise the
    /// stub answers for names in [`Stub::FIELDS`] it can supply; otherwise, if the full type defines the
    /// field, the entity is resolved and answers. Names neither type
    /// defines fail without any request.
    pub async fn value(&self, name: &str) -> Result<FieldValue> {
        if let Some(full) = self.full.get() {
            return full.field_value(name);
        }

        if S::FIELDS.contains(&name) {
            if let Some(value) = self.stub.stub_field(name) {
                return Ok(value);
            }
        }

        if !S::Full::defines(name) {
            return Err(unknown_field(S::Full::NAME, name));
        }

        self.resolve().await?.field_value(name)
    }
}

impl<S: Stub> FieldSource for LazyEntity<S> {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        self.value(name)
    }
}

impl<S> Clone for LazyEntity<S>
where
    S: Stub + Clone,
    S::Full: Clone,
{
    fn clone(&self) -> Self {
        Self {
            stub: self.stub.clone(),
            full: self.full.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<S> fmt::Debug for LazyEntity<S>
where
    S: Stub + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyEntity")
            .field("stub", &self.stub)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

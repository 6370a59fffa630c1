//! Ordered, filterable groups of entities

use crate::entity::FieldSource;
use crate::Result;
use std::ops::Index;

/// An ordered group of entities, as listed on the page it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: FieldSource + Clone> Collection<T> {
    /// Returns the members whose named fields all match the given values
    ///
    /// Each criterion is a `(field, value)` pair compared with
    /// [`FieldValue::matches`](crate::FieldValue::matches). Members keep
    /// their relative order. Reading a field may fetch the member's page;
    /// the first failure aborts the search. Members are evaluated one at a
    /// time, so fetches go through the throttle in listing order.
    pub async fn search(&self, criteria: &[(&str, &str)]) -> Result<Collection<T>> {
        let mut matched = Vec::new();

        'items: for item in &self.items {
            for (name, expected) in criteria {
                if !item.field(name).await?.matches(expected) {
                    continue 'items;
                }
            }
            matched.push(item.clone());
        }

        tracing::debug!(
            "Search over {} items with {} criteria matched {}",
            self.items.len(),
            criteria.len(),
            matched.len()
        );
        Ok(Collection::new(matched))
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

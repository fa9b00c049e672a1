//! Field configuration resolution for derived table types
//!
//! A type tree does not own field definitions: it asks the base table for a
//! field's authoritative configuration the first time the field is needed and
//! keeps the answer in a [`ResolverCache`] until it is invalidated.

use crate::ColumnMap;
use crate::tree::{ColumnConfig, FormTree};
use std::collections::HashMap;
use tracing::trace;

/// Lazily provides the configuration of a field by id
pub trait FieldConfigResolver {
    /// `None` when the field is unknown to the resolver
    fn resolve(&mut self, field_id: &str) -> Option<ColumnConfig>;
}

impl<F> FieldConfigResolver for F
where
    F: FnMut(&str) -> Option<ColumnConfig>,
{
    fn resolve(&mut self, field_id: &str) -> Option<ColumnConfig> {
        self(field_id)
    }
}

/// Resolves fields of the base table
///
/// Field nodes of the base tree win over the stored `columns` entries, so
/// edits made through the fluent API are visible to the types.
pub struct BaseTableResolver<'a> {
    tree: &'a FormTree,
    columns: &'a ColumnMap,
}

impl<'a> BaseTableResolver<'a> {
    pub fn new(tree: &'a FormTree, columns: &'a ColumnMap) -> Self {
        Self { tree, columns }
    }
}

impl FieldConfigResolver for BaseTableResolver<'_> {
    fn resolve(&mut self, field_id: &str) -> Option<ColumnConfig> {
        self.tree
            .find_field(field_id)
            .and_then(|node| node.config())
            .or_else(|| self.columns.get(field_id))
            .cloned()
    }
}

/// Per-type memo of resolved field configurations
#[derive(Debug, Clone, Default)]
pub struct ResolverCache {
    entries: HashMap<String, Option<ColumnConfig>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget one field; returns whether it was cached
    pub fn invalidate(&mut self, field_id: &str) -> bool {
        self.take(field_id).is_some()
    }

    /// Forget one field, returning the resolution it held
    ///
    /// The outer `None` means nothing was cached; `Some(None)` means the
    /// field was resolved and unknown.
    pub fn take(&mut self, field_id: &str) -> Option<Option<ColumnConfig>> {
        self.entries.remove(field_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrap `inner` so that each field is resolved at most once
    pub fn wrap<R: FieldConfigResolver>(&mut self, inner: R) -> CachedResolver<'_, R> {
        CachedResolver { inner, cache: self }
    }
}

/// Resolver that consults a [`ResolverCache`] before its inner resolver
pub struct CachedResolver<'a, R> {
    inner: R,
    cache: &'a mut ResolverCache,
}

impl<R: FieldConfigResolver> FieldConfigResolver for CachedResolver<'_, R> {
    fn resolve(&mut self, field_id: &str) -> Option<ColumnConfig> {
        if let Some(cached) = self.cache.entries.get(field_id) {
            return cached.clone();
        }
        trace!("Resolving field '{}' from base table", field_id);
        let resolved = self.inner.resolve(field_id);
        self.cache
            .entries
            .insert(field_id.to_string(), resolved.clone());
        resolved
    }
}

//! Search backends
//!
//! The widget never talks to a backend itself. Hosts provide a
//! [`SearchLoader`]; the crate ships two small implementations, an
//! in-memory [`StaticLoader`] and a closure adapter [`FnLoader`].

use super::error::LoadError;
use crate::item::ItemAdapter;
use async_trait::async_trait;
use std::future::Future;

/// Host-provided search backend
///
/// A call is never cancelled once dispatched. Slow responses that arrive
/// after a newer query was typed are discarded by the widget.
#[async_trait]
pub trait SearchLoader<T>: Send + Sync {
    /// Fetch the items matching `query`
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the backend cannot produce results.
    async fn load(&self, query: &str) -> Result<Vec<T>, LoadError>;
}

/// Filters a fixed list of items by case-insensitive label match
#[derive(Debug, Clone)]
pub struct StaticLoader<T> {
    items: Vec<T>,
    adapter: ItemAdapter<T>,
    limit: Option<usize>,
}

impl<T: Clone> StaticLoader<T> {
    /// Create a loader over `items`, labelled through `adapter`
    #[must_use]
    pub const fn new(items: Vec<T>, adapter: ItemAdapter<T>) -> Self {
        Self {
            items,
            adapter,
            limit: None,
        }
    }

    /// Return at most `limit` results
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Items whose label contains `query`, ignoring case
    #[must_use]
    pub fn matches(&self, query: &str) -> Vec<T> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| self.adapter.label_of(item).to_lowercase().contains(&needle))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<T> SearchLoader<T> for StaticLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self, query: &str) -> Result<Vec<T>, LoadError> {
        Ok(self.matches(query))
    }
}

/// Adapts an async closure into a [`SearchLoader`]
///
/// ```ignore
/// let loader = FnLoader::new(|query: String| async move {
///     backend.search(&query).await.map_err(|e| LoadError::new(e.to_string()))
/// });
/// ```
pub struct FnLoader<F> {
    load: F,
}

impl<F> FnLoader<F> {
    /// Wrap `load`
    pub const fn new(load: F) -> Self {
        Self { load }
    }
}

#[async_trait]
impl<T, F, Fut> SearchLoader<T> for FnLoader<F>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, LoadError>> + Send + 'static,
{
    async fn load(&self, query: &str) -> Result<Vec<T>, LoadError> {
        (self.load)(query.to_string()).await
    }
}

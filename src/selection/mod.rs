//! Ordered, key-deduplicated selection
//!
//! Selected items keep their insertion order and are unique by the key
//! produced by the widget's [`ItemAdapter`]. The model only enforces those
//! two rules and the optional size limit; closing the panel, clearing the
//! query and notifying the host form are the widget's job.

use crate::item::{ItemAdapter, ItemKey};

/// Why a selection attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An item with the same key is already selected
    AlreadySelected,
    /// The configured maximum has been reached
    MaximumReached,
    /// The widget is disabled
    Disabled,
}

/// Selected items of one widget
#[derive(Debug, Clone)]
pub struct SelectionModel<T> {
    items: Vec<T>,
    adapter: ItemAdapter<T>,
    max_items: Option<usize>,
}

impl<T: Clone> SelectionModel<T> {
    /// Create an empty selection
    #[must_use]
    pub const fn new(adapter: ItemAdapter<T>, max_items: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            adapter,
            max_items,
        }
    }

    /// Selected items in insertion order
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of selected items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adapter used to derive keys and labels
    #[must_use]
    pub const fn adapter(&self) -> &ItemAdapter<T> {
        &self.adapter
    }

    /// Whether the selection is at its maximum size
    #[must_use]
    pub fn maximum_reached(&self) -> bool {
        self.max_items.is_some_and(|max| self.items.len() >= max)
    }

    /// Key-based membership test
    #[must_use]
    pub fn is_selected(&self, item: &T) -> bool {
        self.items
            .iter()
            .any(|selected| self.adapter.same_key(selected, item))
    }

    /// Append `item`
    ///
    /// # Errors
    ///
    /// Returns a `Rejection` when an item with the same key is already
    /// selected or the maximum has been reached.
    pub fn select(&mut self, item: T) -> Result<(), Rejection> {
        if self.is_selected(&item) {
            return Err(Rejection::AlreadySelected);
        }
        if self.maximum_reached() {
            return Err(Rejection::MaximumReached);
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the first item whose key matches `item`
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self
            .items
            .iter()
            .position(|selected| self.adapter.same_key(selected, item))?;
        Some(self.items.remove(index))
    }

    /// Remove the last item
    pub fn pop_last(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove every item, returning whether anything was removed
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Replace the selection with `items`, dropping later duplicates
    ///
    /// Returns `true` when the stored selection changed.
    pub fn replace(&mut self, items: Vec<T>) -> bool {
        let mut keys: Vec<ItemKey> = Vec::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            let key = self.adapter.key_of(&item);
            if keys.contains(&key) {
                tracing::warn!(%key, "dropping duplicate item from bound value");
                continue;
            }
            keys.push(key);
            unique.push(item);
        }

        let current: Vec<ItemKey> = self.items.iter().map(|i| self.adapter.key_of(i)).collect();
        let changed = current != keys;
        self.items = unique;
        changed
    }

    /// First item of `candidates` that is not selected yet
    #[must_use]
    pub fn first_selectable<'a>(&self, candidates: &'a [T]) -> Option<&'a T> {
        candidates.iter().find(|item| !self.is_selected(item))
    }

    /// Indices of `candidates` that are not selected yet
    #[must_use]
    pub fn selectable_indices(&self, candidates: &[T]) -> Vec<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, item)| !self.is_selected(item))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TagItem;

    fn tag(id: &str) -> TagItem {
        TagItem::new(id, id.to_uppercase())
    }

    fn model(max: Option<usize>) -> SelectionModel<TagItem> {
        SelectionModel::new(ItemAdapter::default(), max)
    }

    #[test]
    fn test_select_then_is_selected() {
        let mut selection = model(None);
        assert!(!selection.is_selected(&tag("a")));
        selection.select(tag("a")).unwrap();
        assert!(selection.is_selected(&tag("a")));
    }

    #[test]
    fn test_remove_then_not_selected() {
        let mut selection = model(None);
        selection.select(tag("a")).unwrap();
        selection.select(tag("b")).unwrap();
        assert_eq!(selection.remove(&tag("a")), Some(tag("a")));
        assert!(!selection.is_selected(&tag("a")));
        assert_eq!(selection.items(), &[tag("b")]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut selection = model(None);
        selection.select(tag("a")).unwrap();
        assert_eq!(selection.remove(&tag("z")), None);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut selection = model(None);
        selection.select(TagItem::new("a", "first")).unwrap();
        assert_eq!(
            selection.select(TagItem::new("a", "second")),
            Err(Rejection::AlreadySelected)
        );
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.items()[0].label, "first");
    }

    #[test]
    fn test_duplicate_under_custom_key() {
        let adapter =
            ItemAdapter::<TagItem>::default().with_key(|item| ItemKey::new(item.label.to_lowercase()));
        let mut selection = SelectionModel::new(adapter, None);
        selection.select(TagItem::new(1_u64, "Rust")).unwrap();
        assert_eq!(
            selection.select(TagItem::new(2_u64, "RUST")),
            Err(Rejection::AlreadySelected)
        );
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_numeric_and_text_ids_are_distinct_items() {
        let mut selection = model(None);
        selection.select(TagItem::new(7_u64, "seven")).unwrap();
        selection.select(TagItem::new("7", "seven")).unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.remove(&TagItem::new("7", "x")), Some(TagItem::new("7", "seven")));
        assert!(selection.is_selected(&TagItem::new(7_u64, "x")));
    }

    #[test]
    fn test_maximum() {
        let mut selection = model(Some(2));
        selection.select(tag("a")).unwrap();
        assert!(!selection.maximum_reached());
        selection.select(tag("b")).unwrap();
        assert!(selection.maximum_reached());
        assert_eq!(selection.select(tag("c")), Err(Rejection::MaximumReached));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_pop_last_and_clear() {
        let mut selection = model(None);
        assert_eq!(selection.pop_last(), None);
        selection.select(tag("a")).unwrap();
        selection.select(tag("b")).unwrap();
        assert_eq!(selection.pop_last(), Some(tag("b")));
        assert!(selection.clear());
        assert!(!selection.clear());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_replace_dedups_and_reports_change() {
        let mut selection = model(None);
        assert!(selection.replace(vec![tag("a"), tag("b"), tag("a")]));
        assert_eq!(selection.items(), &[tag("a"), tag("b")]);
        assert!(!selection.replace(vec![tag("a"), tag("b")]));
        assert!(selection.replace(vec![tag("b"), tag("a")]));
    }

    #[test]
    fn test_first_selectable_skips_selected() {
        let mut selection = model(None);
        selection.select(tag("a")).unwrap();
        let results = vec![tag("a"), tag("b"), tag("c")];
        assert_eq!(selection.first_selectable(&results), Some(&tag("b")));
        assert_eq!(selection.selectable_indices(&results), vec![1, 2]);

        selection.select(tag("b")).unwrap();
        selection.select(tag("c")).unwrap();
        assert_eq!(selection.first_selectable(&results), None);
    }
}

//! Collection state
//!
//! The locally materialized slice of a server-side collection plus the
//! pagination cursor and loading flags. A [`PagedCollectionStore`] publishes
//! a new `CollectionState` every time one of these fields changes.
//!
//! [`PagedCollectionStore`]: super::PagedCollectionStore

use std::collections::HashSet;

use crate::models::{Entity, EntityId, Searchable};

/// Loading lifecycle of a store
///
/// ```text
/// Idle ──fetch──▶ FetchingFirstPage ──ok──▶ Ready ──load_more──▶ FetchingMore ──▶ Ready
///                        │                    ▲ │
///                        └──err──▶ Errored ───┘ └──fetch──▶ FetchingFirstPage
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing fetched yet
    Idle,
    /// A fetch of page 1 is in flight
    FetchingFirstPage,
    /// Page 1 (and possibly more) loaded
    Ready,
    /// A load-more request is in flight
    FetchingMore,
    /// The last fetch failed
    Errored,
}

/// Snapshot of a paged collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    /// Server page order, then append order; unique by id
    pub items: Vec<T>,
    /// Last page requested successfully (1-based)
    pub current_page: u32,
    /// Whether the last page response reported a next page
    pub has_more: bool,
    /// A fetch of page 1 is in flight
    pub loading: bool,
    /// A load-more request is in flight
    pub loading_more: bool,
    /// User-facing message of the last failed fetch
    pub error: Option<String>,
    /// Client-side filter applied by [`filtered_items`](Self::filtered_items)
    pub search_query: String,
    /// The last settled fetch succeeded
    pub loaded: bool,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            has_more: false,
            loading: false,
            loading_more: false,
            error: None,
            search_query: String::new(),
            loaded: false,
        }
    }
}

impl<T> CollectionState<T> {
    /// Current lifecycle phase, derived from the flags
    pub fn phase(&self) -> LoadPhase {
        if self.loading {
            LoadPhase::FetchingFirstPage
        } else if self.loading_more {
            LoadPhase::FetchingMore
        } else if self.error.is_some() {
            LoadPhase::Errored
        } else if self.loaded {
            LoadPhase::Ready
        } else {
            LoadPhase::Idle
        }
    }

    /// Whether a load-more call would issue a request
    pub fn can_load_more(&self) -> bool {
        self.phase() == LoadPhase::Ready && self.has_more
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Entity> CollectionState<T> {
    /// Find an entity by id
    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.find(id).is_some()
    }

    /// Replace the items wholesale, dropping repeated ids
    ///
    /// Returns the number of entities dropped.
    pub(crate) fn replace_items(&mut self, incoming: Vec<T>) -> usize {
        self.items.clear();
        self.append_items(incoming)
    }

    /// Append entities after the current items, skipping ids already present
    ///
    /// Returns the number of entities skipped.
    pub(crate) fn append_items(&mut self, incoming: Vec<T>) -> usize {
        let mut seen: HashSet<EntityId> = self.items.iter().map(Entity::id).collect();
        let offered = incoming.len();
        let before = self.items.len();
        self.items
            .extend(incoming.into_iter().filter(|item| seen.insert(item.id())));
        offered - (self.items.len() - before)
    }

    /// Insert at the front, replacing an existing entity with the same id
    pub(crate) fn prepend_item(&mut self, item: T) {
        if let Some(pos) = self.items.iter().position(|i| i.id() == item.id()) {
            self.items.remove(pos);
        }
        self.items.insert(0, item);
    }

    /// Replace the first entity with the same id in place
    ///
    /// Returns false if no entity matched.
    pub(crate) fn replace_item(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|i| i.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove the first entity with the given id
    ///
    /// Returns false if no entity matched.
    pub(crate) fn remove_item(&mut self, id: EntityId) -> bool {
        match self.items.iter().position(|i| i.id() == id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<T: Searchable + Clone> CollectionState<T> {
    /// Items matching the search query (all items when the query is empty)
    ///
    /// Never modifies `items`.
    pub fn filtered_items(&self) -> Vec<T> {
        if self.search_query.is_empty() {
            return self.items.clone();
        }
        self.items
            .iter()
            .filter(|item| item.matches(&self.search_query))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn categories(ids: &[u64]) -> Vec<Category> {
        ids.iter()
            .map(|&id| Category::new(id, format!("Category {}", id)))
            .collect()
    }

    fn ids(state: &CollectionState<Category>) -> Vec<u64> {
        state.items.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_default_is_idle() {
        let state: CollectionState<Category> = CollectionState::default();
        assert_eq!(state.phase(), LoadPhase::Idle);
        assert_eq!(state.current_page, 1);
        assert!(!state.has_more);
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_phase_precedence() {
        let mut state: CollectionState<Category> = CollectionState::default();

        state.loading = true;
        assert_eq!(state.phase(), LoadPhase::FetchingFirstPage);

        state.loading = false;
        state.error = Some("boom".to_string());
        assert_eq!(state.phase(), LoadPhase::Errored);

        state.error = None;
        state.loaded = true;
        assert_eq!(state.phase(), LoadPhase::Ready);

        state.loading_more = true;
        assert_eq!(state.phase(), LoadPhase::FetchingMore);
    }

    #[test]
    fn test_append_skips_existing_ids() {
        let mut state = CollectionState::default();
        assert_eq!(state.replace_items(categories(&[1, 2, 3])), 0);

        let skipped = state.append_items(categories(&[3, 4, 4, 5]));
        assert_eq!(skipped, 2);
        assert_eq!(ids(&state), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_replace_drops_duplicates_within_page() {
        let mut state = CollectionState::default();
        state.replace_items(categories(&[9, 9]));
        assert_eq!(state.replace_items(categories(&[1, 2, 1])), 1);
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_prepend_replaces_same_id() {
        let mut state = CollectionState::default();
        state.replace_items(categories(&[1, 2, 3]));

        state.prepend_item(Category::new(2, "Moved"));
        assert_eq!(ids(&state), vec![2, 1, 3]);
        assert_eq!(state.items[0].name, "Moved");

        state.prepend_item(Category::new(7, "New"));
        assert_eq!(ids(&state), vec![7, 2, 1, 3]);
    }

    #[test]
    fn test_replace_and_remove_item() {
        let mut state = CollectionState::default();
        state.replace_items(categories(&[1, 2]));

        assert!(state.replace_item(Category::new(2, "Renamed")));
        assert_eq!(state.find(2).unwrap().name, "Renamed");
        assert!(!state.replace_item(Category::new(8, "Missing")));
        assert_eq!(state.len(), 2);

        assert!(state.remove_item(1));
        assert!(!state.remove_item(1));
        assert_eq!(ids(&state), vec![2]);
    }

    #[test]
    fn test_filtered_items() {
        let mut state = CollectionState::default();
        state.replace_items(vec![
            Category::new(1, "Carnes"),
            Category::new(2, "Bebidas"),
            Category::new(3, "Verduras"),
        ]);

        assert_eq!(state.filtered_items(), state.items);

        state.search_query = "BEB".to_string();
        let filtered = state.filtered_items();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
        assert_eq!(state.filtered_items(), filtered);
        assert_eq!(state.len(), 3);
    }
}

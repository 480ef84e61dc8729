//! Selection store
//!
//! The set of selected rows across all pages, keyed by identity and kept in
//! insertion order. It does not know which page is visible; callers pass the
//! visible keys in when they reconcile.

use std::collections::HashSet;

use crate::model::Entity;
use crate::model::Page;

/// Selected rows, unique by identity key, in insertion order.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use pageselect_lib::model::Entity;
/// use pageselect_lib::selection::SelectionStore;
///
/// let mut store = SelectionStore::new();
/// store.add([Entity::new("R1"), Entity::new("R2"), Entity::new("R1")]);
/// assert_eq!(store.len(), 2);
///
/// // R2 is visible and no longer checked; R1 is off-page and untouched.
/// let visible: HashSet<&str> = ["R2", "R3"].into_iter().collect();
/// store.replace_visible(&visible, [Entity::new("R3")]);
/// assert!(store.contains("R1"));
/// assert!(!store.contains("R2"));
/// assert!(store.contains("R3"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    entities: Vec<Entity>,
    keys: HashSet<String>,
}

impl SelectionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts each entity whose key is not already present.
    ///
    /// Duplicates, including duplicates within `entities`, are dropped.
    /// Returns the number of entities inserted.
    pub fn add<I>(&mut self, entities: I) -> usize
    where
        I: IntoIterator<Item = Entity>,
    {
        let before = self.entities.len();
        for entity in entities {
            if self.keys.insert(entity.identity_key().to_string()) {
                self.entities.push(entity);
            }
        }
        self.entities.len() - before
    }

    /// Removes every entity whose key is in `keys`. Unknown keys are ignored.
    ///
    /// Returns the number of entities removed.
    pub fn remove(&mut self, keys: &HashSet<&str>) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !keys.contains(e.identity_key()));
        self.keys.retain(|k| !keys.contains(k.as_str()));
        before - self.entities.len()
    }

    /// Replaces the selection state of the visible rows.
    ///
    /// The result is `(selection − visible) ∪ new_selection`: every visible
    /// row ends up selected exactly when it is in `new_selection`, and rows
    /// outside `visible_keys` keep their state. Rows that stay selected keep
    /// their position, so insertion order is stable across page loads.
    pub fn replace_visible<I>(&mut self, visible_keys: &HashSet<&str>, new_selection: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        let new_selection: Vec<Entity> = new_selection.into_iter().collect();
        let keep: HashSet<&str> = new_selection.iter().map(Entity::identity_key).collect();

        let dropped: HashSet<&str> = visible_keys
            .iter()
            .copied()
            .filter(|k| !keep.contains(k))
            .collect();
        self.remove(&dropped);
        self.add(new_selection);
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.keys.clear();
    }

    /// Returns the first `n` selected entities in insertion order.
    pub fn first_n(&self, n: usize) -> &[Entity] {
        &self.entities[..n.min(self.entities.len())]
    }

    /// Returns the selected entities that are on `page`, in page order.
    pub fn selected_in(&self, page: &Page) -> Vec<Entity> {
        page.entities()
            .iter()
            .filter(|e| self.contains(e.identity_key()))
            .cloned()
            .collect()
    }

    /// Returns `true` if a row with this key is selected.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns all selected entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns an iterator over the selected identity keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(Entity::identity_key)
    }

    /// Returns the number of selected entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

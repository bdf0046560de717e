//! Change events for live query results.
//!
//! A `ChangeBatch` is the unit of notification: everything that happened to
//! a result set between one consistent state and the next, delivered to
//! subscribers as a single ordered list of `Change` events.

use crate::path::IndexPath;
use alloc::vec::Vec;

/// A single change to a sectioned result set.
///
/// `Update` and `Move` carry the entity in its new state so subscribers can
/// re-configure whatever is displaying it without reading the controller
/// back during notification.
#[derive(Clone, Debug)]
pub enum Change<E> {
    /// An entity entered the result set at `new`.
    Insert { new: IndexPath },
    /// The entity at `old` left the result set.
    Delete { old: IndexPath },
    /// The entity at `at` changed in place.
    Update { at: IndexPath, entity: E },
    /// An entity moved from `from` to `to` without leaving the result set.
    Move {
        from: IndexPath,
        to: IndexPath,
        entity: E,
    },
    /// A new section appeared at `index`.
    InsertSection { index: usize },
    /// The section at `index` disappeared, taking its rows with it.
    DeleteSection { index: usize },
    /// The section at `index` changed (name or metadata) and should be reloaded.
    UpdateSection { index: usize },
}

/// An ordered batch of changes between two result-set states.
///
/// Events are ordered so that applying them one by one transforms the
/// previous state into the new one:
///
/// 1. `Delete` events, addressed in pre-batch coordinates
/// 2. `DeleteSection` events
/// 3. `InsertSection` events
/// 4. `Insert` events, addressed in post-batch coordinates
/// 5. `Update` / `Move` events, addressed in post-batch coordinates
///
/// Controllers are responsible for emitting batches in this order; widgets
/// and replay-based tests may rely on it.
#[derive(Clone, Debug, Default)]
pub struct ChangeBatch<E> {
    changes: Vec<Change<E>>,
}

impl<E> ChangeBatch<E> {
    /// Creates a new empty change batch.
    #[inline]
    pub fn new() -> Self {
        Self { changes: Vec::new() }
    }

    /// Returns true if there are no changes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of changes.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns the changes in application order.
    #[inline]
    pub fn as_slice(&self) -> &[Change<E>] {
        &self.changes
    }

    /// Iterates over the changes in application order.
    pub fn iter(&self) -> core::slice::Iter<'_, Change<E>> {
        self.changes.iter()
    }

    /// Appends a change.
    #[inline]
    pub fn push(&mut self, change: Change<E>) {
        self.changes.push(change);
    }

    /// Merges another batch into this one, keeping event order.
    pub fn merge(&mut self, other: ChangeBatch<E>) {
        self.changes.extend(other.changes);
    }

    /// Clears all changes.
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Appends an insert event.
    #[inline]
    pub fn insert(&mut self, new: IndexPath) {
        self.push(Change::Insert { new });
    }

    /// Appends a delete event.
    #[inline]
    pub fn delete(&mut self, old: IndexPath) {
        self.push(Change::Delete { old });
    }

    /// Appends an in-place update event.
    #[inline]
    pub fn update(&mut self, at: IndexPath, entity: E) {
        self.push(Change::Update { at, entity });
    }

    /// Appends a move event.
    #[inline]
    pub fn moved(&mut self, from: IndexPath, to: IndexPath, entity: E) {
        self.push(Change::Move { from, to, entity });
    }

    /// Appends a section insert event.
    #[inline]
    pub fn insert_section(&mut self, index: usize) {
        self.push(Change::InsertSection { index });
    }

    /// Appends a section delete event.
    #[inline]
    pub fn delete_section(&mut self, index: usize) {
        self.push(Change::DeleteSection { index });
    }

    /// Appends a section update event.
    #[inline]
    pub fn update_section(&mut self, index: usize) {
        self.push(Change::UpdateSection { index });
    }
}

impl<'a, E> IntoIterator for &'a ChangeBatch<E> {
    type Item = &'a Change<E>;
    type IntoIter = core::slice::Iter<'a, Change<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_batch_new() {
        let batch: ChangeBatch<u32> = ChangeBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_change_batch_preserves_order() {
        let mut batch: ChangeBatch<u32> = ChangeBatch::new();
        batch.delete(IndexPath::new(0, 1));
        batch.delete_section(0);
        batch.insert_section(1);
        batch.insert(IndexPath::new(1, 0));

        let kinds: Vec<&Change<u32>> = batch.iter().collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(kinds[0], Change::Delete { .. }));
        assert!(matches!(kinds[1], Change::DeleteSection { .. }));
        assert!(matches!(kinds[2], Change::InsertSection { .. }));
        assert!(matches!(kinds[3], Change::Insert { .. }));
    }

    #[test]
    fn test_change_batch_merge() {
        let mut first: ChangeBatch<u32> = ChangeBatch::new();
        first.insert(IndexPath::new(0, 0));

        let mut second: ChangeBatch<u32> = ChangeBatch::new();
        second.update(IndexPath::new(0, 0), 42);

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert!(matches!(first.as_slice()[1], Change::Update { entity: 42, .. }));
    }

    #[test]
    fn test_change_batch_update_carries_entity() {
        let mut batch: ChangeBatch<&str> = ChangeBatch::new();
        batch.update(IndexPath::new(0, 3), "renamed");

        match batch.as_slice() {
            [Change::Update { at, entity }] => {
                assert_eq!(*at, IndexPath::new(0, 3));
                assert_eq!(*entity, "renamed");
            }
            other => panic!("unexpected batch contents: {:?}", other),
        }
    }

    #[test]
    fn test_change_batch_clear() {
        let mut batch: ChangeBatch<u32> = ChangeBatch::new();
        batch.insert(IndexPath::new(0, 0));
        batch.moved(IndexPath::new(0, 0), IndexPath::new(0, 1), 1);

        assert!(!batch.is_empty());
        batch.clear();
        assert!(batch.is_empty());
    }
}

//! In-memory results controller.
//!
//! `MemoryController` materializes one `FetchRequest` against the entity map
//! it shares with its `MemoryContext`, and turns each store mutation into an
//! ordered `ChangeBatch` (see `ChangeBatch` for the ordering contract).

use crate::snapshot::Snapshot;
use alloc::collections::BTreeMap;
use alloc::rc::Weak;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use vitrine_core::{
    ChangeBatch, ChangeCallback, Entity, EntityId, Error, FetchRequest, IndexPath, Result,
    ResultsController, SectionInfo, SubscriptionId, SubscriptionManager,
};

/// A single store mutation, as reported by the context to its controllers.
pub(crate) enum Mutation<E> {
    Inserted(E),
    Deleted(EntityId),
    Updated(E),
}

impl<E: Entity> Mutation<E> {
    fn entity_id(&self) -> EntityId {
        match self {
            Mutation::Inserted(entity) | Mutation::Updated(entity) => entity.entity_id(),
            Mutation::Deleted(id) => *id,
        }
    }

    fn entity(&self) -> Option<&E> {
        match self {
            Mutation::Inserted(entity) | Mutation::Updated(entity) => Some(entity),
            Mutation::Deleted(_) => None,
        }
    }
}

/// A live query over a `MemoryContext`.
///
/// The fetch batch size is accepted but has no effect here; an in-memory
/// store has nothing to page.
pub struct MemoryController<E: Entity> {
    request: FetchRequest<E>,
    entities: Weak<RefCell<BTreeMap<EntityId, E>>>,
    fail_fetches: Weak<Cell<bool>>,
    snapshot: Snapshot<E>,
    fetched: bool,
    subscriptions: SubscriptionManager<E>,
}

impl<E: Entity> MemoryController<E> {
    pub(crate) fn new(
        request: FetchRequest<E>,
        entities: Weak<RefCell<BTreeMap<EntityId, E>>>,
        fail_fetches: Weak<Cell<bool>>,
    ) -> Self {
        Self {
            request,
            entities,
            fail_fetches,
            snapshot: Snapshot::empty(),
            fetched: false,
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Returns the request this controller materializes.
    pub fn request(&self) -> &FetchRequest<E> {
        &self.request
    }

    /// Returns the number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Absorbs one store mutation: rebuilds the snapshot and derives the
    /// change batch between the old and new states. Returns an empty batch
    /// before the first successful fetch.
    pub(crate) fn apply_mutation(&mut self, mutation: &Mutation<E>) -> ChangeBatch<E> {
        if !self.fetched {
            return ChangeBatch::new();
        }
        let entities = match self.entities.upgrade() {
            Some(entities) => entities,
            None => return ChangeBatch::new(),
        };
        let new_snapshot = Snapshot::build(&self.request, &entities.borrow());
        let old_snapshot = core::mem::replace(&mut self.snapshot, new_snapshot);
        derive_batch(&old_snapshot, &self.snapshot, mutation)
    }

    pub(crate) fn notify(&self, batch: &ChangeBatch<E>) {
        self.subscriptions.notify_all(batch);
    }
}

impl<E: Entity> ResultsController<E> for MemoryController<E> {
    fn perform_fetch(&mut self) -> Result<()> {
        if self.fail_fetches.upgrade().map(|flag| flag.get()).unwrap_or(false) {
            return Err(Error::fetch_failed("simulated fetch failure"));
        }
        let entities = self.entities.upgrade().ok_or(Error::StoreReleased)?;
        let entities = entities.borrow();
        self.snapshot = Snapshot::build(&self.request, &entities);
        self.fetched = true;
        Ok(())
    }

    fn sections(&self) -> Vec<SectionInfo> {
        self.snapshot.section_infos()
    }

    fn number_of_sections(&self) -> usize {
        self.snapshot.number_of_sections()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.snapshot.number_of_rows(section)
    }

    fn object_at(&self, at: IndexPath) -> Option<E> {
        self.snapshot.object_at(at).cloned()
    }

    fn object_at_index(&self, index: usize) -> Option<E> {
        self.snapshot.object_at_index(index).cloned()
    }

    fn fetched_objects(&self) -> Vec<E> {
        self.snapshot.iter().cloned().collect()
    }

    fn index_path_of(&self, id: EntityId) -> Option<IndexPath> {
        self.snapshot.index_path_of(id)
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.snapshot.index_of(id)
    }

    fn len(&self) -> usize {
        self.snapshot.len()
    }

    fn subscribe(&mut self, callback: ChangeCallback<E>) -> SubscriptionId {
        self.subscriptions.subscribe_boxed(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }
}

/// Derives the ordered change batch taking `old` to `new`, given that the
/// single mutation behind the transition concerned `mutation`'s entity.
///
/// Only the mutated entity is addressed; everything else shifts implicitly,
/// which is exactly what sequential application of the batch reproduces.
fn derive_batch<E: Entity>(
    old: &Snapshot<E>,
    new: &Snapshot<E>,
    mutation: &Mutation<E>,
) -> ChangeBatch<E> {
    let mut batch = ChangeBatch::new();
    let id = mutation.entity_id();
    let old_path = old.index_path_of(id);
    let new_path = new.index_path_of(id);

    match (old_path, new_path) {
        // Never visible: a mutation to an entity the predicate excludes.
        (None, None) => {}

        // Entered the result set.
        (None, Some(to)) => {
            if section_is_new(old, new, to.section) {
                batch.insert_section(to.section);
            }
            batch.insert(to);
        }

        // Left the result set.
        (Some(from), None) => {
            batch.delete(from);
            if section_is_gone(old, new, from.section) {
                batch.delete_section(from.section);
            }
        }

        // Stayed, possibly somewhere else.
        (Some(from), Some(to)) => {
            let sections_unchanged = old.number_of_sections() == new.number_of_sections()
                && (0..old.number_of_sections())
                    .all(|index| old.section_name(index) == new.section_name(index));

            if sections_unchanged {
                if from == to {
                    if let Some(entity) = mutation.entity() {
                        batch.update(to, entity.clone());
                    }
                } else if let Some(entity) = mutation.entity() {
                    batch.moved(from, to, entity.clone());
                }
            } else {
                // The key change created and/or emptied a section; a plain
                // move cannot express that, so decompose.
                batch.delete(from);
                if section_is_gone(old, new, from.section) {
                    batch.delete_section(from.section);
                }
                if section_is_new(old, new, to.section) {
                    batch.insert_section(to.section);
                }
                batch.insert(to);
            }
        }
    }

    batch
}

/// True if the section at `index` of `new` has no namesake in `old`.
fn section_is_new<E: Entity>(old: &Snapshot<E>, new: &Snapshot<E>, index: usize) -> bool {
    match new.section_name(index) {
        Some(name) => !old.has_section_named(name),
        None => false,
    }
}

/// True if the section at `index` of `old` has no namesake in `new`.
fn section_is_gone<E: Entity>(old: &Snapshot<E>, new: &Snapshot<E>, index: usize) -> bool {
    match old.section_name(index) {
        Some(name) => !new.has_section_named(name),
        None => false,
    }
}

//! Store-side contracts.
//!
//! This crate deliberately does not know about any concrete persistence
//! layer. Hosts implement `FetchContext` over whatever object graph they
//! have; the adapters only ever talk to these traits.

use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::path::IndexPath;
use crate::request::FetchRequest;
use crate::subscription::{ChangeCallback, SubscriptionId};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Summary of one section of a fetched result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionInfo {
    /// Section name, as produced by the request's section key.
    /// Empty for the single section of an unsectioned request.
    pub name: String,
    /// Number of rows in the section.
    pub len: usize,
}

impl SectionInfo {
    /// Creates a new section summary.
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// A live query over an entity store.
///
/// A controller materializes the result set of one `FetchRequest`, keeps it
/// current as the store changes, and notifies subscribers with ordered
/// `ChangeBatch`es (see `ChangeBatch` for the ordering contract). Before the
/// first successful `perform_fetch` the result set is empty and no changes
/// are delivered.
pub trait ResultsController<E: Entity> {
    /// Executes (or re-executes) the fetch. On failure the previously
    /// materialized result set stays in place.
    fn perform_fetch(&mut self) -> Result<()>;

    /// Returns summaries of all sections.
    fn sections(&self) -> Vec<SectionInfo>;

    /// Returns the number of sections.
    fn number_of_sections(&self) -> usize;

    /// Returns the number of rows in `section`, or 0 for an unknown section.
    fn number_of_rows(&self, section: usize) -> usize;

    /// Returns the entity at `at`, or `None` when out of range.
    fn object_at(&self, at: IndexPath) -> Option<E>;

    /// Returns the entity at flat position `index`, in section-major order.
    fn object_at_index(&self, index: usize) -> Option<E>;

    /// Returns the current result set in section-major order.
    fn fetched_objects(&self) -> Vec<E>;

    /// Returns the index path of the entity with `id`, if present.
    fn index_path_of(&self, id: EntityId) -> Option<IndexPath>;

    /// Returns the flat position of the entity with `id`, if present.
    fn index_of(&self, id: EntityId) -> Option<usize>;

    /// Returns the total number of fetched entities.
    fn len(&self) -> usize;

    /// Returns true if nothing has been fetched or the result set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to change batches. The callback fires after the result
    /// set has already moved to its new state.
    fn subscribe(&mut self, callback: ChangeCallback<E>) -> SubscriptionId;

    /// Unsubscribes by ID. Returns true if the subscription existed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// A handle onto an entity store: builds live queries and mutates the graph.
///
/// Mutations (`insert`, `delete`) take effect in the in-memory graph
/// immediately and flow to live controllers; `save` is a durability point
/// and nothing else.
///
/// Change callbacks run synchronously while the mutation is still on the
/// stack. Code driven by a callback may read controllers but must not start
/// another mutation on the same context.
pub trait FetchContext<E: Entity> {
    /// The controller type this context produces.
    type Controller: ResultsController<E>;

    /// Builds a results controller for `request`. The controller is live
    /// once `perform_fetch` has succeeded.
    fn controller(&self, request: FetchRequest<E>) -> Rc<RefCell<Self::Controller>>;

    /// Creates a new entity in the graph and returns it.
    fn insert(&mut self) -> E;

    /// Removes the entity with `id` from the graph. Unknown ids are ignored.
    fn delete(&mut self, id: EntityId);

    /// Persists pending changes.
    fn save(&mut self) -> Result<()>;
}

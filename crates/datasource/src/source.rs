//! Generic base shared by the adapter families.
//!
//! `DataSourceCore` owns everything the table, collection, and picker
//! adapters have in common: the fetch configuration, the context handle,
//! and the lifetime of one results controller plus its change subscription.
//! The widget-facing types compose a core instead of inheriting anything.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::type_name;
use core::cell::RefCell;
use tracing::error;
use vitrine_core::{
    ChangeCallback, Entity, EntityId, FetchContext, FetchRequest, IndexPath, Predicate,
    ResultsController, SectionInfo, SectionKey, SortDescriptor, SubscriptionId,
};

/// Fetch configuration plus controller lifetime management.
///
/// A core starts detached: counts are zero and lookups return `None` until
/// `initiate` has built a controller and run the fetch. Configuration
/// changes made after `initiate` take effect only on the next `initiate`.
///
/// Mutations follow one policy everywhere: apply to the graph, then `save`,
/// and if the save fails log it and move on. The widgets have already been
/// told about the graph change by then, so the screen never goes stale.
pub struct DataSourceCore<E: Entity, C: FetchContext<E>> {
    context: Rc<RefCell<C>>,
    predicate: Option<Predicate<E>>,
    sort_descriptors: Vec<SortDescriptor<E>>,
    batch_size: usize,
    section_key: Option<SectionKey<E>>,
    cache_name: Option<String>,
    controller: Option<Rc<RefCell<C::Controller>>>,
    subscription: Option<SubscriptionId>,
}

impl<E: Entity, C: FetchContext<E>> DataSourceCore<E, C> {
    /// Creates a detached core over `context`, filtered by `predicate`.
    pub fn new(context: Rc<RefCell<C>>, predicate: Option<Predicate<E>>) -> Self {
        Self {
            context,
            predicate,
            sort_descriptors: Vec::new(),
            batch_size: 0,
            section_key: None,
            cache_name: None,
            controller: None,
            subscription: None,
        }
    }

    /// Sets the fetch batch size hint. `0` means unbounded.
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
    }

    /// Replaces the sort descriptor chain.
    pub fn set_sort_descriptors(&mut self, descriptors: Vec<SortDescriptor<E>>) {
        self.sort_descriptors = descriptors;
    }

    /// Sets or clears the section key.
    pub fn set_section_key(&mut self, key: Option<SectionKey<E>>) {
        self.section_key = key;
    }

    /// Sets or clears the section cache name.
    pub fn set_cache_name(&mut self, name: Option<String>) {
        self.cache_name = name;
    }

    /// Returns the store handle this core was built over.
    pub fn context(&self) -> &Rc<RefCell<C>> {
        &self.context
    }

    /// Returns the live controller, if `initiate` has been called.
    pub fn controller(&self) -> Option<Rc<RefCell<C::Controller>>> {
        self.controller.clone()
    }

    /// Builds a results controller, subscribes `callback` to its change
    /// batches, and runs the fetch. Any previous controller is detached
    /// first.
    ///
    /// Returns true when the fetch succeeded. On failure the error is
    /// logged and the controller stays in place with an empty result set,
    /// so the widget keeps showing whatever it showed before.
    pub fn initiate(&mut self, callback: ChangeCallback<E>) -> bool {
        self.detach();

        let controller = self.context.borrow().controller(self.build_request());
        let subscription = controller.borrow_mut().subscribe(callback);
        let fetched = match controller.borrow_mut().perform_fetch() {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to fetch {} entities: {}", type_name::<E>(), err);
                false
            }
        };
        self.controller = Some(controller);
        self.subscription = Some(subscription);
        fetched
    }

    /// Creates a new entity, saves, and returns the entity. The entity is
    /// already in the graph (and in every live result set it matches) when
    /// this returns, even if the save failed.
    pub fn add_item(&mut self) -> E {
        let entity = self.context.borrow_mut().insert();
        if let Err(err) = self.context.borrow_mut().save() {
            error!("Failed to save after adding entity: {}", err);
        }
        entity
    }

    /// Deletes the entity with `id` and saves.
    pub fn delete_item(&mut self, id: EntityId) {
        self.context.borrow_mut().delete(id);
        if let Err(err) = self.context.borrow_mut().save() {
            error!("Failed to save after deleting entity: {}", err);
        }
    }

    /// Runs `f` against the controller, or returns `None` when detached.
    pub fn with_controller<R>(&self, f: impl FnOnce(&C::Controller) -> R) -> Option<R> {
        self.controller.as_ref().map(|c| f(&c.borrow()))
    }

    /// Returns summaries of all sections.
    pub fn sections(&self) -> Vec<SectionInfo> {
        self.with_controller(|c| c.sections()).unwrap_or_default()
    }

    /// Returns the number of sections, or 0 when detached.
    pub fn number_of_sections(&self) -> usize {
        self.with_controller(|c| c.number_of_sections()).unwrap_or(0)
    }

    /// Returns the number of rows in `section`, or 0 when detached.
    pub fn number_of_rows(&self, section: usize) -> usize {
        self.with_controller(|c| c.number_of_rows(section))
            .unwrap_or(0)
    }

    /// Returns the entity at `at`, or `None` when out of range or detached.
    pub fn entity_at(&self, at: IndexPath) -> Option<E> {
        self.with_controller(|c| c.object_at(at)).flatten()
    }

    /// Returns the entity at flat position `index`, in section-major order.
    pub fn entity_at_index(&self, index: usize) -> Option<E> {
        self.with_controller(|c| c.object_at_index(index)).flatten()
    }

    /// Returns the total number of fetched entities.
    pub fn len(&self) -> usize {
        self.with_controller(|c| c.len()).unwrap_or(0)
    }

    /// Returns true when no entities are fetched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build_request(&self) -> FetchRequest<E> {
        let mut request = FetchRequest::new()
            .with_sort_descriptors(self.sort_descriptors.clone())
            .with_batch_size(self.batch_size);
        if let Some(predicate) = &self.predicate {
            request = request.with_shared_predicate(predicate.clone());
        }
        if let Some(key) = &self.section_key {
            request = request.with_shared_section_key(key.clone());
        }
        if let Some(name) = &self.cache_name {
            request = request.with_cache_name(name.clone());
        }
        request
    }

    fn detach(&mut self) {
        if let (Some(controller), Some(id)) = (self.controller.take(), self.subscription.take()) {
            controller.borrow_mut().unsubscribe(id);
        }
    }
}

impl<E: Entity, C: FetchContext<E>> Drop for DataSourceCore<E, C> {
    fn drop(&mut self) {
        self.detach();
    }
}

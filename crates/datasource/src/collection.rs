//! Collection adapter.
//!
//! Same job as the table adapter with one difference in the change path:
//! collection widgets take their edits as a closure handed to
//! `perform_batch_updates`, and an updated item is reloaded in place
//! instead of having its cell reconfigured.

use crate::cell::EntityCell;
use crate::source::DataSourceCore;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use vitrine_core::{
    Change, ChangeBatch, Entity, FetchContext, IndexPath, Predicate, SectionInfo, SectionKey,
    SortDescriptor,
};

/// Minimal collection surface the adapter drives.
///
/// All edits for one change batch arrive inside a single
/// `perform_batch_updates` closure, in replay order: deletes first (old
/// coordinates), then section changes, then inserts (new coordinates),
/// then reloads and moves.
pub trait CollectionWidget<E: Entity> {
    /// Inserts an item at `at`.
    fn insert_item(&mut self, at: IndexPath);
    /// Deletes the item at `at`.
    fn delete_item(&mut self, at: IndexPath);
    /// Reloads the item at `at`.
    fn reload_item(&mut self, at: IndexPath);
    /// Moves the item at `from` to `to`.
    fn move_item(&mut self, from: IndexPath, to: IndexPath);
    /// Inserts a section at `index`.
    fn insert_section(&mut self, index: usize);
    /// Deletes the section at `index`.
    fn delete_section(&mut self, index: usize);
    /// Reloads every item of the section at `index`.
    fn reload_section(&mut self, index: usize);
    /// Throws away all items and asks the data source again.
    fn reload_data(&mut self);
    /// Dequeues (or creates) a reusable cell for `at`.
    fn dequeue_cell(&mut self, reuse_identifier: &str, at: IndexPath) -> &mut dyn EntityCell<E>;
    /// Runs `updates` as one animated batch.
    fn perform_batch_updates(&mut self, updates: &mut dyn FnMut(&mut Self))
    where
        Self: Sized;
}

/// Data source adapter for collection-style widgets.
///
/// Usage mirrors `TableDataSource`: construct, configure, call
/// `initiate_fetch`, and route the widget's data-source callbacks here.
/// Configuration changes made after `initiate_fetch` take effect only on
/// the next `initiate_fetch`.
pub struct CollectionDataSource<E: Entity, C: FetchContext<E>, W> {
    core: DataSourceCore<E, C>,
    widget: Rc<RefCell<W>>,
    reuse_identifier: String,
}

impl<E, C, W> CollectionDataSource<E, C, W>
where
    E: Entity,
    C: FetchContext<E>,
    W: CollectionWidget<E> + 'static,
{
    /// Creates an adapter for `widget` over `context`, filtered by
    /// `predicate`. Cells are dequeued with `reuse_identifier`.
    pub fn new(
        widget: Rc<RefCell<W>>,
        reuse_identifier: impl Into<String>,
        context: Rc<RefCell<C>>,
        predicate: Option<Predicate<E>>,
    ) -> Self {
        Self {
            core: DataSourceCore::new(context, predicate),
            widget,
            reuse_identifier: reuse_identifier.into(),
        }
    }

    /// Sets the fetch batch size hint. `0` means unbounded.
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.core.set_batch_size(batch_size);
    }

    /// Replaces the sort descriptor chain.
    pub fn set_sort_descriptors(&mut self, descriptors: Vec<SortDescriptor<E>>) {
        self.core.set_sort_descriptors(descriptors);
    }

    /// Sets or clears the section key. The leading sort descriptor should
    /// order by the same key.
    pub fn set_section_key(&mut self, key: Option<SectionKey<E>>) {
        self.core.set_section_key(key);
    }

    /// Sets or clears the section cache name.
    pub fn set_cache_name(&mut self, name: Option<String>) {
        self.core.set_cache_name(name);
    }

    /// Starts the live query and reloads the widget on success. On
    /// failure the error is logged and the widget is left alone.
    pub fn initiate_fetch(&mut self) {
        let widget = Rc::clone(&self.widget);
        let fetched = self.core.initiate(Box::new(move |batch| {
            apply_changes(&mut *widget.borrow_mut(), batch);
        }));
        if fetched {
            self.widget.borrow_mut().reload_data();
        }
    }

    /// Returns the number of sections.
    pub fn number_of_sections(&self) -> usize {
        self.core.number_of_sections()
    }

    /// Returns the number of items in `section`.
    pub fn number_of_items(&self, section: usize) -> usize {
        self.core.number_of_rows(section)
    }

    /// Returns summaries of all sections, for header views.
    pub fn sections(&self) -> Vec<SectionInfo> {
        self.core.sections()
    }

    /// Returns the entity at `at`, or `None` when out of range.
    pub fn entity_at(&self, at: IndexPath) -> Option<E> {
        self.core.entity_at(at)
    }

    /// Dequeues the cell for `at` and binds it to the entity at that
    /// position, or to `None` when there is no backing object.
    pub fn cell_for_item(&self, at: IndexPath) {
        let entity = self.core.entity_at(at);
        let mut widget = self.widget.borrow_mut();
        widget
            .dequeue_cell(&self.reuse_identifier, at)
            .set_entity(entity);
    }

    /// Creates a new entity, saves, and returns it. The widget hears
    /// about the insertion through the normal change path.
    pub fn add_item(&mut self) -> E {
        self.core.add_item()
    }

    /// Returns the live controller, if `initiate_fetch` has been called.
    pub fn controller(
        &self,
    ) -> Option<Rc<RefCell<<C as FetchContext<E>>::Controller>>> {
        self.core.controller()
    }

    /// Returns the store handle this adapter was built over.
    pub fn context(&self) -> &Rc<RefCell<C>> {
        self.core.context()
    }
}

fn apply_changes<E: Entity, W: CollectionWidget<E>>(widget: &mut W, batch: &ChangeBatch<E>) {
    widget.perform_batch_updates(&mut |widget| {
        for change in batch {
            match change {
                Change::Insert { new } => widget.insert_item(*new),
                Change::Delete { old } => widget.delete_item(*old),
                Change::Update { at, .. } => widget.reload_item(*at),
                Change::Move { from, to, .. } => widget.move_item(*from, *to),
                Change::InsertSection { index } => widget.insert_section(*index),
                Change::DeleteSection { index } => widget.delete_section(*index),
                Change::UpdateSection { index } => widget.reload_section(*index),
            }
        }
    });
}

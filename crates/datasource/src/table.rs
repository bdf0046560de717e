//! Table adapter.
//!
//! `TableDataSource` feeds a `TableWidget` from a live result set: counts
//! and cells are answered from the controller, and every change batch is
//! replayed as row and section edits bracketed by `begin_updates` and
//! `end_updates`.

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

/// What a commit on an editing row should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditingStyle {
    /// No editing action.
    None,
    /// Insert a new entity.
    Insert,
    /// Delete the entity at the committed row.
    Delete,
}

/// Minimal table surface the adapter drives.
///
/// Row and section edits arrive between `begin_updates` and `end_updates`
/// in replay order: deletes first (old coordinates), then section changes,
/// then inserts (new coordinates), then updates and moves.
pub trait TableWidget<E: Entity> {
    /// Opens a batch of row and section edits.
    fn begin_updates(&mut self);
    /// Closes the current batch of edits.
    fn end_updates(&mut self);
    /// Inserts a row at `at`.
    fn insert_row(&mut self, at: IndexPath);
    /// Deletes the row at `at`.
    fn delete_row(&mut self, at: IndexPath);
    /// Moves the row at `from` to `to`.
    fn move_row(&mut self, from: IndexPath, to: IndexPath);
    /// Inserts a section at `index`.
    fn insert_section(&mut self, index: usize);
    /// Deletes the section at `index`.
    fn delete_section(&mut self, index: usize);
    /// Reloads every row of the section at `index`.
    fn reload_section(&mut self, index: usize);
    /// Throws away all rows and asks the data source again.
    fn reload_data(&mut self);
    /// Returns the visible cell at `at`, or `None` when not on screen.
    fn cell_at(&mut self, at: IndexPath) -> Option<&mut dyn EntityCell<E>>;
    /// Dequeues (or creates) a reusable cell for `at`.
    fn dequeue_cell(&mut self, reuse_identifier: &str, at: IndexPath) -> &mut dyn EntityCell<E>;
}

/// Data source adapter for table-style widgets.
///
/// To use it:
/// - call `new` with the widget, the cell reuse identifier, the store
///   context, and an optional predicate,
/// - configure batch size, sort descriptors, section key, and cache name
///   as needed,
/// - call `initiate_fetch` and route the widget's data-source callbacks
///   (`number_of_sections`, `number_of_rows`, `cell_for_row`,
///   `commit_edit`) here.
///
/// Configuration changes made after `initiate_fetch` take effect only on
/// the next `initiate_fetch`.
pub struct TableDataSource<E: Entity, C: FetchContext<E>, W> {
    core: DataSourceCore<E, C>,
    widget: Rc<RefCell<W>>,
    reuse_identifier: String,
}

impl<E, C, W> TableDataSource<E, C, W>
where
    E: Entity,
    C: FetchContext<E>,
    W: TableWidget<E> + 'static,
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

    /// Returns the number of rows in `section`.
    pub fn number_of_rows(&self, section: usize) -> usize {
        self.core.number_of_rows(section)
    }

    /// Returns summaries of all sections, for header titles.
    pub fn sections(&self) -> Vec<SectionInfo> {
        self.core.sections()
    }

    /// Returns the entity at `at`, or `None` when out of range.
    pub fn entity_at(&self, at: IndexPath) -> Option<E> {
        self.core.entity_at(at)
    }

    /// Dequeues the cell for `at` and binds it to the entity at that row,
    /// or to `None` when the row has no backing object.
    pub fn cell_for_row(&self, at: IndexPath) {
        let entity = self.core.entity_at(at);
        let mut widget = self.widget.borrow_mut();
        widget
            .dequeue_cell(&self.reuse_identifier, at)
            .set_entity(entity);
    }

    /// Commits an editing action on the row at `at`. Deletes remove the
    /// backing entity, inserts create a fresh one; both save afterwards.
    pub fn commit_edit(&mut self, style: EditingStyle, at: IndexPath) {
        match style {
            EditingStyle::Delete => {
                if let Some(entity) = self.core.entity_at(at) {
                    self.core.delete_item(entity.entity_id());
                }
            }
            EditingStyle::Insert => {
                self.core.add_item();
            }
            EditingStyle::None => {}
        }
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

fn apply_changes<E: Entity, W: TableWidget<E>>(widget: &mut W, batch: &ChangeBatch<E>) {
    widget.begin_updates();
    for change in batch {
        match change {
            Change::Insert { new } => widget.insert_row(*new),
            Change::Delete { old } => widget.delete_row(*old),
            Change::Update { at, entity } => {
                // Only visible cells need reconfiguring; off-screen rows
                // pick up the new state when they are next dequeued.
                if let Some(cell) = widget.cell_at(*at) {
                    cell.set_entity(Some(entity.clone()));
                }
            }
            Change::Move { from, to, entity } => {
                if let Some(cell) = widget.cell_at(*from) {
                    cell.set_entity(Some(entity.clone()));
                }
                widget.move_row(*from, *to);
            }
            Change::InsertSection { index } => widget.insert_section(*index),
            Change::DeleteSection { index } => widget.delete_section(*index),
            Change::UpdateSection { index } => widget.reload_section(*index),
        }
    }
    widget.end_updates();
}

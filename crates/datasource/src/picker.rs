//! Picker adapter.
//!
//! Pickers are flat, single-component widgets with no incremental edits,
//! so the adapter reduces to row counting, row-to-entity lookups, and a
//! full reload whenever the result set changes. An optional synthetic
//! blank row can sit at row 0, handled entirely at this boundary.

use crate::source::DataSourceCore;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use vitrine_core::{
    Entity, FetchContext, Predicate, ResultsController, SortDescriptor,
};

/// Minimal picker surface the adapter drives.
pub trait PickerWidget {
    /// Throws away all rows in every component and asks the data source
    /// again.
    fn reload_all_components(&mut self);
}

/// Data source adapter for picker-style widgets.
///
/// To use it:
/// - call `new` with the widget, the store context, an optional predicate,
///   and whether to include a blank option,
/// - set sort descriptors (and a cache name if wanted),
/// - call `initiate_fetch` and answer the widget's callbacks with
///   `number_of_components`, `number_of_rows`, and `entity_at_row`.
///
/// Pickers are unsectioned and unpaged; there is deliberately no section
/// key or batch size here.
///
/// With `include_blank_option` set, row 0 is a synthetic blank line:
/// `entity_at_row(0)` returns `None` and every entity sits one row below
/// its position in the result set. The offset is applied only inside
/// `entity_at_row` and `row_for_entity`, so callers never do the math.
pub struct PickerDataSource<E: Entity, C: FetchContext<E>, W> {
    core: DataSourceCore<E, C>,
    widget: Rc<RefCell<W>>,
    include_blank_option: bool,
}

impl<E, C, W> PickerDataSource<E, C, W>
where
    E: Entity,
    C: FetchContext<E>,
    W: PickerWidget + 'static,
{
    /// Creates an adapter for `widget` over `context`, filtered by
    /// `predicate`, with or without a leading blank row.
    pub fn new(
        widget: Rc<RefCell<W>>,
        context: Rc<RefCell<C>>,
        predicate: Option<Predicate<E>>,
        include_blank_option: bool,
    ) -> Self {
        Self {
            core: DataSourceCore::new(context, predicate),
            widget,
            include_blank_option,
        }
    }

    /// Returns true when row 0 is the synthetic blank row.
    pub fn include_blank_option(&self) -> bool {
        self.include_blank_option
    }

    /// Replaces the sort descriptor chain.
    pub fn set_sort_descriptors(&mut self, descriptors: Vec<SortDescriptor<E>>) {
        self.core.set_sort_descriptors(descriptors);
    }

    /// Sets or clears the cache name.
    pub fn set_cache_name(&mut self, name: Option<String>) {
        self.core.set_cache_name(name);
    }

    /// Starts the live query and reloads the widget on success. On
    /// failure the error is logged and the widget is left alone. Every
    /// later change batch triggers a full reload.
    pub fn initiate_fetch(&mut self) {
        let widget = Rc::clone(&self.widget);
        let fetched = self.core.initiate(Box::new(move |_batch| {
            widget.borrow_mut().reload_all_components();
        }));
        if fetched {
            self.widget.borrow_mut().reload_all_components();
        }
    }

    /// Reloads the widget unconditionally.
    pub fn reload_data(&self) {
        self.widget.borrow_mut().reload_all_components();
    }

    /// Returns the number of picker components. Always 1.
    pub fn number_of_components(&self) -> usize {
        1
    }

    /// Returns the number of rows, counting the blank row when enabled.
    pub fn number_of_rows(&self) -> usize {
        let count = self.core.len();
        if self.include_blank_option {
            count + 1
        } else {
            count
        }
    }

    /// Returns the entity shown at `row`, or `None` for the blank row and
    /// for rows past the end of the result set.
    pub fn entity_at_row(&self, row: usize) -> Option<E> {
        let index = if self.include_blank_option {
            row.checked_sub(1)?
        } else {
            row
        };
        self.core.entity_at_index(index)
    }

    /// Returns the row showing `entity`, if it is in the result set.
    pub fn row_for_entity(&self, entity: &E) -> Option<usize> {
        let index = self
            .core
            .with_controller(|c| c.index_of(entity.entity_id()))
            .flatten()?;
        Some(if self.include_blank_option {
            index + 1
        } else {
            index
        })
    }

    /// Creates a new entity, saves, and returns it. The widget reloads
    /// through the normal change path.
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

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use vitrine_core::EntityId;
    use vitrine_memory::MemoryContext;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Flavor {
        id: EntityId,
        name: String,
    }

    impl Entity for Flavor {
        fn entity_id(&self) -> EntityId {
            self.id
        }
    }

    fn flavor(id: EntityId, name: &str) -> Flavor {
        Flavor {
            id,
            name: name.to_string(),
        }
    }

    #[derive(Default)]
    struct Wheel {
        reloads: usize,
    }

    impl PickerWidget for Wheel {
        fn reload_all_components(&mut self) {
            self.reloads += 1;
        }
    }

    type Fixture = (
        Rc<RefCell<MemoryContext<Flavor>>>,
        Rc<RefCell<Wheel>>,
        PickerDataSource<Flavor, MemoryContext<Flavor>, Wheel>,
    );

    fn fixture(include_blank_option: bool) -> Fixture {
        let store = Rc::new(RefCell::new(MemoryContext::new(|id| flavor(id, ""))));
        let widget = Rc::new(RefCell::new(Wheel::default()));
        let mut picker =
            PickerDataSource::new(widget.clone(), store.clone(), None, include_blank_option);
        picker.set_sort_descriptors(vec![SortDescriptor::by_key("name", true, |f: &Flavor| {
            f.name.clone()
        })]);
        (store, widget, picker)
    }

    fn seed(store: &Rc<RefCell<MemoryContext<Flavor>>>) {
        store.borrow_mut().insert_entity(flavor(1, "almond"));
        store.borrow_mut().insert_entity(flavor(2, "basil"));
        store.borrow_mut().insert_entity(flavor(3, "cocoa"));
    }

    #[test]
    fn test_number_of_components_is_one() {
        let (_store, _widget, picker) = fixture(false);
        assert_eq!(picker.number_of_components(), 1);
    }

    #[test]
    fn test_blank_option_adds_exactly_one_row() {
        let (store, _widget, mut plain) = fixture(false);
        seed(&store);
        plain.initiate_fetch();

        let (store, _widget, mut blank) = fixture(true);
        seed(&store);
        blank.initiate_fetch();

        assert_eq!(plain.number_of_rows(), 3);
        assert_eq!(blank.number_of_rows(), 4);
    }

    #[test]
    fn test_blank_row_maps_to_no_entity() {
        let (store, _widget, mut picker) = fixture(true);
        seed(&store);
        picker.initiate_fetch();

        assert!(picker.entity_at_row(0).is_none());
        assert_eq!(picker.entity_at_row(1).map(|f| f.id), Some(1));
    }

    #[test]
    fn test_rows_without_blank_start_at_zero() {
        let (store, _widget, mut picker) = fixture(false);
        seed(&store);
        picker.initiate_fetch();

        assert_eq!(picker.entity_at_row(0).map(|f| f.id), Some(1));
        assert_eq!(picker.entity_at_row(2).map(|f| f.id), Some(3));
    }

    #[test]
    fn test_entity_at_row_out_of_range_is_none() {
        let (store, _widget, mut picker) = fixture(true);
        seed(&store);
        picker.initiate_fetch();

        assert!(picker.entity_at_row(picker.number_of_rows()).is_none());
        assert!(picker.entity_at_row(100).is_none());
    }

    #[test]
    fn test_row_for_entity_round_trips_through_blank_offset() {
        let (store, _widget, mut picker) = fixture(true);
        seed(&store);
        picker.initiate_fetch();

        let basil = store.borrow().get(2).unwrap();
        let row = picker.row_for_entity(&basil).unwrap();
        assert_eq!(row, 2);
        assert_eq!(picker.entity_at_row(row).map(|f| f.id), Some(2));
    }

    #[test]
    fn test_row_for_unknown_entity_is_none() {
        let (store, _widget, mut picker) = fixture(true);
        seed(&store);
        picker.initiate_fetch();

        assert!(picker.row_for_entity(&flavor(99, "ghost")).is_none());
    }

    #[test]
    fn test_changes_reload_all_components() {
        let (store, widget, mut picker) = fixture(false);
        picker.initiate_fetch();
        assert_eq!(widget.borrow().reloads, 1);

        let added = picker.add_item();
        assert_eq!(widget.borrow().reloads, 2);

        store.borrow_mut().delete(added.id);
        assert_eq!(widget.borrow().reloads, 3);
    }

    #[test]
    fn test_failed_fetch_does_not_reload() {
        let (store, widget, mut picker) = fixture(false);
        seed(&store);
        store.borrow().set_fail_fetches(true);

        picker.initiate_fetch();

        assert_eq!(widget.borrow().reloads, 0);
        assert_eq!(picker.number_of_rows(), 0);
    }

    #[test]
    fn test_add_item_lands_in_rows() {
        let (store, _widget, mut picker) = fixture(true);
        picker.initiate_fetch();
        assert_eq!(picker.number_of_rows(), 1);

        let added = picker.add_item();

        assert!(store.borrow().contains(added.id));
        assert_eq!(picker.number_of_rows(), 2);
        assert_eq!(picker.row_for_entity(&added), Some(1));
    }
}

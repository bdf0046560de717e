//! Vitrine Datasource - Widget data-source adapters over live entity queries.
//!
//! Each adapter binds one widget to one results controller and does the
//! boilerplate both directions:
//!
//! - `TableDataSource`: counts, cell binding, edit commits, and change
//!   batches replayed as begin/end-bracketed row and section edits
//! - `CollectionDataSource`: the same surface with edits delivered inside
//!   one `perform_batch_updates` closure
//! - `PickerDataSource`: flat row counting and row-to-entity lookups, with
//!   an optional synthetic blank row at row 0
//!
//! Widgets are reached through the small `TableWidget`, `CollectionWidget`,
//! and `PickerWidget` traits; cells through `EntityCell`. Stores are
//! reached through the `FetchContext` and `ResultsController` contracts
//! from `vitrine-core`, so any store that implements those works here.
//! Everything is single-threaded and expects to live on the UI thread.
//!
//! Store errors never propagate to widget code: failed fetches and failed
//! saves are logged through `tracing` and the adapter carries on with
//! whatever state it has.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use vitrine_core::{Entity, EntityId, SortDescriptor};
//! use vitrine_datasource::{PickerDataSource, PickerWidget};
//! use vitrine_memory::MemoryContext;
//!
//! #[derive(Clone, Debug)]
//! struct Flavor {
//!     id: EntityId,
//!     name: String,
//! }
//!
//! impl Entity for Flavor {
//!     fn entity_id(&self) -> EntityId {
//!         self.id
//!     }
//! }
//!
//! struct Wheel {
//!     reloads: usize,
//! }
//!
//! impl PickerWidget for Wheel {
//!     fn reload_all_components(&mut self) {
//!         self.reloads += 1;
//!     }
//! }
//!
//! let context = Rc::new(RefCell::new(MemoryContext::new(|id| Flavor {
//!     id,
//!     name: String::new(),
//! })));
//! let wheel = Rc::new(RefCell::new(Wheel { reloads: 0 }));
//!
//! let mut picker = PickerDataSource::new(wheel.clone(), context.clone(), None, true);
//! picker.set_sort_descriptors(vec![SortDescriptor::by_key("name", true, |f: &Flavor| {
//!     f.name.clone()
//! })]);
//! picker.initiate_fetch();
//!
//! // Row 0 is the blank option.
//! assert_eq!(picker.number_of_rows(), 1);
//! assert!(picker.entity_at_row(0).is_none());
//!
//! let flavor = picker.add_item();
//! assert_eq!(picker.number_of_rows(), 2);
//! assert_eq!(picker.row_for_entity(&flavor), Some(1));
//! assert_eq!(wheel.borrow().reloads, 2);
//! ```

#![no_std]

extern crate alloc;

mod cell;
mod collection;
mod picker;
mod source;
mod table;

pub use cell::EntityCell;
pub use collection::{CollectionDataSource, CollectionWidget};
pub use picker::{PickerDataSource, PickerWidget};
pub use source::DataSourceCore;
pub use table::{EditingStyle, TableDataSource, TableWidget};

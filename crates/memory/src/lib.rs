//! Vitrine Memory - Reference in-memory entity store for Vitrine adapters.
//!
//! This crate provides a complete `FetchContext` implementation backed by a
//! plain in-memory map. It exists so adapters (and hosts) can be exercised
//! without a real persistence layer: mutations notify live controllers
//! synchronously, and fetch/save failures can be injected to drive error
//! paths.
//!
//! - `MemoryContext`: the entity graph plus controller registry
//! - `MemoryController`: a live query deriving ordered change batches
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::{Entity, EntityId, FetchContext, FetchRequest, ResultsController, SortDescriptor};
//! use vitrine_memory::MemoryContext;
//!
//! #[derive(Clone, Debug)]
//! struct Task {
//!     id: EntityId,
//!     title: String,
//! }
//!
//! impl Entity for Task {
//!     fn entity_id(&self) -> EntityId {
//!         self.id
//!     }
//! }
//!
//! let mut context = MemoryContext::new(|id| Task { id, title: String::new() });
//! let controller = context.controller(
//!     FetchRequest::new().sorted_by(SortDescriptor::by_key("title", true, |t: &Task| t.title.clone())),
//! );
//! controller.borrow_mut().perform_fetch().unwrap();
//! assert_eq!(controller.borrow().len(), 0);
//!
//! let task = context.insert();
//! assert_eq!(controller.borrow().len(), 1);
//! assert_eq!(
//!     controller.borrow().object_at_index(0).unwrap().entity_id(),
//!     task.entity_id(),
//! );
//! ```

#![no_std]

extern crate alloc;

mod context;
mod controller;
mod snapshot;

pub use context::MemoryContext;
pub use controller::MemoryController;

//! Vitrine Core - Shared types and store contracts for Vitrine data-source adapters.
//!
//! This crate provides the vocabulary shared by entity stores and widget
//! adapters:
//!
//! - `Entity` / `EntityId`: identity of fetched objects
//! - `IndexPath`: a position in a sectioned result set
//! - `Change` / `ChangeBatch`: ordered change events between result states
//! - `SortDescriptor` / `FetchRequest`: what a live query should materialize
//! - `SubscriptionManager`: change-callback bookkeeping for controllers
//! - `FetchContext` / `ResultsController`: the store-side contracts
//! - `Error`: error types for store operations
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::{FetchRequest, IndexPath, SortDescriptor};
//!
//! #[derive(Clone)]
//! struct Track {
//!     title: &'static str,
//!     plays: u32,
//! }
//!
//! let request = FetchRequest::new()
//!     .with_predicate(|t: &Track| t.plays > 0)
//!     .sorted_by(SortDescriptor::by_key("title", true, |t: &Track| t.title));
//!
//! assert!(request.matches(&Track { title: "intro", plays: 3 }));
//! assert!(!request.matches(&Track { title: "silence", plays: 0 }));
//! assert_eq!(IndexPath::new(0, 2).row, 2);
//! ```

#![no_std]

extern crate alloc;

mod change;
mod entity;
mod error;
mod path;
mod request;
mod sort;
mod store;
mod subscription;

pub use change::{Change, ChangeBatch};
pub use entity::{
    next_entity_id, reserve_entity_ids, set_next_entity_id_if_greater, Entity, EntityId,
};
pub use error::{Error, Result};
pub use path::IndexPath;
pub use request::{FetchRequest, Predicate, SectionKey};
pub use sort::{Comparator, SortDescriptor};
pub use store::{FetchContext, ResultsController, SectionInfo};
pub use subscription::{ChangeCallback, Subscription, SubscriptionId, SubscriptionManager};

//! Entity identity.
//!
//! This module defines the `Entity` trait implemented by every object type
//! that can appear in a fetched result set, plus the global id allocator.

use core::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an entity.
pub type EntityId = u64;

/// Global entity ID counter for generating unique entity IDs.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Gets the next unique entity ID.
pub fn next_entity_id() -> EntityId {
    NEXT_ENTITY_ID.fetch_add(1, Ordering::SeqCst)
}

/// Reserves a range of entity IDs and returns the starting ID.
/// Useful for bulk imports where many IDs are allocated at once.
pub fn reserve_entity_ids(count: u64) -> EntityId {
    NEXT_ENTITY_ID.fetch_add(count, Ordering::SeqCst)
}

/// Sets the next entity ID only if it's greater than the current value.
/// Used by stores during initialization so freshly minted IDs never
/// collide with IDs loaded from a snapshot.
pub fn set_next_entity_id_if_greater(id: EntityId) {
    NEXT_ENTITY_ID.fetch_max(id, Ordering::SeqCst);
}

/// An object that can be fetched, sectioned, and displayed.
///
/// The identity is what change tracking keys on: two values with the same
/// `entity_id` are two states of the same object. Cloning an entity clones
/// a state, not an identity.
pub trait Entity: Clone + 'static {
    /// Returns the stable identity of this entity.
    fn entity_id(&self) -> EntityId;
}

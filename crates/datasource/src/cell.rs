//! Cell configuration contract shared by the table and collection adapters.

use vitrine_core::Entity;

/// A reusable cell that renders a single entity.
///
/// Adapters configure cells through this one setter and nothing else. A
/// cell receives `Some(entity)` when it is bound to a row and `None` when
/// the row it was dequeued for has no backing object (for example a row
/// past the end of the result set). Implementations decide how to render
/// the empty state.
pub trait EntityCell<E: Entity> {
    /// Binds the cell to `entity`, replacing whatever it showed before.
    fn set_entity(&mut self, entity: Option<E>);
}

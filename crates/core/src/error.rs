//! Error types for Vitrine stores and controllers.

use crate::entity::EntityId;
use alloc::string::String;
use core::fmt;

/// Result type alias for Vitrine operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for store and controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The initial or repeated fetch could not be executed.
    FetchFailed {
        message: String,
    },
    /// The store could not persist pending changes.
    SaveFailed {
        message: String,
    },
    /// Entity not found in the store.
    NotFound {
        id: EntityId,
    },
    /// The backing store has been released while a controller still
    /// referenced it.
    StoreReleased,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FetchFailed { message } => {
                write!(f, "Fetch failed: {}", message)
            }
            Error::SaveFailed { message } => {
                write!(f, "Save failed: {}", message)
            }
            Error::NotFound { id } => {
                write!(f, "Entity not found: {}", id)
            }
            Error::StoreReleased => {
                write!(f, "Backing store has been released")
            }
        }
    }
}

impl Error {
    /// Creates a fetch failure error.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Error::FetchFailed {
            message: message.into(),
        }
    }

    /// Creates a save failure error.
    pub fn save_failed(message: impl Into<String>) -> Self {
        Error::SaveFailed {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(id: EntityId) -> Self {
        Error::NotFound { id }
    }
}

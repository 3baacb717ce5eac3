//! Error types for the logbook API.

use carnet_core::{Collection, DrawError, RecordId, RosterError, ValidationError};
use carnet_store::StoreError;
use thiserror::Error;

/// Errors that can occur during logbook operations.
///
/// Nothing is retried or swallowed: every failure reaches the caller,
/// which decides how to tell the user.
#[derive(Debug, Error)]
pub enum CarnetError {
    /// Update referencing an id that does not exist.
    #[error("record {id} not found in {collection}")]
    RecordNotFound { collection: Collection, id: RecordId },

    /// Backup document could not be parsed or matched no known shape.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Draw requested on a roster that is too small.
    #[error("precondition failed: {0}")]
    PreconditionFailed(#[from] DrawError),

    /// Rejected roster input.
    #[error("invalid roster change: {0}")]
    Roster(#[from] RosterError),

    /// Storage engine failure, surfaced verbatim.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl CarnetError {
    /// Whether the error came from the storage engine rather than the input.
    pub fn is_storage(&self) -> bool {
        matches!(self, CarnetError::Store(_))
    }
}

/// Result type for logbook operations.
pub type Result<T> = std::result::Result<T, CarnetError>;

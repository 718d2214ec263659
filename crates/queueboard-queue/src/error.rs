//! Error types for queue board operations.

use queueboard_models::{EntryId, ProviderId};
use thiserror::Error;

/// Errors that can occur during queue board operations.
///
/// A failed operation never leaves the board partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Entry is not in the given provider's queue.
    #[error("entry {entry_id} not found in queue of {provider_id}")]
    EntryNotFound {
        entry_id: EntryId,
        provider_id: ProviderId,
    },

    /// Provider is not registered on the board.
    #[error("provider not found: {0}")]
    ProviderNotFound(ProviderId),

    /// Entry id is already on the board.
    #[error("entry already queued: {0}")]
    DuplicateEntry(EntryId),

    /// Queue index outside the queue.
    #[error("index {index} out of bounds for queue of {provider_id} (len {len})")]
    IndexOutOfBounds {
        provider_id: ProviderId,
        index: usize,
        len: usize,
    },

    /// Source and destination of a transfer are the same queue.
    #[error("cannot transfer within the same queue: {0}")]
    SameProvider(ProviderId),

    /// Transfer confirmation is incomplete.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Operation is not allowed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for queue board operations.
pub type Result<T> = std::result::Result<T, QueueError>;

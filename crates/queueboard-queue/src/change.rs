//! Change notifications broadcast after every board mutation.

use queueboard_models::{EntryId, Priority, ProviderId, ProviderStatus};

/// A mutation that was applied to the board.
///
/// Subscribers use these to know when to recompute filtered views and
/// statistics from a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    /// A provider joined the board.
    ProviderAdded {
        /// Provider ID.
        provider_id: ProviderId,
    },
    /// A provider's availability changed.
    ProviderStatusChanged {
        /// Provider ID.
        provider_id: ProviderId,
        /// New status.
        status: ProviderStatus,
    },
    /// An entry was registered into a queue.
    Enqueued {
        /// Entry ID.
        entry_id: EntryId,
        /// Queue it joined.
        provider_id: ProviderId,
    },
    /// An entry moved between queues.
    Transferred {
        /// Entry ID.
        entry_id: EntryId,
        /// Source queue.
        from: ProviderId,
        /// Destination queue.
        to: ProviderId,
        /// Priority after the move.
        priority: Priority,
        /// True when the move went through the confirmation step.
        reviewed: bool,
    },
    /// An entry's priority advanced one step.
    PriorityCycled {
        /// Entry ID.
        entry_id: EntryId,
        /// Queue holding the entry.
        provider_id: ProviderId,
        /// New priority.
        priority: Priority,
    },
    /// An entry changed position inside its queue.
    Reordered {
        /// Queue that was reordered.
        provider_id: ProviderId,
        /// Old position.
        from_index: usize,
        /// New position.
        to_index: usize,
    },
    /// Every wait time grew.
    Ticked {
        /// Minutes added to each entry.
        minutes: u32,
    },
    /// An entry left the board to start consultation.
    ConsultationStarted {
        /// Entry ID.
        entry_id: EntryId,
        /// Queue it left.
        provider_id: ProviderId,
    },
}

impl BoardChange {
    /// Returns true if this is a timer tick.
    pub fn is_tick(&self) -> bool {
        matches!(self, BoardChange::Ticked { .. })
    }
}

//! Reviewed transfer record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Priority;
use crate::ids::{EntryId, ProviderId};

/// Data captured by the transfer confirmation step.
///
/// Built when the reviewer submits and consumed by the store; it is not kept
/// after the transfer is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Entry being moved.
    pub entry_id: EntryId,

    /// Queue the entry currently sits in.
    pub from_provider_id: ProviderId,

    /// Queue the entry moves to.
    pub to_provider_id: ProviderId,

    /// Reason given by the reviewer.
    pub justification: String,

    /// Priority the entry takes in the destination queue.
    pub priority: Priority,

    /// When the transfer was confirmed.
    pub timestamp: DateTime<Utc>,
}

impl TransferRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        entry_id: impl Into<EntryId>,
        from_provider_id: impl Into<ProviderId>,
        to_provider_id: impl Into<ProviderId>,
        justification: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            from_provider_id: from_provider_id.into(),
            to_provider_id: to_provider_id.into(),
            justification: justification.into(),
            priority,
            timestamp: Utc::now(),
        }
    }
}

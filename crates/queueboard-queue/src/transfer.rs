//! Reviewed transfer workflow.
//!
//! A drag-and-drop move calls `QueueStore::transfer_direct` straight away.
//! A "transfer with review" instead goes through `TransferDialog`, which
//! collects a destination, a new priority and a written justification and
//! only then commits with `QueueStore::transfer_with_details`.

use queueboard_models::{EntryId, Priority, ProviderId, TransferRecord};
use tracing::debug;

use crate::error::{QueueError, Result};
use crate::store::QueueStore;

/// Shortest justification accepted by default, in characters.
pub const DEFAULT_MIN_JUSTIFICATION_LEN: usize = 10;

/// Fields being edited while the dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    /// Entry being moved.
    pub entry_id: EntryId,
    /// Queue the entry sits in.
    pub source: ProviderId,
    /// Chosen destination, if any.
    pub destination: Option<ProviderId>,
    /// Priority the entry will take.
    pub priority: Priority,
    /// Reason typed by the reviewer.
    pub justification: String,
}

/// State of the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Nothing selected.
    #[default]
    Closed,
    /// Editing a draft.
    Open(TransferDraft),
    /// Draft validated and handed to the store.
    Submitting(TransferDraft),
}

/// Confirmation step for transfers.
///
/// `Closed -> Open -> Submitting -> Closed`. A draft that fails validation
/// keeps the dialog open so the reviewer can fix it.
#[derive(Debug, Clone)]
pub struct TransferDialog {
    state: DialogState,
    min_justification_len: usize,
}

impl Default for TransferDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferDialog {
    /// Creates a closed dialog with the default justification length.
    pub fn new() -> Self {
        Self {
            state: DialogState::Closed,
            min_justification_len: DEFAULT_MIN_JUSTIFICATION_LEN,
        }
    }

    /// Sets the minimum justification length.
    pub fn with_min_justification_len(mut self, len: usize) -> Self {
        self.min_justification_len = len;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Returns the draft being edited, if the dialog is open.
    pub fn draft(&self) -> Option<&TransferDraft> {
        match &self.state {
            DialogState::Open(draft) => Some(draft),
            _ => None,
        }
    }

    /// Returns true if the dialog is open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    /// Opens the dialog for an entry in `source`'s queue.
    ///
    /// The draft starts with the entry's current priority.
    pub fn open(
        &mut self,
        store: &QueueStore,
        entry_id: &EntryId,
        source: &ProviderId,
    ) -> Result<()> {
        if !matches!(self.state, DialogState::Closed) {
            return Err(QueueError::InvalidState(
                "transfer dialog already open".to_string(),
            ));
        }

        let priority = match store.find(entry_id)? {
            Some((provider_id, entry)) if &provider_id == source => entry.priority,
            _ => {
                return Err(QueueError::EntryNotFound {
                    entry_id: entry_id.clone(),
                    provider_id: source.clone(),
                })
            }
        };

        debug!(entry_id = %entry_id, source = %source, "transfer dialog opened");
        self.state = DialogState::Open(TransferDraft {
            entry_id: entry_id.clone(),
            source: source.clone(),
            destination: None,
            priority,
            justification: String::new(),
        });
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut TransferDraft> {
        match &mut self.state {
            DialogState::Open(draft) => Ok(draft),
            _ => Err(QueueError::InvalidState(
                "transfer dialog is not open".to_string(),
            )),
        }
    }

    /// Selects the destination queue.
    pub fn set_destination(&mut self, destination: ProviderId) -> Result<()> {
        self.draft_mut()?.destination = Some(destination);
        Ok(())
    }

    /// Selects the priority the entry takes after the move.
    pub fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.draft_mut()?.priority = priority;
        Ok(())
    }

    /// Replaces the justification text.
    pub fn set_justification(&mut self, justification: impl Into<String>) -> Result<()> {
        self.draft_mut()?.justification = justification.into();
        Ok(())
    }

    /// Checks a draft, returning the reason it cannot be submitted.
    fn validate(&self, draft: &TransferDraft) -> std::result::Result<ProviderId, String> {
        let destination = draft
            .destination
            .clone()
            .ok_or_else(|| "select a destination provider".to_string())?;

        if destination == draft.source {
            return Err("destination must differ from the current provider".to_string());
        }

        let len = draft.justification.trim().chars().count();
        if len < self.min_justification_len {
            return Err(format!(
                "justification must be at least {} characters (got {})",
                self.min_justification_len, len
            ));
        }

        Ok(destination)
    }

    /// Returns true if the open draft would pass validation.
    pub fn can_submit(&self) -> bool {
        self.draft()
            .map(|d| self.validate(d).is_ok())
            .unwrap_or(false)
    }

    /// Validates the draft and commits the transfer.
    ///
    /// On success the dialog closes and all fields are cleared. On a
    /// validation or store error the dialog stays open with the draft as it
    /// was.
    ///
    /// # Returns
    ///
    /// The record that was applied.
    pub fn submit(&mut self, store: &QueueStore) -> Result<TransferRecord> {
        let draft = match std::mem::take(&mut self.state) {
            DialogState::Open(draft) => draft,
            other => {
                self.state = other;
                return Err(QueueError::InvalidState(
                    "transfer dialog is not open".to_string(),
                ));
            }
        };

        let destination = match self.validate(&draft) {
            Ok(destination) => destination,
            Err(reason) => {
                debug!(entry_id = %draft.entry_id, reason = %reason, "transfer rejected");
                self.state = DialogState::Open(draft);
                return Err(QueueError::Validation(reason));
            }
        };

        let record = TransferRecord::new(
            draft.entry_id.clone(),
            draft.source.clone(),
            destination,
            draft.justification.trim(),
            draft.priority,
        );

        self.state = DialogState::Submitting(draft);
        match store.transfer_with_details(&record) {
            Ok(()) => {
                self.state = DialogState::Closed;
                Ok(record)
            }
            Err(e) => {
                if let DialogState::Submitting(draft) = std::mem::take(&mut self.state) {
                    self.state = DialogState::Open(draft);
                }
                Err(e)
            }
        }
    }

    /// Closes the dialog and discards the draft.
    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }
}

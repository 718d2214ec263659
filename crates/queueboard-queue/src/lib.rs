//! Provider queues for the clinic board.
//!
//! This crate provides the `QueueStore` holding, per provider, the ordered
//! list of waiting entries, plus everything computed from it:
//! - Direct and reviewed transfers between queues (`TransferDialog`)
//! - Priority cycling, in-queue reordering and wait-time aging
//! - Filtered per-provider views (`FilterView`)
//! - Summary counters (`BoardStats`)
//! - Change notifications over `mpsc` channels
//!
//! # Example
//!
//! ```no_run
//! use queueboard_models::{Entry, Priority, Provider};
//! use queueboard_queue::{BoardStats, QueueFilter, QueueStore, TransferDialog, filter_view};
//!
//! let store = QueueStore::new();
//! store.add_provider(Provider::new("dr-a", "Dr. A", "General")).unwrap();
//! store.add_provider(Provider::new("dr-b", "Dr. B", "Surgery")).unwrap();
//!
//! let entry = Entry::builder("Ana", "Extraction").id("p-1").build();
//! store.enqueue(&"dr-a".into(), entry).unwrap();
//!
//! // Reviewed transfer
//! let mut dialog = TransferDialog::new();
//! dialog.open(&store, &"p-1".into(), &"dr-a".into()).unwrap();
//! dialog.set_destination("dr-b".into()).unwrap();
//! dialog.set_priority(Priority::Urgent).unwrap();
//! dialog.set_justification("needs a surgical extraction").unwrap();
//! dialog.submit(&store).unwrap();
//!
//! // Derived views
//! let snapshot = store.snapshot().unwrap();
//! let urgent = filter_view(&snapshot, QueueFilter::Urgent);
//! let stats = BoardStats::compute(&snapshot);
//! ```

pub mod change;
pub mod config;
pub mod error;
pub mod filter;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod transfer;

pub use change::BoardChange;
pub use config::BoardConfig;
pub use error::{QueueError, Result};
pub use filter::{filter_view, FilterView, ProviderQueueView, QueueFilter};
pub use snapshot::BoardSnapshot;
pub use stats::BoardStats;
pub use store::QueueStore;
pub use transfer::{DialogState, TransferDialog, TransferDraft};

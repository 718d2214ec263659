//! Core data models for the clinic queue board.
//!
//! This crate provides the fundamental data types shared by the queue store,
//! the aging runtime and the operator console: waiting entries, providers,
//! their identifiers, and the record that carries a reviewed transfer.

pub mod builders;
pub mod entry;
pub mod ids;
pub mod provider;
pub mod transfer;

// Re-export main types
pub use builders::EntryBuilder;
pub use entry::{Entry, Priority};
pub use ids::{EntryId, ProviderId};
pub use provider::{Provider, ProviderStatus};
pub use transfer::TransferRecord;

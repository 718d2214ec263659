//! Read-only copy of the board.

use std::collections::HashMap;

use queueboard_models::{Entry, Provider, ProviderId};
use serde::Serialize;

/// Point-in-time copy of every provider and queue.
///
/// Derived views (filters, statistics) are computed from a snapshot so
/// that rendering never holds the store lock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardSnapshot {
    /// Providers in registration order.
    pub providers: Vec<Provider>,
    /// Ordered queue per provider.
    pub queues: HashMap<ProviderId, Vec<Entry>>,
    /// Consultations started since the board was created.
    pub completed_today: u32,
}

impl BoardSnapshot {
    /// Returns the queue for a provider (empty if unknown).
    pub fn queue(&self, provider_id: &ProviderId) -> &[Entry] {
        self.queues
            .get(provider_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over every queued entry, provider by provider.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.providers
            .iter()
            .flat_map(move |p| self.queue(&p.id).iter())
    }

    /// Total number of queued entries.
    pub fn total(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    /// Estimated wait for a new arrival in a provider's queue.
    ///
    /// Sum of the estimated chair time of everyone already waiting.
    pub fn estimated_wait_minutes(&self, provider_id: &ProviderId) -> u32 {
        self.queue(provider_id)
            .iter()
            .map(|e| e.estimated_duration_minutes)
            .sum()
    }
}

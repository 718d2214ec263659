//! Summary counters for the board header.

use serde::Serialize;

use crate::snapshot::BoardSnapshot;

/// Patients one provider is expected to see per shift.
pub const DEFAULT_CAPACITY_PER_PROVIDER: u32 = 8;

/// Read-only statistics computed from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardStats {
    /// Entries queued across all providers.
    pub total_count: usize,
    /// Entries with urgent priority.
    pub urgent_count: usize,
    /// Providers that are available or busy.
    pub active_providers: usize,
    /// Mean wait over all entries, rounded.
    pub average_wait_minutes: u32,
    /// Queued entries relative to provider capacity, rounded percent.
    pub capacity_percent: u32,
    /// Consultations started today.
    pub completed_today: u32,
}

impl BoardStats {
    /// Computes statistics with the default per-provider capacity.
    pub fn compute(snapshot: &BoardSnapshot) -> Self {
        Self::compute_with_capacity(snapshot, DEFAULT_CAPACITY_PER_PROVIDER)
    }

    /// Computes statistics with an explicit per-provider capacity.
    pub fn compute_with_capacity(snapshot: &BoardSnapshot, capacity_per_provider: u32) -> Self {
        let total_count = snapshot.total();
        let urgent_count = snapshot.entries().filter(|e| e.is_urgent()).count();
        let active_providers = snapshot
            .providers
            .iter()
            .filter(|p| p.status.is_active())
            .count();

        let wait_sum: u64 = snapshot
            .entries()
            .map(|e| u64::from(e.wait_time_minutes))
            .sum();
        let average_wait_minutes = rounded_ratio(wait_sum as f64, total_count as f64);

        let capacity = snapshot.providers.len() as f64 * f64::from(capacity_per_provider);
        let capacity_percent = rounded_ratio(total_count as f64 * 100.0, capacity);

        Self {
            total_count,
            urgent_count,
            active_providers,
            average_wait_minutes,
            capacity_percent,
            completed_today: snapshot.completed_today,
        }
    }
}

/// `round(numerator / denominator)`, or 0 when the denominator is 0.
fn rounded_ratio(numerator: f64, denominator: f64) -> u32 {
    if denominator <= 0.0 {
        return 0;
    }
    (numerator / denominator).round() as u32
}

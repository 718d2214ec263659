//! Filtered projections of the board for display.

use std::fmt;
use std::str::FromStr;

use queueboard_models::{Entry, Priority, Provider};
use serde::Serialize;

use crate::snapshot::BoardSnapshot;

/// Minutes after which an entry counts as overdue.
pub const DEFAULT_OVERDUE_MINUTES: u32 = 60;

/// Selector for which entries the board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueFilter {
    /// Every entry.
    #[default]
    All,
    /// Only urgent entries.
    Urgent,
    /// Entries that have waited at all.
    Waiting,
    /// Entries waiting longer than the overdue threshold.
    Overdue,
}

impl QueueFilter {
    /// Returns true if the entry passes this filter.
    pub fn matches_with(&self, entry: &Entry, overdue_after_minutes: u32) -> bool {
        match self {
            QueueFilter::All => true,
            QueueFilter::Urgent => entry.priority == Priority::Urgent,
            QueueFilter::Waiting => entry.wait_time_minutes > 0,
            QueueFilter::Overdue => entry.is_overdue(overdue_after_minutes),
        }
    }

    /// Returns the lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            QueueFilter::All => "all",
            QueueFilter::Urgent => "urgent",
            QueueFilter::Waiting => "waiting",
            QueueFilter::Overdue => "overdue",
        }
    }
}

impl fmt::Display for QueueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for QueueFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(QueueFilter::All),
            "urgent" => Ok(QueueFilter::Urgent),
            "waiting" => Ok(QueueFilter::Waiting),
            "overdue" => Ok(QueueFilter::Overdue),
            other => Err(format!(
                "invalid filter '{}': expected all, urgent, waiting or overdue",
                other
            )),
        }
    }
}

/// One provider column of a filtered board.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderQueueView {
    /// The provider owning the column.
    pub provider: Provider,
    /// Entries passing the filter, in queue order.
    pub entries: Vec<Entry>,
    /// Length of the full, unfiltered queue.
    pub queue_len: usize,
    /// Estimated wait of the full queue.
    pub estimated_wait_minutes: u32,
}

/// Projection of a snapshot through a `QueueFilter`.
///
/// Never mutates anything; callers recompute it after each board change.
#[derive(Debug, Clone, Copy)]
pub struct FilterView {
    filter: QueueFilter,
    overdue_after_minutes: u32,
}

impl FilterView {
    /// Creates a view with the default overdue threshold.
    pub fn new(filter: QueueFilter) -> Self {
        Self {
            filter,
            overdue_after_minutes: DEFAULT_OVERDUE_MINUTES,
        }
    }

    /// Sets the overdue threshold.
    pub fn with_overdue_after(mut self, minutes: u32) -> Self {
        self.overdue_after_minutes = minutes;
        self
    }

    /// Returns the selected filter.
    pub fn filter(&self) -> QueueFilter {
        self.filter
    }

    /// Applies the filter to every provider's queue.
    ///
    /// # Returns
    ///
    /// One view per provider, in registration order.
    pub fn apply(&self, snapshot: &BoardSnapshot) -> Vec<ProviderQueueView> {
        snapshot
            .providers
            .iter()
            .map(|provider| {
                let queue = snapshot.queue(&provider.id);
                ProviderQueueView {
                    provider: provider.clone(),
                    entries: queue
                        .iter()
                        .filter(|e| self.filter.matches_with(e, self.overdue_after_minutes))
                        .cloned()
                        .collect(),
                    queue_len: queue.len(),
                    estimated_wait_minutes: snapshot.estimated_wait_minutes(&provider.id),
                }
            })
            .collect()
    }
}

/// Applies `filter` to a snapshot with the default overdue threshold.
pub fn filter_view(snapshot: &BoardSnapshot, filter: QueueFilter) -> Vec<ProviderQueueView> {
    FilterView::new(filter).apply(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use queueboard_models::ProviderId;

    fn make_entry(id: &str, wait: u32, priority: Priority) -> Entry {
        Entry::builder(id, "Checkup")
            .id(id)
            .waited(wait)
            .priority(priority)
            .duration(30)
            .build()
    }

    fn make_snapshot() -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::default();
        snapshot.providers.push(Provider::new("a", "Dr. A", "General"));
        snapshot.providers.push(Provider::new("b", "Dr. B", "General"));
        snapshot.queues.insert(
            ProviderId::from("a"),
            vec![
                make_entry("x", 10, Priority::Normal),
                make_entry("y", 70, Priority::Urgent),
                make_entry("w", 0, Priority::High),
            ],
        );
        snapshot.queues.insert(
            ProviderId::from("b"),
            vec![
                make_entry("v", 60, Priority::Urgent),
                make_entry("u", 61, Priority::Normal),
            ],
        );
        snapshot
    }

    fn view_ids(views: &[ProviderQueueView]) -> Vec<Vec<&str>> {
        views
            .iter()
            .map(|v| v.entries.iter().map(|e| e.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_all_is_identity() {
        let snapshot = make_snapshot();
        let views = filter_view(&snapshot, QueueFilter::All);
        assert_eq!(view_ids(&views), vec![vec!["x", "y", "w"], vec!["v", "u"]]);
    }

    #[test]
    fn test_urgent() {
        let snapshot = make_snapshot();
        let views = filter_view(&snapshot, QueueFilter::Urgent);
        assert_eq!(view_ids(&views), vec![vec!["y"], vec!["v"]]);
    }

    #[test]
    fn test_waiting_excludes_zero_wait() {
        let snapshot = make_snapshot();
        let views = filter_view(&snapshot, QueueFilter::Waiting);
        assert_eq!(view_ids(&views), vec![vec!["x", "y"], vec!["v", "u"]]);
    }

    #[test]
    fn test_overdue_boundary_is_strict() {
        let snapshot = make_snapshot();
        let views = filter_view(&snapshot, QueueFilter::Overdue);
        // v waited exactly 60 and is excluded; u waited 61 and is included
        assert_eq!(view_ids(&views), vec![vec!["y"], vec!["u"]]);
    }

    #[test]
    fn test_custom_overdue_threshold() {
        let snapshot = make_snapshot();
        let views = FilterView::new(QueueFilter::Overdue)
            .with_overdue_after(5)
            .apply(&snapshot);
        assert_eq!(view_ids(&views), vec![vec!["x", "y"], vec!["v", "u"]]);
    }

    #[test]
    fn test_view_carries_unfiltered_derived_fields() {
        let snapshot = make_snapshot();
        let views = filter_view(&snapshot, QueueFilter::Urgent);

        assert_eq!(views[0].queue_len, 3);
        assert_eq!(views[0].estimated_wait_minutes, 90);
        assert_eq!(views[1].queue_len, 2);
    }

    #[test]
    fn test_provider_without_queue_yields_empty_column() {
        let mut snapshot = make_snapshot();
        snapshot.providers.push(Provider::new("c", "Dr. C", "General"));

        let views = filter_view(&snapshot, QueueFilter::All);

        assert_eq!(views.len(), 3);
        assert!(views[2].entries.is_empty());
        assert_eq!(views[2].queue_len, 0);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("Overdue".parse::<QueueFilter>(), Ok(QueueFilter::Overdue));
        assert_eq!(QueueFilter::Waiting.to_string(), "waiting");
        assert!("late".parse::<QueueFilter>().is_err());
    }
}

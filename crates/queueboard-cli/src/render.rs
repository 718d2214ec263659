//! Plain-text rendering of board views.

use std::fmt::Write;

use queueboard_models::{Entry, Priority};
use queueboard_queue::{BoardStats, ProviderQueueView, QueueFilter};

fn priority_tag(priority: Priority) -> &'static str {
    match priority {
        Priority::Normal => "      ",
        Priority::High => "HIGH  ",
        Priority::Urgent => "URGENT",
    }
}

fn render_entry(out: &mut String, position: usize, entry: &Entry) {
    let _ = writeln!(
        out,
        "  {:>2}. {:<8} {:<20} {:>3}y  {}  {:>4} min  {}",
        position,
        entry.id,
        entry.name,
        entry.age,
        priority_tag(entry.priority),
        entry.wait_time_minutes,
        entry.service_label,
    );
}

/// Renders filtered provider columns as a table.
///
/// Positions are 1-based ranks in the full queue, so they stay valid for
/// `/reorder` even when a filter hides some entries.
pub fn render_board(
    views: &[ProviderQueueView],
    full: &[ProviderQueueView],
    filter: QueueFilter,
) -> String {
    let mut out = String::new();

    if views.is_empty() {
        out.push_str("No providers on the board.\n");
        return out;
    }

    for (view, column) in views.iter().zip(full) {
        let _ = writeln!(
            out,
            "{} ({}) [{}] - {} waiting, ~{} min",
            view.provider.name,
            view.provider.specialty,
            view.provider.status,
            view.queue_len,
            view.estimated_wait_minutes,
        );

        if view.entries.is_empty() {
            let _ = writeln!(out, "  (no {} entries)", filter);
        }

        for entry in &view.entries {
            let position = column
                .entries
                .iter()
                .position(|e| e.id == entry.id)
                .map(|idx| idx + 1)
                .unwrap_or(0);
            render_entry(&mut out, position, entry);
        }

        out.push('\n');
    }

    out
}

/// Renders the statistics header.
pub fn render_stats(stats: &BoardStats) -> String {
    format!(
        "Waiting: {}  Urgent: {}  Active providers: {}  Avg wait: {} min  Capacity: {}%  Completed today: {}",
        stats.total_count,
        stats.urgent_count,
        stats.active_providers,
        stats.average_wait_minutes,
        stats.capacity_percent,
        stats.completed_today,
    )
}

//! Waiting entries and their priority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::EntryId;

/// Priority of a waiting entry.
///
/// Ordering follows urgency: `Normal < High < Urgent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Regular arrival.
    #[default]
    Normal,
    /// Should be seen soon.
    High,
    /// Should be seen next.
    Urgent,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::High, Priority::Urgent];

    /// Returns the next priority in the board's fixed rotation.
    ///
    /// `Normal -> High -> Urgent -> Normal`.
    pub fn cycle(self) -> Self {
        match self {
            Priority::Normal => Priority::High,
            Priority::High => Priority::Urgent,
            Priority::Urgent => Priority::Normal,
        }
    }

    /// Returns the lowercase label used on the board and in commands.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "n" => Ok(Priority::Normal),
            "high" | "h" => Ok(Priority::High),
            "urgent" | "u" => Ok(Priority::Urgent),
            other => Err(format!(
                "invalid priority '{}': expected normal, high or urgent",
                other
            )),
        }
    }
}

/// A patient waiting in a provider's queue.
///
/// Only `priority` and `wait_time_minutes` change once an entry is on the
/// board; the store is the only place that touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub id: EntryId,

    /// Patient name.
    pub name: String,

    /// Patient age in years.
    pub age: u32,

    /// Contact phone number.
    pub phone: String,

    /// Current priority.
    pub priority: Priority,

    /// Minutes spent waiting so far.
    #[serde(default)]
    pub wait_time_minutes: u32,

    /// Requested service (e.g. "Cleaning").
    pub service_label: String,

    /// Estimated cost in minor currency units.
    #[serde(default)]
    pub estimated_cost: u32,

    /// Estimated chair time in minutes.
    #[serde(default)]
    pub estimated_duration_minutes: u32,
}

impl Entry {
    /// Creates a new entry with a generated id and normal priority.
    pub fn new(name: impl Into<String>, service_label: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            age: 0,
            phone: String::new(),
            priority: Priority::Normal,
            wait_time_minutes: 0,
            service_label: service_label.into(),
            estimated_cost: 0,
            estimated_duration_minutes: 0,
        }
    }

    /// Returns true if the entry is marked urgent.
    pub fn is_urgent(&self) -> bool {
        self.priority == Priority::Urgent
    }

    /// Returns true if the entry has waited strictly longer than `threshold_minutes`.
    pub fn is_overdue(&self, threshold_minutes: u32) -> bool {
        self.wait_time_minutes > threshold_minutes
    }
}

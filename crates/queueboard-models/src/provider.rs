//! Providers (dentists) that own a queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::ProviderId;

/// Availability of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Free to take the next patient.
    #[default]
    Available,
    /// With a patient.
    Busy,
    /// On a break.
    Break,
    /// Not working today.
    Unavailable,
}

impl ProviderStatus {
    /// Returns true if the provider counts as active on the board.
    pub fn is_active(self) -> bool {
        matches!(self, ProviderStatus::Available | ProviderStatus::Busy)
    }

    /// Returns the lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderStatus::Available => "available",
            ProviderStatus::Busy => "busy",
            ProviderStatus::Break => "break",
            ProviderStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(ProviderStatus::Available),
            "busy" => Ok(ProviderStatus::Busy),
            "break" => Ok(ProviderStatus::Break),
            "unavailable" => Ok(ProviderStatus::Unavailable),
            other => Err(format!(
                "invalid provider status '{}': expected available, busy, break or unavailable",
                other
            )),
        }
    }
}

/// A dentist with their own queue of waiting entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier (also keys the provider's queue).
    pub id: ProviderId,

    /// Display name.
    pub name: String,

    /// Specialty (e.g. "Orthodontics").
    pub specialty: String,

    /// Current availability.
    pub status: ProviderStatus,
}

impl Provider {
    /// Creates an available provider.
    pub fn new(
        id: impl Into<ProviderId>,
        name: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: specialty.into(),
            status: ProviderStatus::Available,
        }
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: ProviderStatus) -> Self {
        self.status = status;
        self
    }
}

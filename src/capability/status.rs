//! Acquisition status types and the environment report.
//!
//! Each acquisition attempt produces a `CapabilityStatus`. The statuses
//! are richer than the verdict the user sees by default: the CLI collapses
//! the report into a single pass/fail line, while `--verbose` and `--json`
//! expose the detail.

use std::path::PathBuf;

use serde::Serialize;

/// The result of acquiring a single capability.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CapabilityStatus {
    /// The library was found and is loadable from this path.
    Acquired { path: PathBuf },

    /// The library is not present anywhere on the search path.
    Missing {
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },

    /// The acquisition attempt itself failed (e.g., an unreadable
    /// home-override directory). Treated as failure, never propagated.
    Faulted { message: String },
}

impl CapabilityStatus {
    /// Whether the capability is available for use.
    pub fn is_acquired(&self) -> bool {
        matches!(self, CapabilityStatus::Acquired { .. })
    }

    /// Whether the acquisition attempt itself faulted.
    pub fn is_faulted(&self) -> bool {
        matches!(self, CapabilityStatus::Faulted { .. })
    }
}

/// The outcome of acquiring one named capability.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityOutcome {
    /// The capability that was checked.
    pub capability: String,
    /// How the acquisition went.
    pub status: CapabilityStatus,
}

/// Ordered outcomes for every capability, one check run's worth.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    pub outcomes: Vec<CapabilityOutcome>,
}

impl EnvironmentReport {
    /// The collapsed verdict: did every acquisition succeed?
    pub fn all_acquired(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_acquired())
    }

    /// Outcomes for capabilities that were not acquired.
    pub fn gaps(&self) -> Vec<&CapabilityOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.status.is_acquired())
            .collect()
    }
}

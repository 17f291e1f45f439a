//! Status summary derivation.
//!
//! Counts are incident-level, computed from the consolidated set rather
//! than the backend's row-level counters — an incident served by three
//! units must count once. Freshness comes from the snapshot's `updatedAt`
//! timestamp and degrades to a placeholder when it cannot be parsed.

use active_calls_models::{Incident, Snapshot};
use chrono::{DateTime, Utc};

/// Placeholder freshness text for a missing or unparseable timestamp.
pub const FRESHNESS_UNKNOWN: &str = "last update unknown";

/// Overall health of the dashboard's data feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Latest snapshot arrived and carried no backend error.
    Operational,
    /// Latest snapshot arrived but the backend reported a pull error.
    Degraded(String),
    /// The snapshot fetch itself failed; displayed data is the last good set.
    Unavailable(String),
}

/// The summary block shown alongside the map and list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Distinct incidents in the consolidated set.
    pub total_incidents: usize,
    /// Incidents with resolved coordinates.
    pub mapped_incidents: usize,
    /// Incidents still awaiting geocoding.
    pub unmapped_incidents: usize,
    /// Human-readable freshness of the backing snapshot.
    pub freshness: String,
    /// Health of the data feed.
    pub condition: Condition,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            total_incidents: 0,
            mapped_incidents: 0,
            unmapped_incidents: 0,
            freshness: FRESHNESS_UNKNOWN.to_string(),
            condition: Condition::Operational,
        }
    }
}

impl StatusView {
    /// Summarizes a freshly applied snapshot and its consolidated incidents.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, incidents: &[Incident], now: DateTime<Utc>) -> Self {
        let mapped = incidents.iter().filter(|i| i.is_mapped()).count();
        let condition = snapshot
            .error
            .as_deref()
            .filter(|message| !message.is_empty())
            .map_or(Condition::Operational, |message| {
                Condition::Degraded(message.to_string())
            });
        Self {
            total_incidents: incidents.len(),
            mapped_incidents: mapped,
            unmapped_incidents: incidents.len() - mapped,
            freshness: freshness_label(snapshot.updated_at.as_deref(), now),
            condition,
        }
    }

    /// Marks the feed unavailable after a failed fetch while keeping the
    /// previous counts and freshness on display — a failed poll must not
    /// blank out a previously good status.
    #[must_use]
    pub fn fetch_failure(previous: &Self, message: &str) -> Self {
        Self {
            condition: Condition::Unavailable(message.to_string()),
            ..previous.clone()
        }
    }
}

/// Renders `updatedAt` relative to `now`, e.g. `"updated 2m ago"`.
///
/// Unparseable or missing timestamps render as [`FRESHNESS_UNKNOWN`], never
/// as an error. Small negative skews (client clock behind the backend) are
/// clamped to "just now".
#[must_use]
pub fn freshness_label(updated_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = updated_at else {
        return FRESHNESS_UNKNOWN.to_string();
    };
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return FRESHNESS_UNKNOWN.to_string();
    };

    let elapsed = now.signed_duration_since(parsed.with_timezone(&Utc));
    let seconds = elapsed.num_seconds().max(0);
    if seconds < 10 {
        "updated just now".to_string()
    } else if seconds < 60 {
        format!("updated {seconds}s ago")
    } else if seconds < 3600 {
        format!("updated {}m ago", seconds / 60)
    } else {
        format!("updated {}h ago", seconds / 3600)
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire and derived data types for the active calls dashboard.
//!
//! The backend snapshot endpoint returns one [`CallRow`] per reporting unit
//! per incident; the client consolidates those rows into one [`Incident`] per
//! distinct incident number. These types are the shared vocabulary between
//! the consolidation engine, the view layer, and the HTTP client.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Dispatch priority of a call, 1 (highest) through 4 (lowest).
///
/// The backend transmits priority as a bare string; anything outside
/// `"1"`..`"4"` (including the empty string) is treated as unknown and
/// modeled as `None` at the field level.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Priority {
    /// Priority 1: immediate, life-threatening.
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    One = 1,
    /// Priority 2: urgent.
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Two = 2,
    /// Priority 3: routine.
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Three = 3,
    /// Priority 4: low / report-only.
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Four = 4,
}

impl Priority {
    /// Returns the numeric value of this priority level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Parses the backend's string representation, tolerating surrounding
    /// whitespace. Returns `None` for anything outside `"1"`..`"4"`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// Returns all variants in ascending numeric order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::One, Self::Two, Self::Three, Self::Four]
    }
}

/// One backend record: a single reporting unit's association with a call.
///
/// Field names follow the snapshot endpoint's camelCase JSON. Every field is
/// defaulted so sparse rows (units not yet geocoded, missing beat, etc.)
/// deserialize without error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallRow {
    /// Stable incident identifier, shared by all rows of the same incident.
    pub incident_number: String,
    /// Short description of the call type.
    pub nature_of_call: String,
    /// Patrol division handling the call.
    pub division: String,
    /// Beat within the division.
    pub beat: String,
    /// Identifier of the reporting unit for this row.
    pub unit_number: String,
    /// Dispatch status of the unit.
    pub status: String,
    /// Dispatch priority, or `None` when absent/unknown.
    #[serde(deserialize_with = "priority_lenient")]
    pub priority: Option<Priority>,
    /// Call date. May carry a time-of-day component that must be discarded
    /// before combining with [`CallRow::time`].
    pub date: String,
    /// Time of day the call was received.
    pub time: String,
    /// Block number portion of the location, when present.
    pub block: String,
    /// Raw location string (street or intersection).
    pub location: String,
    /// Reporting area code.
    pub reporting_area: String,
    /// Backend-built full street address, when one could be derived.
    pub address: Option<String>,
    /// Geocoded latitude; `None` means not yet geocoded.
    pub lat: Option<f64>,
    /// Geocoded longitude; `None` means not yet geocoded.
    pub lon: Option<f64>,
    /// Label describing the geocoder match (may flag approximations).
    pub geocode_label: String,
}

/// Deserializes the backend's priority field leniently: the wire value is a
/// bare string and may be empty or garbage, both of which become `None`.
fn priority_lenient<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Priority::parse))
}

impl CallRow {
    /// The displayable location: the geocodable address when the backend
    /// built one, otherwise the raw location string. `None` when both are
    /// empty.
    #[must_use]
    pub fn resolved_location(&self) -> Option<&str> {
        match self.address.as_deref() {
            Some(addr) if !addr.is_empty() => Some(addr),
            _ if !self.location.is_empty() => Some(&self.location),
            _ => None,
        }
    }
}

/// The full backend response for one poll cycle.
///
/// Replaced wholesale on every successful fetch; never merged with the
/// previous snapshot. The counts are backend-computed and row-level —
/// incident-level counts are derived client-side from consolidated data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Flat per-unit call rows. A malformed body without `calls` decodes as
    /// an empty row set.
    pub calls: Vec<CallRow>,
    /// Total row count as reported by the backend.
    pub total_calls: u64,
    /// Rows with resolved coordinates, as reported by the backend.
    pub mapped_calls: u64,
    /// Rows without coordinates, as reported by the backend.
    pub unmapped_calls: u64,
    /// ISO timestamp of the backend's last successful data pull.
    pub updated_at: Option<String>,
    /// Geocode attempts made since the backend process started.
    pub geocode_attempts_this_run: Option<u64>,
    /// Backend-side error from the last pull, if any.
    pub error: Option<String>,
}

/// One consolidated incident: all rows sharing an incident number collapsed
/// into a single record with an aggregated unit roster.
///
/// Scalar fields are copied from the first row observed for the incident;
/// later rows never overwrite them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique incident identifier within a consolidated set.
    pub incident_number: String,
    /// Short description of the call type.
    pub nature_of_call: String,
    /// Patrol division handling the call.
    pub division: String,
    /// Beat within the division.
    pub beat: String,
    /// Dispatch status from the first-seen row.
    pub status: String,
    /// Dispatch priority, or `None` when absent/unknown.
    pub priority: Option<Priority>,
    /// Call date string from the first-seen row.
    pub date: String,
    /// Time of day the call was received.
    pub time: String,
    /// Raw location string.
    pub location: String,
    /// Backend-built full street address, when one could be derived.
    pub address: Option<String>,
    /// Geocoded latitude.
    pub lat: Option<f64>,
    /// Geocoded longitude.
    pub lon: Option<f64>,
    /// Label describing the geocoder match.
    pub geocode_label: String,
    /// Distinct reporting units in first-appearance order.
    pub units: Vec<String>,
}

impl Incident {
    /// Creates an incident from its first-seen row, with an empty unit
    /// roster. The row's own `unit_number` is appended separately by the
    /// consolidation engine.
    #[must_use]
    pub fn from_first_row(row: &CallRow) -> Self {
        Self {
            incident_number: row.incident_number.clone(),
            nature_of_call: row.nature_of_call.clone(),
            division: row.division.clone(),
            beat: row.beat.clone(),
            status: row.status.clone(),
            priority: row.priority,
            date: row.date.clone(),
            time: row.time.clone(),
            location: row.location.clone(),
            address: row.address.clone(),
            lat: row.lat,
            lon: row.lon,
            geocode_label: row.geocode_label.clone(),
            units: Vec::new(),
        }
    }

    /// Number of distinct units on this incident.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Both coordinates, when the incident has been geocoded.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Whether this incident currently has resolved coordinates.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.coordinates().is_some()
    }

    /// The displayable location: address when present, otherwise the raw
    /// location string.
    #[must_use]
    pub fn resolved_location(&self) -> Option<&str> {
        match self.address.as_deref() {
            Some(addr) if !addr.is_empty() => Some(addr),
            _ if !self.location.is_empty() => Some(&self.location),
            _ => None,
        }
    }
}

/// Division value meaning "do not filter by division".
pub const DIVISION_ALL: &str = "all";

/// User-selected filter controls, read (never mutated) by the filter engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// `"all"` or an exact division value (case-sensitive match).
    pub division: String,
    /// Free-text search; trimmed and case-folded before matching.
    pub search_text: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            division: DIVISION_ALL.to_string(),
            search_text: String::new(),
        }
    }
}

impl FilterState {
    /// Whether this state passes every incident (the no-op filter).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.division == DIVISION_ALL && self.search_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_valid_values() {
        for (s, expected) in [
            ("1", Priority::One),
            ("2", Priority::Two),
            ("3", Priority::Three),
            (" 4 ", Priority::Four),
        ] {
            assert_eq!(Priority::parse(s), Some(expected));
        }
    }

    #[test]
    fn priority_rejects_unknown_values() {
        for s in ["", "0", "5", "P1", "high"] {
            assert_eq!(Priority::parse(s), None, "{s:?} should not parse");
        }
    }

    #[test]
    fn call_row_deserializes_sparse_object() {
        let row: CallRow = serde_json::from_value(serde_json::json!({
            "incidentNumber": "24-123456",
            "natureOfCall": "Disturbance"
        }))
        .unwrap();
        assert_eq!(row.incident_number, "24-123456");
        assert_eq!(row.unit_number, "");
        assert_eq!(row.lat, None);
        assert_eq!(row.priority, None);
    }

    #[test]
    fn call_row_deserializes_priority_string() {
        let row: CallRow = serde_json::from_value(serde_json::json!({
            "incidentNumber": "24-1",
            "priority": "2"
        }))
        .unwrap();
        assert_eq!(row.priority, Some(Priority::Two));

        // The backend sends "" rather than omitting the field.
        let row: CallRow = serde_json::from_value(serde_json::json!({
            "incidentNumber": "24-2",
            "priority": ""
        }))
        .unwrap();
        assert_eq!(row.priority, None);
    }

    #[test]
    fn snapshot_tolerates_missing_calls() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "updatedAt": "2024-06-01T12:00:00Z",
            "totalCalls": 0
        }))
        .unwrap();
        assert!(snapshot.calls.is_empty());
        assert_eq!(snapshot.updated_at.as_deref(), Some("2024-06-01T12:00:00Z"));
    }

    #[test]
    fn resolved_location_prefers_address() {
        let incident = Incident {
            address: Some("100 MAIN ST, Dallas, TX".to_string()),
            location: "MAIN ST".to_string(),
            ..Incident::default()
        };
        assert_eq!(
            incident.resolved_location(),
            Some("100 MAIN ST, Dallas, TX")
        );

        let incident = Incident {
            address: None,
            location: "MAIN ST".to_string(),
            ..Incident::default()
        };
        assert_eq!(incident.resolved_location(), Some("MAIN ST"));

        let incident = Incident::default();
        assert_eq!(incident.resolved_location(), None);
    }

    #[test]
    fn default_filter_state_is_noop() {
        assert!(FilterState::default().is_noop());
        let state = FilterState {
            division: "CENTRAL".to_string(),
            ..FilterState::default()
        };
        assert!(!state.is_noop());
    }
}

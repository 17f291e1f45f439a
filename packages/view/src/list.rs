//! List view-model rendering.
//!
//! Produces display-ready rows for the filtered incident set, capped at
//! [`MAX_LIST_ROWS`] while reporting the true total separately. Row
//! selection is a focus request: each row carries its incident number and
//! the coordinator routes selection to the marker synchronizer.

use active_calls_models::{Incident, Priority};
use chrono::NaiveDateTime;

use crate::format;

/// Maximum rows rendered regardless of how many incidents pass the filter.
pub const MAX_LIST_ROWS: usize = 150;

/// Row shown when the filtered set is empty, instead of a bare empty list.
pub const EMPTY_PLACEHOLDER: &str = "No active calls match the current filters.";

/// One display-ready list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// Incident number; selecting the row requests focus on this incident.
    pub incident_number: String,
    /// Priority badge value, `None` when unknown.
    pub priority: Option<Priority>,
    /// Relative or absolute time-of-call label.
    pub time_label: String,
    /// Nature of the call.
    pub nature_of_call: String,
    /// Resolved location text.
    pub location_label: String,
    /// Whether the incident currently has coordinates on the map.
    pub mapped: bool,
    /// `"Unit 101"`, `"3 units"`, or `"No units"`.
    pub unit_summary: String,
}

/// The rendered list: capped rows plus the uncapped total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Display rows, at most [`MAX_LIST_ROWS`].
    pub rows: Vec<ListRow>,
    /// True size of the filtered set, which may exceed `rows.len()`.
    pub total_count: usize,
}

impl ListView {
    /// Number of rows actually rendered.
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.rows.len()
    }

    /// The placeholder row text, present only when the filtered set is
    /// empty.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.total_count == 0 {
            Some(EMPTY_PLACEHOLDER)
        } else {
            None
        }
    }
}

/// Renders the visible incident set into list rows.
#[must_use]
pub fn render(visible: &[&Incident], now: NaiveDateTime) -> ListView {
    let rows = visible
        .iter()
        .take(MAX_LIST_ROWS)
        .map(|incident| row_for(incident, now))
        .collect();
    ListView {
        rows,
        total_count: visible.len(),
    }
}

fn row_for(incident: &Incident, now: NaiveDateTime) -> ListRow {
    ListRow {
        incident_number: incident.incident_number.clone(),
        priority: incident.priority,
        time_label: format::time_label(&incident.date, &incident.time, now),
        nature_of_call: incident.nature_of_call.clone(),
        location_label: incident
            .resolved_location()
            .unwrap_or("Location unavailable")
            .to_string(),
        mapped: incident.is_mapped(),
        unit_summary: unit_summary(&incident.units),
    }
}

/// Summarizes the unit roster: exactly one unit is named, more than one is
/// a pluralized count.
#[must_use]
pub fn unit_summary(units: &[String]) -> String {
    match units {
        [] => "No units".to_string(),
        [only] => format!("Unit {only}"),
        many => format!("{} units", many.len()),
    }
}

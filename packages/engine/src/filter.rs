//! Filter evaluation over consolidated incidents.
//!
//! The division and free-text predicates are AND-combined. Filtering
//! borrows from the consolidated set and preserves its order, so re-running
//! the filter on user input never touches the underlying data.

use active_calls_models::{DIVISION_ALL, FilterState, Incident};

/// Returns the incidents passing the current filter, in input order.
///
/// With the default [`FilterState`] this is the identity: every incident
/// passes and the order is unchanged.
#[must_use]
pub fn apply<'a>(incidents: &'a [Incident], state: &FilterState) -> Vec<&'a Incident> {
    let needle = state.search_text.trim().to_lowercase();
    incidents
        .iter()
        .filter(|incident| passes_division(incident, &state.division))
        .filter(|incident| needle.is_empty() || matches_search(incident, &needle))
        .collect()
}

/// Division predicate: exact, case-sensitive match, with `"all"` passing
/// everything.
fn passes_division(incident: &Incident, division: &str) -> bool {
    division == DIVISION_ALL || incident.division == division
}

/// Free-text predicate: `needle` must already be trimmed and lowercased.
///
/// An incident matches when the needle is a substring of its incident
/// number, resolved location, nature of call, or space-joined unit roster.
fn matches_search(incident: &Incident, needle: &str) -> bool {
    if incident.incident_number.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(location) = incident.resolved_location() {
        if location.to_lowercase().contains(needle) {
            return true;
        }
    }
    if incident.nature_of_call.to_lowercase().contains(needle) {
        return true;
    }
    incident.units.join(" ").to_lowercase().contains(needle)
}

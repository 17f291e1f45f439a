//! Row-to-incident consolidation.
//!
//! The backend reports one row per reporting unit, so a call served by three
//! units arrives as three rows sharing an incident number. Consolidation
//! collapses them into one [`Incident`] carrying the scalar fields of the
//! first-seen row plus the ordered distinct unit roster.

use std::collections::HashMap;

use active_calls_models::{CallRow, Incident};

/// Groups flat call rows into one incident per distinct incident number.
///
/// Rows are visited in input order. The first row seen for an incident
/// number supplies every scalar field; later rows only contribute their
/// `unit_number` (appended once, in first-appearance order). Output order is
/// the first-appearance order of incident numbers — stable, not sorted.
///
/// Rows with an empty `incident_number` are dropped: there is nothing to
/// group them under, and inventing a sentinel key would weld unrelated rows
/// into a fake incident.
#[must_use]
pub fn consolidate(rows: &[CallRow]) -> Vec<Incident> {
    let mut incidents: Vec<Incident> = Vec::new();
    let mut index_by_number: HashMap<&str, usize> = HashMap::new();
    let mut dropped = 0usize;

    for row in rows {
        if row.incident_number.is_empty() {
            dropped += 1;
            continue;
        }

        let idx = match index_by_number.get(row.incident_number.as_str()) {
            Some(&idx) => idx,
            None => {
                incidents.push(Incident::from_first_row(row));
                index_by_number.insert(row.incident_number.as_str(), incidents.len() - 1);
                incidents.len() - 1
            }
        };

        let incident = &mut incidents[idx];
        if !row.unit_number.is_empty() && !incident.units.contains(&row.unit_number) {
            incident.units.push(row.unit_number.clone());
        }
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} rows with no incident number");
    }

    incidents
}

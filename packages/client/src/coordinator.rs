//! The dashboard coordinator.
//!
//! [`Dashboard`] is the single owner of all mutable view state: the
//! consolidated incidents, the filter state, the marker synchronizer, the
//! status view, and the sequence token of the last applied fetch. Every
//! component takes its input as an explicit argument — there are no shared
//! globals — and user interactions arrive as explicit [`Command`]s.

use active_calls_engine::filter;
use active_calls_engine::status::StatusView;
use active_calls_models::{FilterState, Incident, Snapshot};
use active_calls_view::list::{self, ListView};
use active_calls_view::marker::{FocusOutcome, MarkerLayer, MarkerSynchronizer};
use chrono::{DateTime, Local, Utc};

/// A user interaction routed through the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The filter controls changed; re-render against held data.
    SetFilter(FilterState),
    /// A list row was selected; focus that incident on the map.
    FocusIncident(String),
}

/// What a [`Command`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The filter changed and the views were re-rendered.
    Rendered(ListView),
    /// A focus request completed with this outcome.
    Focus(FocusOutcome),
}

/// Owns and coordinates the dashboard's view state.
pub struct Dashboard<L> {
    incidents: Vec<Incident>,
    filter: FilterState,
    markers: MarkerSynchronizer<L>,
    status: StatusView,
    applied_seq: u64,
}

impl<L: MarkerLayer> Dashboard<L> {
    /// Creates an empty dashboard over the given marker layer.
    pub fn new(layer: L) -> Self {
        Self {
            incidents: Vec::new(),
            filter: FilterState::default(),
            markers: MarkerSynchronizer::new(layer),
            status: StatusView::default(),
            applied_seq: 0,
        }
    }

    /// Replaces the dashboard state with a freshly fetched snapshot.
    ///
    /// `seq` is the token allocated when the fetch started. A token at or
    /// below the last applied one means a newer response already landed
    /// while this one was in flight; the stale snapshot is dropped and
    /// `None` returned, so out-of-order responses can never roll state
    /// back.
    pub fn apply_snapshot(
        &mut self,
        seq: u64,
        snapshot: Snapshot,
        now: DateTime<Local>,
    ) -> Option<ListView> {
        if seq <= self.applied_seq {
            log::debug!("dropping stale snapshot (seq {seq} <= {})", self.applied_seq);
            return None;
        }
        self.applied_seq = seq;
        self.incidents = active_calls_engine::consolidate(&snapshot.calls);
        self.status =
            StatusView::from_snapshot(&snapshot, &self.incidents, now.with_timezone(&Utc));
        log::info!(
            "applied snapshot seq {seq}: {} rows -> {} incidents",
            snapshot.calls.len(),
            self.incidents.len()
        );
        Some(self.render(now))
    }

    /// Records a failed fetch without touching the displayed data.
    ///
    /// The last good consolidated state stays rendered; only the status
    /// condition flips to unavailable, carrying the failure's message.
    /// Stale failures (by the same token rule as snapshots) are ignored.
    pub fn apply_fetch_failure(&mut self, seq: u64, message: &str) -> bool {
        if seq <= self.applied_seq {
            log::debug!("dropping stale fetch failure (seq {seq})");
            return false;
        }
        self.applied_seq = seq;
        self.status = StatusView::fetch_failure(&self.status, message);
        true
    }

    /// Routes a user interaction.
    pub fn handle(&mut self, command: Command, now: DateTime<Local>) -> CommandOutcome {
        match command {
            Command::SetFilter(state) => {
                self.filter = state;
                CommandOutcome::Rendered(self.render(now))
            }
            Command::FocusIncident(incident_number) => {
                CommandOutcome::Focus(self.markers.focus(&incident_number))
            }
        }
    }

    /// Re-runs filter, marker sync, and list rendering against held data.
    ///
    /// No network access; this is what filter changes and re-applied
    /// snapshots both go through.
    pub fn render(&mut self, now: DateTime<Local>) -> ListView {
        let visible = filter::apply(&self.incidents, &self.filter);
        self.markers.sync(&visible);
        list::render(&visible, now.naive_local())
    }

    /// The current status summary.
    #[must_use]
    pub const fn status(&self) -> &StatusView {
        &self.status
    }

    /// The full consolidated incident set (unfiltered).
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// The current filter state.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The marker synchronizer, for marker-count style introspection.
    #[must_use]
    pub const fn markers(&self) -> &MarkerSynchronizer<L> {
        &self.markers
    }

    /// Token of the most recently applied fetch result.
    #[must_use]
    pub const fn applied_seq(&self) -> u64 {
        self.applied_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use active_calls_engine::status::Condition;
    use active_calls_models::CallRow;
    use active_calls_view::marker::MemoryLayer;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    fn snapshot(numbers_and_units: &[(&str, &str, bool)]) -> Snapshot {
        let calls = numbers_and_units
            .iter()
            .map(|(number, unit, mapped)| CallRow {
                incident_number: (*number).to_string(),
                unit_number: (*unit).to_string(),
                lat: mapped.then_some(32.78),
                lon: mapped.then_some(-96.80),
                ..CallRow::default()
            })
            .collect();
        Snapshot {
            calls,
            updated_at: Some("2024-06-01T12:00:00Z".to_string()),
            ..Snapshot::default()
        }
    }

    #[test]
    fn snapshot_replaces_state_wholesale() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        let list = dashboard
            .apply_snapshot(1, snapshot(&[("A1", "101", true), ("A1", "102", true)]), now())
            .unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(dashboard.markers().marker_count(), 1);

        let list = dashboard
            .apply_snapshot(2, snapshot(&[("B2", "201", false)]), now())
            .unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.rows[0].incident_number, "B2");
        assert_eq!(dashboard.markers().marker_count(), 0);
    }

    #[test]
    fn stale_snapshot_is_dropped() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        assert!(
            dashboard
                .apply_snapshot(2, snapshot(&[("NEW", "1", false)]), now())
                .is_some()
        );
        // The slow seq-1 response arrives after seq-2 was applied.
        assert!(
            dashboard
                .apply_snapshot(1, snapshot(&[("OLD", "1", false)]), now())
                .is_none()
        );
        assert_eq!(dashboard.incidents()[0].incident_number, "NEW");
        assert_eq!(dashboard.applied_seq(), 2);
    }

    #[test]
    fn fetch_failure_keeps_last_good_state() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        dashboard
            .apply_snapshot(1, snapshot(&[("A1", "101", true)]), now())
            .unwrap();
        let incidents_before = dashboard.incidents().to_vec();

        assert!(dashboard.apply_fetch_failure(2, "connection refused"));
        assert_eq!(dashboard.incidents(), incidents_before.as_slice());
        assert_eq!(dashboard.markers().marker_count(), 1);
        assert_eq!(dashboard.status().total_incidents, 1);
        assert_eq!(
            dashboard.status().condition,
            Condition::Unavailable("connection refused".to_string())
        );
    }

    #[test]
    fn stale_fetch_failure_is_ignored() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        dashboard
            .apply_snapshot(3, snapshot(&[("A1", "101", false)]), now())
            .unwrap();
        assert!(!dashboard.apply_fetch_failure(2, "late timeout"));
        assert_eq!(dashboard.status().condition, Condition::Operational);
    }

    #[test]
    fn filter_change_rerenders_without_refetch() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        let mut snap = snapshot(&[("A1", "101", true), ("B2", "201", true)]);
        snap.calls[0].division = "CENTRAL".to_string();
        snap.calls[1].division = "NORTHEAST".to_string();
        dashboard.apply_snapshot(1, snap, now()).unwrap();

        let outcome = dashboard.handle(
            Command::SetFilter(FilterState {
                division: "CENTRAL".to_string(),
                ..FilterState::default()
            }),
            now(),
        );
        let CommandOutcome::Rendered(list) = outcome else {
            panic!("expected a re-render");
        };
        assert_eq!(list.total_count, 1);
        assert_eq!(list.rows[0].incident_number, "A1");
        assert_eq!(dashboard.markers().marker_count(), 1);
        // The full consolidated set is still held for the next filter change.
        assert_eq!(dashboard.incidents().len(), 2);
    }

    #[test]
    fn focus_requests_route_to_markers() {
        let mut dashboard = Dashboard::new(MemoryLayer::new());
        dashboard
            .apply_snapshot(1, snapshot(&[("A1", "101", true), ("B2", "201", false)]), now())
            .unwrap();

        assert_eq!(
            dashboard.handle(Command::FocusIncident("A1".to_string()), now()),
            CommandOutcome::Focus(FocusOutcome::Focused)
        );
        assert_eq!(
            dashboard.handle(Command::FocusIncident("B2".to_string()), now()),
            CommandOutcome::Focus(FocusOutcome::NotMapped)
        );
        assert_eq!(
            dashboard.handle(Command::FocusIncident("ZZ".to_string()), now()),
            CommandOutcome::Focus(FocusOutcome::Unknown)
        );
    }
}

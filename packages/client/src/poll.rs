//! Poll scheduling.
//!
//! [`Poller`] drives the fetch cycle: a sequence token is allocated before
//! every request and handed to the dashboard with the result, so a slow
//! response that arrives after a newer one is dropped instead of rolling
//! state back. Manual refreshes trigger the backend's asynchronous pull,
//! wait a fixed settle delay (a heuristic, not a completion guarantee), and
//! then run a normal poll.

use std::time::Duration;

use chrono::Local;

use crate::coordinator::Dashboard;
use crate::fetch::SnapshotFetcher;
use active_calls_view::list::ListView;
use active_calls_view::marker::MarkerLayer;

/// Timing configuration for the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Interval between scheduled polls. Fires on a fixed cadence
    /// regardless of the previous cycle's outcome.
    pub interval: Duration,
    /// How long a manual refresh waits after triggering the backend pull
    /// before fetching.
    pub settle_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120),
            settle_delay: Duration::from_millis(2500),
        }
    }
}

/// Drives scheduled and manual fetch cycles against one dashboard.
pub struct Poller {
    fetcher: SnapshotFetcher,
    config: PollConfig,
    next_seq: u64,
    refresh_busy: bool,
}

impl Poller {
    /// Creates a poller over the given fetcher.
    #[must_use]
    pub const fn new(fetcher: SnapshotFetcher, config: PollConfig) -> Self {
        Self {
            fetcher,
            config,
            next_seq: 0,
            refresh_busy: false,
        }
    }

    /// Allocates the sequence token for a fetch about to start.
    const fn next_token(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Runs one fetch cycle: fetch, apply (or record the failure), render.
    ///
    /// Returns the fresh list view when this cycle's result was applied,
    /// `None` when it was dropped as stale. Fetch errors never propagate
    /// past here; they become status text on the dashboard.
    pub async fn poll_once<L: MarkerLayer>(
        &mut self,
        dashboard: &mut Dashboard<L>,
    ) -> Option<ListView> {
        let seq = self.next_token();
        match self.fetcher.fetch().await {
            Ok(snapshot) => dashboard.apply_snapshot(seq, snapshot, Local::now()),
            Err(err) => {
                log::warn!("snapshot fetch failed (seq {seq}): {err}");
                if dashboard.apply_fetch_failure(seq, &err.to_string()) {
                    Some(dashboard.render(Local::now()))
                } else {
                    None
                }
            }
        }
    }

    /// Runs the manual refresh sequence: trigger, settle, fetch.
    ///
    /// While a refresh is in flight the trigger is disabled — a second call
    /// returns `None` immediately rather than stacking duplicate backend
    /// refreshes. The busy flag is cleared on every exit path, including a
    /// failed trigger, so the control can never stay disabled.
    pub async fn manual_refresh<L: MarkerLayer>(
        &mut self,
        dashboard: &mut Dashboard<L>,
    ) -> Option<ListView> {
        if self.refresh_busy {
            log::debug!("manual refresh ignored: one already in flight");
            return None;
        }
        self.refresh_busy = true;

        if let Err(err) = self.fetcher.trigger_refresh().await {
            // The fetch below still runs: the backend may be serving fine
            // even when the trigger endpoint is not.
            log::warn!("refresh trigger failed: {err}");
        }
        tokio::time::sleep(self.config.settle_delay).await;
        let applied = self.poll_once(dashboard).await;

        self.refresh_busy = false;
        applied
    }

    /// Whether a manual refresh sequence is currently in flight.
    #[must_use]
    pub const fn refresh_busy(&self) -> bool {
        self.refresh_busy
    }

    /// Runs the periodic poll loop forever, invoking `on_cycle` after every
    /// cycle that applied a result.
    ///
    /// The first tick fires immediately. The timer itself is never
    /// cancelled; the process lifetime bounds it.
    pub async fn run<L, F>(&mut self, dashboard: &mut Dashboard<L>, mut on_cycle: F)
    where
        L: MarkerLayer,
        F: FnMut(&Dashboard<L>, &ListView),
    {
        let mut ticker = tokio::time::interval(self.config.interval);
        loop {
            ticker.tick().await;
            if let Some(list) = self.poll_once(dashboard).await {
                on_cycle(dashboard, &list);
            }
        }
    }
}

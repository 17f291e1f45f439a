#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal frontend for the active calls dashboard.
//!
//! Drives the client engine against a backend snapshot service and renders
//! the status summary and incident list to the terminal. The marker layer
//! is the in-memory implementation — marker counts and focus results are
//! reported textually instead of on a map widget.

mod render;

use clap::{Parser, Subcommand};

use active_calls_client::coordinator::{Command, CommandOutcome, Dashboard};
use active_calls_client::fetch::SnapshotFetcher;
use active_calls_client::poll::{PollConfig, Poller};
use active_calls_client::Endpoints;
use active_calls_models::FilterState;
use active_calls_view::marker::{FocusOutcome, MemoryLayer};
use chrono::Local;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "active-calls", about = "Live view of active public-safety calls")]
struct Cli {
    /// Base URL of the backend snapshot service.
    #[arg(long, env = "ACTIVE_CALLS_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Seconds between scheduled polls in watch mode.
    #[arg(long, env = "ACTIVE_CALLS_POLL_SECS", default_value_t = 120)]
    interval_secs: u64,

    /// Only show incidents from this division ("all" disables the filter).
    #[arg(long, default_value = "all")]
    division: String,

    /// Free-text search over incident number, location, nature, and units.
    #[arg(long, default_value = "")]
    search: String,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Fetch one snapshot and print the current view (default).
    Fetch,
    /// Poll on an interval and reprint the view each cycle.
    Watch,
    /// Trigger a backend data refresh, wait for it to settle, then fetch.
    Refresh,
    /// Fetch, then focus one incident and print its details.
    Show {
        /// Incident number to focus.
        incident_number: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    log::info!("using backend at {}", cli.url);
    let fetcher = SnapshotFetcher::new(Endpoints::from_base(&cli.url))?;
    let config = PollConfig {
        interval: Duration::from_secs(cli.interval_secs.max(1)),
        ..PollConfig::default()
    };
    let mut poller = Poller::new(fetcher, config);
    let mut dashboard = Dashboard::new(MemoryLayer::new());
    dashboard.handle(
        Command::SetFilter(FilterState {
            division: cli.division.clone(),
            search_text: cli.search.clone(),
        }),
        Local::now(),
    );

    match cli.command.unwrap_or(Action::Fetch) {
        Action::Fetch => {
            if let Some(list) = poller.poll_once(&mut dashboard).await {
                render::print_cycle(&dashboard, &list);
            }
        }
        Action::Watch => {
            poller
                .run(&mut dashboard, |dashboard, list| {
                    render::print_cycle(dashboard, list);
                })
                .await;
        }
        Action::Refresh => {
            if let Some(list) = poller.manual_refresh(&mut dashboard).await {
                render::print_cycle(&dashboard, &list);
            }
        }
        Action::Show { incident_number } => {
            poller.poll_once(&mut dashboard).await;
            match dashboard.handle(Command::FocusIncident(incident_number.clone()), Local::now())
            {
                CommandOutcome::Focus(FocusOutcome::Focused) => {
                    render::print_focused(&dashboard);
                }
                CommandOutcome::Focus(FocusOutcome::NotMapped) => {
                    println!("Incident {incident_number} has no mapped location yet.");
                }
                CommandOutcome::Focus(FocusOutcome::Unknown) => {
                    println!("No active incident {incident_number}.");
                }
                CommandOutcome::Rendered(_) => unreachable!("focus command never re-renders"),
            }
        }
    }

    Ok(())
}

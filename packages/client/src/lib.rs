#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client plumbing for the active calls dashboard.
//!
//! [`fetch`] talks to the backend snapshot endpoints, [`coordinator`] owns
//! the dashboard's mutable view state, and [`poll`] drives periodic and
//! manual refresh cycles with sequence tokens that keep overlapping fetches
//! from rolling state backwards.

pub mod coordinator;
pub mod fetch;
pub mod poll;

/// Errors from the snapshot endpoints.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid snapshot JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        /// The status code returned.
        status: reqwest::StatusCode,
    },
}

/// The two backend endpoints the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Snapshot read endpoint.
    pub calls_url: String,
    /// Asynchronous refresh-trigger endpoint.
    pub refresh_url: String,
}

impl Endpoints {
    /// Derives both endpoint URLs from the backend's base URL.
    #[must_use]
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            calls_url: format!("{base}/api/calls"),
            refresh_url: format!("{base}/api/refresh"),
        }
    }
}

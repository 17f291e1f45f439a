//! Snapshot endpoint client.
//!
//! One GET against the calls endpoint per poll cycle, plus a fire-and-check
//! GET against the refresh-trigger endpoint for manual refreshes. Decoding
//! is split out so it can be tested without a live backend.

use std::time::Duration;

use active_calls_models::Snapshot;

use crate::{Endpoints, FetchError};

/// Per-request timeout. Matches the backend's own upstream fetch timeout so
/// a hung backend surfaces as a fetch failure rather than a stuck poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

/// HTTP client for the backend snapshot service.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl SnapshotFetcher {
    /// Builds a fetcher for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(endpoints: Endpoints) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoints })
    }

    /// Fetches and decodes the latest snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failure, a non-2xx status, or a
    /// body that is not snapshot JSON. A body merely missing `calls`
    /// decodes as an empty row set instead of failing.
    pub async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let response = self.client.get(&self.endpoints.calls_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        let body = response.text().await?;
        decode_snapshot(&body)
    }

    /// Asks the backend to start a data refresh.
    ///
    /// The backend processes the refresh asynchronously; only success or
    /// failure of the trigger is consumed, never the body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failure or a non-2xx status.
    pub async fn trigger_refresh(&self) -> Result<(), FetchError> {
        let response = self.client.get(&self.endpoints.refresh_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        Ok(())
    }
}

/// Decodes a snapshot body.
///
/// # Errors
///
/// Returns [`FetchError::Json`] if the body is not a JSON object of the
/// snapshot shape. Missing fields (including `calls`) take their defaults.
pub fn decode_snapshot(body: &str) -> Result<Snapshot, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use active_calls_models::Priority;

    #[test]
    fn decodes_full_snapshot() {
        let snapshot = decode_snapshot(
            r#"{
                "updatedAt": "2024-06-01T12:00:00Z",
                "totalCalls": 2,
                "mappedCalls": 1,
                "unmappedCalls": 1,
                "geocodeAttemptsThisRun": 3,
                "error": null,
                "calls": [
                    {"incidentNumber": "A1", "unitNumber": "101", "priority": "1",
                     "lat": 32.78, "lon": -96.8, "natureOfCall": "Fire"},
                    {"incidentNumber": "A1", "unitNumber": "102", "priority": ""}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.calls.len(), 2);
        assert_eq!(snapshot.calls[0].priority, Some(Priority::One));
        assert_eq!(snapshot.calls[1].priority, None);
        assert_eq!(snapshot.geocode_attempts_this_run, Some(3));
        assert_eq!(snapshot.error, None);
    }

    #[test]
    fn missing_calls_decodes_as_empty_row_set() {
        let snapshot = decode_snapshot(r#"{"updatedAt": "2024-06-01T12:00:00Z"}"#).unwrap();
        assert!(snapshot.calls.is_empty());
        assert_eq!(snapshot.total_calls, 0);
    }

    #[test]
    fn garbage_body_is_a_json_error() {
        let err = decode_snapshot("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }
}

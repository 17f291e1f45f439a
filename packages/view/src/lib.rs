#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View layer for the active calls dashboard.
//!
//! [`marker`] keeps an abstract map marker layer in step with the filtered
//! incident set, [`list`] produces the capped list view-model, and
//! [`format`] holds the date/time presentation helpers both share. Nothing
//! here talks to a concrete map widget — frontends implement
//! [`marker::MarkerLayer`] for whatever mapping library they embed.

pub mod format;
pub mod list;
pub mod marker;

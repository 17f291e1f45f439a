#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure core of the active calls dashboard.
//!
//! Turns the backend's flat per-unit rows into deduplicated incidents
//! ([`consolidate`]), evaluates the user's filter against them
//! ([`filter::apply`]), and derives the status summary shown alongside the
//! map ([`status`]). Everything here is a pure function of its inputs so
//! each stage can be tested in isolation.

pub mod consolidate;
pub mod filter;
pub mod status;

pub use consolidate::consolidate;

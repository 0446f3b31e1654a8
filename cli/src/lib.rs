//! folioscope-cli: run portfolio analytics from a TOML config and a
//! market snapshot file.
//!
//! The config holds share counts and thresholds; the snapshot holds prices
//! and return windows. Commands render the analysis as text or JSON.

pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

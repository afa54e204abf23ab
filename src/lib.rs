//! Eurovision Dash - final-round voting data for the dashboard views.
//!
//! Loads the published votes dataset, keeps the final round, derives a
//! unified `points` metric and aggregates it into favourite pairs and
//! per-country yearly totals.

pub mod config;
pub mod data;

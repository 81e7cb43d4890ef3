//! Day-ahead energy dispatch for an EV charging site with PV and battery storage.

/// REST API over the solved plan (feature `api`).
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
/// Dispatch model, LP backend, and plan KPIs.
pub mod dispatch;
pub mod io;
pub mod logging;
pub mod profile;
pub mod runner;
pub mod tariff;

//! Site equipment models: the battery seen by the planner and the EV charger fleet.

/// Stationary battery storage parameters.
pub mod battery;
/// EV charger fleet and its cost estimate.
pub mod ev_charger;

pub use battery::Battery;
pub use ev_charger::{ChargerEstimate, ChargerFleet};

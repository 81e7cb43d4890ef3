//! Fixed day-ahead load and PV forecast tables.

/// Number of hourly periods in the planning horizon.
pub const HORIZON_HOURS: usize = 24;

/// Site load demand per hour (kW).
pub const LOAD_DEMAND_KW: [f64; HORIZON_HOURS] = [
    5.0, 4.0, 3.0, 3.0, 3.0, 4.0, 6.0, 8.0, 9.0, 10.0, 10.0, 11.0, 12.0, 11.0, 10.0, 10.0, 11.0,
    13.0, 15.0, 16.0, 14.0, 11.0, 8.0, 6.0,
];

/// Maximum available PV generation per hour (kW).
pub const PV_FORECAST_KW: [f64; HORIZON_HOURS] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 1.5, 3.0, 5.0, 7.0, 8.5, 9.5, 10.0, 9.5, 8.5, 7.0, 5.0, 3.0,
    1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

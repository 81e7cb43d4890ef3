//! Core dispatch types: the scenario going in and the plan coming out.

use std::fmt;

use serde::Serialize;

use super::error::OptimizationError;
use crate::devices::Battery;
use crate::profile::{HORIZON_HOURS, LOAD_DEMAND_KW, PV_FORECAST_KW};

/// Immutable input bundle for one optimization run.
///
/// Per-hour tables are kept as vectors so that a malformed scenario can be
/// represented and rejected by [`Scenario::validate`] instead of being
/// impossible to express.
///
/// # Examples
///
/// ```
/// use ev_energy_manager::devices::Battery;
/// use ev_energy_manager::dispatch::Scenario;
///
/// let scenario = Scenario::with_fixed_profiles(
///     Battery::new(25.0, 5.0, 0.9, 0.9),
///     [1.25; 24],
///     0.0,
///     0.05,
/// );
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.soc_max_kwh(), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    /// Required load power per hour (kW).
    pub load_demand_kw: Vec<f64>,
    /// Maximum available PV power per hour (kW).
    pub pv_forecast_kw: Vec<f64>,
    /// Battery parameters, including the SOC band fractions.
    pub battery: Battery,
    /// PV energy cost per kWh, constant across hours.
    pub cost_pv: f64,
    /// Battery discharge (wear) cost per kWh, constant across hours.
    pub cost_battery: f64,
    /// Grid import price per kWh for each hour.
    pub cost_grid: Vec<f64>,
}

impl Scenario {
    /// Builds a scenario over the fixed site load and PV tables.
    ///
    /// # Arguments
    ///
    /// * `battery` - Battery parameters
    /// * `cost_grid` - Per-hour grid price
    /// * `cost_pv` - PV energy cost per kWh
    /// * `cost_battery` - Battery discharge cost per kWh
    pub fn with_fixed_profiles(
        battery: Battery,
        cost_grid: [f64; HORIZON_HOURS],
        cost_pv: f64,
        cost_battery: f64,
    ) -> Self {
        Self {
            load_demand_kw: LOAD_DEMAND_KW.to_vec(),
            pv_forecast_kw: PV_FORECAST_KW.to_vec(),
            battery,
            cost_pv,
            cost_battery,
            cost_grid: cost_grid.to_vec(),
        }
    }

    /// Hour indices of the planning horizon.
    pub fn horizon(&self) -> std::ops::Range<usize> {
        0..self.load_demand_kw.len()
    }

    /// Lower SOC bound in kWh.
    pub fn soc_min_kwh(&self) -> f64 {
        self.battery.soc_min_kwh()
    }

    /// Upper SOC bound in kWh.
    pub fn soc_max_kwh(&self) -> f64 {
        self.battery.soc_max_kwh()
    }

    /// SOC fixed at hour 0, in kWh.
    pub fn soc_initial_kwh(&self) -> f64 {
        self.battery.soc_initial_kwh()
    }

    /// Checks every precondition of the dispatch problem.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizationError::InvalidScenario`] listing every violation.
    pub fn validate(&self) -> Result<(), OptimizationError> {
        let mut problems = Vec::new();

        for (name, table) in [
            ("load_demand_kw", &self.load_demand_kw),
            ("pv_forecast_kw", &self.pv_forecast_kw),
            ("cost_grid", &self.cost_grid),
        ] {
            if table.len() != HORIZON_HOURS {
                problems.push(format!(
                    "{name} must have {HORIZON_HOURS} entries, got {}",
                    table.len()
                ));
            }
            if let Some((h, v)) = table
                .iter()
                .enumerate()
                .find(|(_, v)| !is_non_negative(**v))
            {
                problems.push(format!("{name}[{h}] must be finite and >= 0, got {v}"));
            }
        }

        let bat = &self.battery;
        for (name, value) in [
            ("cost_pv", self.cost_pv),
            ("cost_battery", self.cost_battery),
            ("battery.capacity_kwh", bat.capacity_kwh),
            ("battery.power_max_kw", bat.power_max_kw),
            ("battery.soc_min_fraction", bat.soc_min_fraction),
            ("battery.soc_initial_fraction", bat.soc_initial_fraction),
            ("battery.soc_max_fraction", bat.soc_max_fraction),
        ] {
            if !is_non_negative(value) {
                problems.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        for (name, value) in [
            ("battery.eta_charge", bat.eta_charge),
            ("battery.eta_discharge", bat.eta_discharge),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                problems.push(format!("{name} must be in (0, 1], got {value}"));
            }
        }

        if self.soc_min_kwh() > self.soc_initial_kwh() {
            problems.push(format!(
                "soc_min ({:.3} kWh) must be <= soc_initial ({:.3} kWh)",
                self.soc_min_kwh(),
                self.soc_initial_kwh()
            ));
        }
        if self.soc_initial_kwh() > self.soc_max_kwh() {
            problems.push(format!(
                "soc_initial ({:.3} kWh) must be <= soc_max ({:.3} kWh)",
                self.soc_initial_kwh(),
                self.soc_max_kwh()
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(OptimizationError::InvalidScenario(problems.join("; ")))
        }
    }
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Planned flows for one hour of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyDispatch {
    /// Hour index (0..24).
    pub hour: usize,
    /// Required load (kW).
    pub load_kw: f64,
    /// Available PV (kW).
    pub pv_forecast_kw: f64,
    /// PV power dispatched (kW).
    pub pv_kw: f64,
    /// Battery charging power (kW, >= 0).
    pub battery_charge_kw: f64,
    /// Battery discharging power (kW, >= 0).
    pub battery_discharge_kw: f64,
    /// Net battery power (kW; positive=discharge, negative=charge).
    pub battery_kw: f64,
    /// Grid import (kW, >= 0).
    pub grid_kw: f64,
    /// State of charge at hour `hour` (kWh).
    pub soc_kwh: f64,
    /// Grid price applied this hour.
    pub grid_price: f64,
    /// Cost of this hour's PV, battery discharge and grid import.
    pub cost: f64,
}

impl fmt::Display for HourlyDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} | load={:>5.2} kW | pv={:>5.2}/{:<5.2} kW  bat={:>6.2} kW  \
             grid={:>5.2} kW @ {:.3} | SoC={:>6.2} kWh | cost={:>7.3}",
            self.hour,
            self.load_kw,
            self.pv_kw,
            self.pv_forecast_kw,
            self.battery_kw,
            self.grid_kw,
            self.grid_price,
            self.soc_kwh,
            self.cost,
        )
    }
}

/// A solved day-ahead dispatch plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    /// One entry per hour, in hour order.
    pub hours: Vec<HourlyDispatch>,
    /// Sum of the hourly costs; equals the LP objective value.
    pub total_cost: f64,
}

impl DispatchResult {
    /// Grid import per hour (kW).
    pub fn grid_kw(&self) -> Vec<f64> {
        self.hours.iter().map(|h| h.grid_kw).collect()
    }
}

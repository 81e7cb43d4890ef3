//! Post-hoc KPIs over a solved dispatch plan.

use std::fmt;

use serde::Serialize;

use super::types::DispatchResult;

/// Aggregate indicators derived from a complete [`DispatchResult`].
///
/// Computed after the solve so that reported figures always agree with the
/// hourly rows. Each hour is one hour long, so kW and kWh coincide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSummary {
    /// Objective value of the plan.
    pub total_cost: f64,
    /// PV energy dispatched (kWh).
    pub pv_used_kwh: f64,
    /// Available PV left unused (kWh).
    pub pv_curtailed_kwh: f64,
    /// Grid energy imported (kWh).
    pub grid_energy_kwh: f64,
    /// Largest hourly grid import (kW).
    pub peak_grid_kw: f64,
    /// Energy drawn into the battery (kWh, before losses).
    pub battery_charged_kwh: f64,
    /// Energy delivered by the battery (kWh, after losses).
    pub battery_discharged_kwh: f64,
    /// Battery throughput over twice the capacity.
    pub battery_equivalent_full_cycles: f64,
    /// Grid cost in the hours before the tariff threshold.
    pub grid_cost_before_threshold: f64,
    /// Grid cost from the tariff threshold onwards.
    pub grid_cost_after_threshold: f64,
    /// Share of load served without the grid (%).
    pub self_sufficiency_pct: f64,
}

impl DispatchSummary {
    /// Computes all KPIs from a plan.
    ///
    /// # Arguments
    ///
    /// * `result` - Solved dispatch plan
    /// * `battery_capacity_kwh` - Capacity used for the cycle count
    /// * `threshold_hour` - First discounted tariff hour; `None` counts every
    ///   hour as before the threshold
    pub fn from_result(
        result: &DispatchResult,
        battery_capacity_kwh: f64,
        threshold_hour: Option<usize>,
    ) -> Self {
        let mut pv_used = 0.0;
        let mut pv_curtailed = 0.0;
        let mut grid_energy = 0.0;
        let mut peak_grid = 0.0_f64;
        let mut charged = 0.0;
        let mut discharged = 0.0;
        let mut cost_before = 0.0;
        let mut cost_after = 0.0;
        let mut load = 0.0;

        for h in &result.hours {
            pv_used += h.pv_kw;
            pv_curtailed += (h.pv_forecast_kw - h.pv_kw).max(0.0);
            grid_energy += h.grid_kw;
            peak_grid = peak_grid.max(h.grid_kw);
            charged += h.battery_charge_kw;
            discharged += h.battery_discharge_kw;
            load += h.load_kw;

            let grid_cost = h.grid_kw * h.grid_price;
            match threshold_hour {
                Some(t) if h.hour >= t => cost_after += grid_cost,
                _ => cost_before += grid_cost,
            }
        }

        let cycles = if battery_capacity_kwh > 0.0 {
            (charged + discharged) / (2.0 * battery_capacity_kwh)
        } else {
            0.0
        };

        let self_sufficiency_pct = if load > 0.0 {
            (100.0 * (load - grid_energy) / load).clamp(0.0, 100.0)
        } else {
            100.0
        };

        Self {
            total_cost: result.total_cost,
            pv_used_kwh: pv_used,
            pv_curtailed_kwh: pv_curtailed,
            grid_energy_kwh: grid_energy,
            peak_grid_kw: peak_grid,
            battery_charged_kwh: charged,
            battery_discharged_kwh: discharged,
            battery_equivalent_full_cycles: cycles,
            grid_cost_before_threshold: cost_before,
            grid_cost_after_threshold: cost_after,
            self_sufficiency_pct,
        }
    }
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Total cost:            {:.3}", self.total_cost)?;
        writeln!(
            f,
            "PV used:               {:.2} kWh ({:.2} kWh curtailed)",
            self.pv_used_kwh, self.pv_curtailed_kwh
        )?;
        writeln!(f, "Grid energy:           {:.2} kWh", self.grid_energy_kwh)?;
        writeln!(f, "Peak grid import:      {:.2} kW", self.peak_grid_kw)?;
        writeln!(
            f,
            "Battery in/out:        {:.2} / {:.2} kWh ({:.2} equiv. cycles)",
            self.battery_charged_kwh,
            self.battery_discharged_kwh,
            self.battery_equivalent_full_cycles
        )?;
        writeln!(
            f,
            "Grid cost before/after threshold: {:.3} / {:.3}",
            self.grid_cost_before_threshold, self.grid_cost_after_threshold
        )?;
        write!(f, "Self-sufficiency:      {:.1}%", self.self_sufficiency_pct)
    }
}

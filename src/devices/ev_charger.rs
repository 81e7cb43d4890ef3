use std::fmt;

use serde::{Deserialize, Serialize};

/// Allowed Level 2 charger count range.
pub const LEVEL2_COUNT_RANGE: (u32, u32) = (1, 10);
/// Allowed Level 3 charger count range.
pub const LEVEL3_COUNT_RANGE: (u32, u32) = (1, 5);

/// Installed EV chargers at the site.
///
/// The fleet only feeds the installed-power and cost estimate. It is not part
/// of the dispatch problem: the fixed load profile already covers site demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargerFleet {
    /// Number of Level 2 (AC) chargers.
    pub level2_count: u32,
    /// Rated power of one Level 2 charger (kW).
    pub level2_kw: f64,
    /// Number of Level 3 (DC fast) chargers.
    pub level3_count: u32,
    /// Rated power of one Level 3 charger (kW).
    pub level3_kw: f64,
}

impl Default for ChargerFleet {
    fn default() -> Self {
        Self {
            level2_count: 5,
            level2_kw: 7.2,
            level3_count: 3,
            level3_kw: 50.0,
        }
    }
}

/// Daily energy and cost estimate for a charger fleet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargerEstimate {
    /// Total installed charging power (kW).
    pub installed_kw: f64,
    /// Energy delivered per day at the assumed utilisation (kWh).
    pub daily_energy_kwh: f64,
    /// Daily energy cost at the mean grid price.
    pub daily_cost: f64,
}

impl ChargerFleet {
    /// Total installed charging power in kW.
    pub fn installed_kw(&self) -> f64 {
        f64::from(self.level2_count) * self.level2_kw
            + f64::from(self.level3_count) * self.level3_kw
    }

    /// Estimates daily charging energy and cost.
    ///
    /// # Arguments
    ///
    /// * `mean_grid_price` - Average grid price per kWh over the day
    /// * `utilisation_hours` - Equivalent full-power hours per charger per day
    pub fn estimate(&self, mean_grid_price: f64, utilisation_hours: f64) -> ChargerEstimate {
        let installed_kw = self.installed_kw();
        let daily_energy_kwh = installed_kw * utilisation_hours;
        ChargerEstimate {
            installed_kw,
            daily_energy_kwh,
            daily_cost: daily_energy_kwh * mean_grid_price,
        }
    }
}

impl fmt::Display for ChargerEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Charger Estimate ---")?;
        writeln!(f, "Installed power:       {:.1} kW", self.installed_kw)?;
        writeln!(f, "Daily energy:          {:.1} kWh", self.daily_energy_kwh)?;
        write!(f, "Daily energy cost:     {:.2}", self.daily_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fleet_is_five_level2_three_level3() {
        let fleet = ChargerFleet::default();
        assert_eq!(fleet.level2_count, 5);
        assert_eq!(fleet.level3_count, 3);
    }

    #[test]
    fn installed_power_sums_both_levels() {
        let fleet = ChargerFleet {
            level2_count: 2,
            level2_kw: 7.0,
            level3_count: 1,
            level3_kw: 50.0,
        };
        assert_eq!(fleet.installed_kw(), 64.0);
    }

    #[test]
    fn estimate_scales_with_utilisation_and_price() {
        let fleet = ChargerFleet {
            level2_count: 1,
            level2_kw: 10.0,
            level3_count: 1,
            level3_kw: 40.0,
        };
        let est = fleet.estimate(0.5, 2.0);
        assert_eq!(est.installed_kw, 50.0);
        assert_eq!(est.daily_energy_kwh, 100.0);
        assert_eq!(est.daily_cost, 50.0);
    }

    #[test]
    fn estimate_display_does_not_panic() {
        let s = format!("{}", ChargerFleet::default().estimate(1.0, 1.0));
        assert!(s.contains("Installed power"));
    }
}

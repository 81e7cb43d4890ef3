use serde::{Deserialize, Serialize};

/// Default lower SOC bound as a fraction of capacity.
pub const DEFAULT_SOC_MIN_FRACTION: f64 = 0.2;
/// Default initial SOC as a fraction of capacity.
pub const DEFAULT_SOC_INITIAL_FRACTION: f64 = 0.5;
/// Default upper SOC bound as a fraction of capacity.
pub const DEFAULT_SOC_MAX_FRACTION: f64 = 0.8;

/// A stationary battery as seen by the day-ahead planner.
///
/// The planner works in absolute energy, so the SOC band is derived from
/// `capacity_kwh` and the three fractions.
///
/// # Power Flow Convention
/// - Positive net power: discharging (supplying the load)
/// - Negative net power: charging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    /// Usable energy capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Symmetric charge/discharge power limit in kilowatts.
    pub power_max_kw: f64,

    /// Charging efficiency (0..1.0].
    pub eta_charge: f64,

    /// Discharging efficiency (0..1.0].
    pub eta_discharge: f64,

    /// Lower SOC bound as a fraction of capacity.
    pub soc_min_fraction: f64,

    /// Initial SOC as a fraction of capacity.
    pub soc_initial_fraction: f64,

    /// Upper SOC bound as a fraction of capacity.
    pub soc_max_fraction: f64,
}

impl Battery {
    /// Creates a battery with the default 20% / 50% / 80% SOC band.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Usable capacity in kWh
    /// * `power_max_kw` - Charge and discharge power limit in kW
    /// * `eta_charge` - Charging efficiency (0..1.0]
    /// * `eta_discharge` - Discharging efficiency (0..1.0]
    pub fn new(capacity_kwh: f64, power_max_kw: f64, eta_charge: f64, eta_discharge: f64) -> Self {
        Self {
            capacity_kwh,
            power_max_kw,
            eta_charge,
            eta_discharge,
            soc_min_fraction: DEFAULT_SOC_MIN_FRACTION,
            soc_initial_fraction: DEFAULT_SOC_INITIAL_FRACTION,
            soc_max_fraction: DEFAULT_SOC_MAX_FRACTION,
        }
    }

    /// Lower SOC bound in kWh.
    pub fn soc_min_kwh(&self) -> f64 {
        self.soc_min_fraction * self.capacity_kwh
    }

    /// Upper SOC bound in kWh.
    pub fn soc_max_kwh(&self) -> f64 {
        self.soc_max_fraction * self.capacity_kwh
    }

    /// SOC at the start of the horizon in kWh.
    pub fn soc_initial_kwh(&self) -> f64 {
        self.soc_initial_fraction * self.capacity_kwh
    }

    /// Advances SOC by one hour of charging and discharging.
    ///
    /// Charging energy is scaled by `eta_charge` on the way in; discharging
    /// draws `discharge_kw / eta_discharge` out of storage.
    pub fn next_soc_kwh(&self, soc_kwh: f64, charge_kw: f64, discharge_kw: f64) -> f64 {
        soc_kwh + self.eta_charge * charge_kw - discharge_kw / self.eta_discharge
    }
}

//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::devices::battery::{
    DEFAULT_SOC_INITIAL_FRACTION, DEFAULT_SOC_MAX_FRACTION, DEFAULT_SOC_MIN_FRACTION,
};
use crate::devices::ev_charger::{LEVEL2_COUNT_RANGE, LEVEL3_COUNT_RANGE};
use crate::devices::{Battery, ChargerEstimate, ChargerFleet};
use crate::dispatch::Scenario;
use crate::profile::HORIZON_HOURS;
use crate::tariff::{DEFAULT_TOU_DISCOUNT, DEFAULT_TOU_THRESHOLD_HOUR, GridTariff, PvPricing};

/// Top-level scenario configuration parsed from TOML (or JSON in the API).
///
/// All fields have defaults matching the `base` preset. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Grid, PV, and battery prices.
    #[serde(default)]
    pub prices: PricesConfig,
    /// EV charger fleet for the cost estimate.
    #[serde(default)]
    pub chargers: ChargersConfig,
}

/// Battery storage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Symmetric charge/discharge power limit (kW).
    pub power_max_kw: f64,
    /// Charge efficiency (0.0–1.0].
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0].
    pub eta_discharge: f64,
    /// Lower SOC bound as a fraction of capacity.
    pub soc_min_fraction: f64,
    /// Initial SOC as a fraction of capacity.
    pub soc_initial_fraction: f64,
    /// Upper SOC bound as a fraction of capacity.
    pub soc_max_fraction: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 25.0,
            power_max_kw: 5.0,
            eta_charge: 0.9,
            eta_discharge: 0.9,
            soc_min_fraction: DEFAULT_SOC_MIN_FRACTION,
            soc_initial_fraction: DEFAULT_SOC_INITIAL_FRACTION,
            soc_max_fraction: DEFAULT_SOC_MAX_FRACTION,
        }
    }
}

/// Grid tariff shape selected in `[prices]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffKind {
    /// Same grid price every hour.
    Flat,
    /// Discounted from `tou_threshold_hour` onwards.
    Tou,
}

/// Grid, PV, and battery prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricesConfig {
    /// Base grid import price per kWh.
    pub grid_price: f64,
    /// `"flat"` or `"tou"`.
    pub tariff: TariffKind,
    /// First discounted hour for the `tou` tariff.
    pub tou_threshold_hour: usize,
    /// Discount fraction for the `tou` tariff.
    pub tou_discount: f64,
    /// `"free"` or `"priced"`.
    pub pv_pricing: PvPricing,
    /// PV price per kWh, used when `pv_pricing = "priced"`.
    pub pv_price: f64,
    /// Battery discharge cost per kWh.
    pub battery_price: f64,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            grid_price: 1.25,
            tariff: TariffKind::Flat,
            tou_threshold_hour: DEFAULT_TOU_THRESHOLD_HOUR,
            tou_discount: DEFAULT_TOU_DISCOUNT,
            pv_pricing: PvPricing::Free,
            pv_price: 0.0,
            battery_price: 0.05,
        }
    }
}

/// EV charger fleet parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargersConfig {
    /// Number of Level 2 chargers.
    pub level2_count: u32,
    /// Rated power per Level 2 charger (kW).
    pub level2_kw: f64,
    /// Number of Level 3 chargers.
    pub level3_count: u32,
    /// Rated power per Level 3 charger (kW).
    pub level3_kw: f64,
    /// Equivalent full-power hours per day.
    pub utilisation_hours: f64,
}

impl Default for ChargersConfig {
    fn default() -> Self {
        let fleet = ChargerFleet::default();
        Self {
            level2_count: fleet.level2_count,
            level2_kw: fleet.level2_kw,
            level3_count: fleet.level3_count,
            level3_kw: fleet.level3_kw,
            utilisation_hours: 4.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.eta_charge"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Flat grid price, free PV.
    pub fn base() -> Self {
        Self::default()
    }

    /// Time-of-use grid price with PV on the priced objective.
    pub fn priced() -> Self {
        Self {
            prices: PricesConfig {
                tariff: TariffKind::Tou,
                pv_pricing: PvPricing::Priced,
                ..PricesConfig::default()
            },
            ..Self::default()
        }
    }

    /// The `priced` preset with a flat grid price, for TOU comparisons.
    pub fn flat_priced() -> Self {
        Self {
            prices: PricesConfig {
                tariff: TariffKind::Flat,
                pv_pricing: PvPricing::Priced,
                ..PricesConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["base", "priced", "flat_priced"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "base" => Ok(Self::base()),
            "priced" => Ok(Self::priced()),
            "flat_priced" => Ok(Self::flat_priced()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Battery model for the planner.
    pub fn battery(&self) -> Battery {
        let b = &self.battery;
        Battery {
            capacity_kwh: b.capacity_kwh,
            power_max_kw: b.power_max_kw,
            eta_charge: b.eta_charge,
            eta_discharge: b.eta_discharge,
            soc_min_fraction: b.soc_min_fraction,
            soc_initial_fraction: b.soc_initial_fraction,
            soc_max_fraction: b.soc_max_fraction,
        }
    }

    /// Grid tariff described by `[prices]`.
    pub fn tariff(&self) -> GridTariff {
        let p = &self.prices;
        match p.tariff {
            TariffKind::Flat => GridTariff::Flat {
                price: p.grid_price,
            },
            TariffKind::Tou => GridTariff::TimeOfUse {
                price: p.grid_price,
                threshold_hour: p.tou_threshold_hour,
                discount: p.tou_discount,
            },
        }
    }

    /// PV price per kWh after applying the PV pricing option.
    pub fn cost_pv(&self) -> f64 {
        self.prices.pv_pricing.effective_price(self.prices.pv_price)
    }

    /// Builds the dispatch scenario over the fixed load and PV tables.
    pub fn to_scenario(&self) -> Scenario {
        Scenario::with_fixed_profiles(
            self.battery(),
            self.tariff().hourly_prices(),
            self.cost_pv(),
            self.prices.battery_price,
        )
    }

    /// Charger fleet described by `[chargers]`.
    pub fn charger_fleet(&self) -> ChargerFleet {
        let c = &self.chargers;
        ChargerFleet {
            level2_count: c.level2_count,
            level2_kw: c.level2_kw,
            level3_count: c.level3_count,
            level3_kw: c.level3_kw,
        }
    }

    /// Daily charger energy and cost at the mean hourly grid price.
    pub fn charger_estimate(&self) -> ChargerEstimate {
        let prices = self.tariff().hourly_prices();
        let mean_price = prices.iter().sum::<f64>() / HORIZON_HOURS as f64;
        self.charger_fleet()
            .estimate(mean_price, self.chargers.utilisation_hours)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let bat = &self.battery;
        for (field, value) in [
            ("battery.capacity_kwh", bat.capacity_kwh),
            ("battery.power_max_kw", bat.power_max_kw),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be finite and >= 0"));
            }
        }
        for (field, value) in [
            ("battery.eta_charge", bat.eta_charge),
            ("battery.eta_discharge", bat.eta_discharge),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigError::new(field, "must be in (0.0, 1.0]"));
            }
        }
        for (field, value) in [
            ("battery.soc_min_fraction", bat.soc_min_fraction),
            ("battery.soc_initial_fraction", bat.soc_initial_fraction),
            ("battery.soc_max_fraction", bat.soc_max_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        if bat.soc_min_fraction > bat.soc_initial_fraction {
            errors.push(ConfigError::new(
                "battery.soc_min_fraction",
                "must be <= battery.soc_initial_fraction",
            ));
        }
        if bat.soc_initial_fraction > bat.soc_max_fraction {
            errors.push(ConfigError::new(
                "battery.soc_initial_fraction",
                "must be <= battery.soc_max_fraction",
            ));
        }

        let p = &self.prices;
        for (field, value) in [
            ("prices.grid_price", p.grid_price),
            ("prices.pv_price", p.pv_price),
            ("prices.battery_price", p.battery_price),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be finite and >= 0"));
            }
        }
        if p.tou_threshold_hour > HORIZON_HOURS {
            errors.push(ConfigError::new(
                "prices.tou_threshold_hour",
                format!("must be <= {HORIZON_HOURS}"),
            ));
        }
        if !(0.0..=1.0).contains(&p.tou_discount) {
            errors.push(ConfigError::new(
                "prices.tou_discount",
                "must be in [0.0, 1.0]",
            ));
        }

        let c = &self.chargers;
        for (field, count, (lo, hi)) in [
            ("chargers.level2_count", c.level2_count, LEVEL2_COUNT_RANGE),
            ("chargers.level3_count", c.level3_count, LEVEL3_COUNT_RANGE),
        ] {
            if !(lo..=hi).contains(&count) {
                errors.push(ConfigError::new(field, format!("must be in [{lo}, {hi}]")));
            }
        }
        for (field, value) in [
            ("chargers.level2_kw", c.level2_kw),
            ("chargers.level3_kw", c.level3_kw),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }
        if !(0.0..=HORIZON_HOURS as f64).contains(&c.utilisation_hours) {
            errors.push(ConfigError::new(
                "chargers.utilisation_hours",
                format!("must be in [0, {HORIZON_HOURS}]"),
            ));
        }

        errors
    }
}

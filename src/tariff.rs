//! Hourly grid price construction and PV pricing options.

use serde::{Deserialize, Serialize};

use crate::profile::HORIZON_HOURS;

/// Hour from which the time-of-use discount applies.
pub const DEFAULT_TOU_THRESHOLD_HOUR: usize = 19;

/// Fraction taken off the grid price from the threshold hour onwards.
pub const DEFAULT_TOU_DISCOUNT: f64 = 0.5;

/// Grid import tariff over the planning horizon.
///
/// # Examples
///
/// ```
/// use ev_energy_manager::tariff::GridTariff;
///
/// let prices = GridTariff::time_of_use(1.25).hourly_prices();
/// assert_eq!(prices[18], 1.25);
/// assert_eq!(prices[19], 0.625);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTariff {
    /// Same price every hour.
    Flat {
        /// Grid price per kWh.
        price: f64,
    },
    /// Base price, discounted from `threshold_hour` to the end of the day.
    TimeOfUse {
        /// Grid price per kWh before the threshold.
        price: f64,
        /// First discounted hour.
        threshold_hour: usize,
        /// Discount fraction in `[0, 1]`.
        discount: f64,
    },
}

impl GridTariff {
    /// Time-of-use tariff with the default threshold and discount.
    pub fn time_of_use(price: f64) -> Self {
        Self::TimeOfUse {
            price,
            threshold_hour: DEFAULT_TOU_THRESHOLD_HOUR,
            discount: DEFAULT_TOU_DISCOUNT,
        }
    }

    /// Price for a single hour of the horizon.
    pub fn price_at(&self, hour: usize) -> f64 {
        match *self {
            Self::Flat { price } => price,
            Self::TimeOfUse {
                price,
                threshold_hour,
                discount,
            } => {
                if hour >= threshold_hour {
                    price * (1.0 - discount)
                } else {
                    price
                }
            }
        }
    }

    /// Per-hour grid prices for the whole horizon.
    pub fn hourly_prices(&self) -> [f64; HORIZON_HOURS] {
        std::array::from_fn(|h| self.price_at(h))
    }

    /// First discounted hour, if the tariff has one.
    pub fn threshold_hour(&self) -> Option<usize> {
        match *self {
            Self::Flat { .. } => None,
            Self::TimeOfUse { threshold_hour, .. } => Some(threshold_hour),
        }
    }
}

/// Whether PV energy carries a marginal cost in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PvPricing {
    /// PV is free; any configured PV price is ignored.
    Free,
    /// PV is charged at the configured price.
    Priced,
}

impl PvPricing {
    /// Effective PV price per kWh for the configured `pv_price`.
    pub fn effective_price(self, pv_price: f64) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::Priced => pv_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_tariff_is_constant() {
        let prices = GridTariff::Flat { price: 0.3 }.hourly_prices();
        assert!(prices.iter().all(|&p| p == 0.3));
    }

    #[test]
    fn tou_discounts_from_threshold_onwards() {
        let tariff = GridTariff::time_of_use(1.25);
        let prices = tariff.hourly_prices();
        for (h, &p) in prices.iter().enumerate() {
            let expected = if h >= 19 { 0.625 } else { 1.25 };
            assert_eq!(p, expected, "hour {h}");
        }
        assert_eq!(tariff.threshold_hour(), Some(19));
    }

    #[test]
    fn threshold_past_horizon_means_no_discount() {
        let tariff = GridTariff::TimeOfUse {
            price: 1.0,
            threshold_hour: 24,
            discount: 0.5,
        };
        assert!(tariff.hourly_prices().iter().all(|&p| p == 1.0));
    }

    #[test]
    fn free_pv_ignores_price() {
        assert_eq!(PvPricing::Free.effective_price(0.2), 0.0);
        assert_eq!(PvPricing::Priced.effective_price(0.2), 0.2);
    }
}

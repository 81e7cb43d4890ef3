//! Shared fixtures and plan checks for integration tests.

#![allow(dead_code)]

use ev_energy_manager::devices::Battery;
use ev_energy_manager::dispatch::{DispatchResult, Scenario};
use ev_energy_manager::tariff::GridTariff;
use rand::Rng;
use rand::rngs::StdRng;

/// Tolerance for per-hour balance and bound checks.
pub const TOL: f64 = 1e-6;

/// Example battery: 25 kWh, 5 kW, 90% efficiency each way.
pub fn example_battery() -> Battery {
    Battery::new(25.0, 5.0, 0.9, 0.9)
}

/// The time-of-use example: grid 1.25, halved from hour 19; free PV; battery 0.05.
pub fn tou_scenario() -> Scenario {
    Scenario::with_fixed_profiles(
        example_battery(),
        GridTariff::time_of_use(1.25).hourly_prices(),
        0.0,
        0.05,
    )
}

/// Same as [`tou_scenario`] with a flat 1.25 grid price.
pub fn flat_scenario() -> Scenario {
    Scenario::with_fixed_profiles(
        example_battery(),
        GridTariff::Flat { price: 1.25 }.hourly_prices(),
        0.0,
        0.05,
    )
}

/// A valid scenario with randomised battery and prices over the fixed tables.
pub fn random_scenario(rng: &mut StdRng) -> Scenario {
    let mut battery = Battery::new(
        rng.random_range(0.0..60.0),
        rng.random_range(0.0..12.0),
        rng.random_range(0.6..=1.0),
        rng.random_range(0.6..=1.0),
    );
    battery.soc_min_fraction = rng.random_range(0.0..0.4);
    battery.soc_max_fraction = rng.random_range(0.6..=1.0);
    battery.soc_initial_fraction =
        rng.random_range(battery.soc_min_fraction..=battery.soc_max_fraction);

    let grid: [f64; 24] = std::array::from_fn(|_| rng.random_range(0.05..2.0));
    Scenario::with_fixed_profiles(
        battery,
        grid,
        rng.random_range(0.0..0.3),
        rng.random_range(0.0..0.3),
    )
}

/// Asserts every physical invariant of a solved plan.
pub fn assert_plan_invariants(scenario: &Scenario, result: &DispatchResult) {
    assert_eq!(result.hours.len(), 24);

    let soc_min = scenario.soc_min_kwh();
    let soc_max = scenario.soc_max_kwh();
    let power = scenario.battery.power_max_kw;

    for (h, row) in result.hours.iter().enumerate() {
        assert_eq!(row.hour, h);

        let supplied = row.pv_kw + row.battery_kw + row.grid_kw;
        assert!(
            (supplied - scenario.load_demand_kw[h]).abs() < TOL,
            "hour {h}: supply {supplied} != load {}",
            scenario.load_demand_kw[h]
        );

        assert!(row.pv_kw >= -TOL && row.pv_kw <= scenario.pv_forecast_kw[h] + TOL);
        assert!(row.battery_charge_kw >= -TOL && row.battery_charge_kw <= power + TOL);
        assert!(row.battery_discharge_kw >= -TOL && row.battery_discharge_kw <= power + TOL);
        assert!(row.grid_kw >= -TOL, "hour {h}: grid export {}", row.grid_kw);
        assert!(
            row.soc_kwh >= soc_min - TOL && row.soc_kwh <= soc_max + TOL,
            "hour {h}: soc {} outside [{soc_min}, {soc_max}]",
            row.soc_kwh
        );
    }

    assert!((result.hours[0].soc_kwh - scenario.soc_initial_kwh()).abs() < TOL);

    let bat = &scenario.battery;
    for pair in result.hours.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let expected = bat.next_soc_kwh(
            prev.soc_kwh,
            prev.battery_charge_kw,
            prev.battery_discharge_kw,
        );
        assert!(
            (cur.soc_kwh - expected).abs() < 1e-5,
            "hour {}: soc {} != {expected}",
            cur.hour,
            cur.soc_kwh
        );
    }

    let recomputed: f64 = result
        .hours
        .iter()
        .map(|r| {
            scenario.cost_pv * r.pv_kw
                + scenario.cost_battery * r.battery_discharge_kw
                + r.grid_price * r.grid_kw
        })
        .sum();
    assert!((result.total_cost - recomputed).abs() < 1e-6);
}

//! Day-ahead dispatch optimizer.
//!
//! Builds the hourly PV / battery / grid linear program for a [`Scenario`],
//! solves it with an [`LpSolver`], and reads the plan back.
//!
//! Per hour `h` the model has PV, charge, discharge, grid import and SOC
//! variables with box bounds, and:
//!
//! - load balance: `pv + discharge - charge + grid == load`
//! - PV ceiling: `pv <= pv_forecast`
//! - `soc[0] == soc_initial`
//! - `soc[h] == soc[h-1] + eta_c * charge[h-1] - discharge[h-1] / eta_d` for `h >= 1`
//!
//! The horizon is open: nothing ties `soc[23]` back to `soc[0]`, and hour 23
//! flows have no SOC effect.

use tracing::{debug, info, warn};

use super::error::OptimizationError;
use super::lp::{LinearProgram, LpSolution, LpSolver, MiniLpSolver, Relation, VarId};
use super::types::{DispatchResult, HourlyDispatch, Scenario};

/// Variable handles for one hour of the model.
#[derive(Debug, Clone, Copy)]
struct HourVars {
    pv: VarId,
    charge: VarId,
    discharge: VarId,
    grid: VarId,
    soc: VarId,
}

/// Solves day-ahead dispatch plans with a pluggable LP backend.
///
/// Generic over `S: LpSolver` for static dispatch; the default backend is
/// [`MiniLpSolver`].
#[derive(Debug, Default, Clone)]
pub struct DispatchOptimizer<S: LpSolver = MiniLpSolver> {
    solver: S,
}

impl DispatchOptimizer<MiniLpSolver> {
    /// Creates an optimizer backed by `good_lp` + `minilp`.
    pub fn new() -> Self {
        Self {
            solver: MiniLpSolver,
        }
    }
}

impl<S: LpSolver> DispatchOptimizer<S> {
    /// Creates an optimizer using the given LP backend.
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    /// Computes the minimum-cost dispatch plan for `scenario`.
    ///
    /// # Errors
    ///
    /// - [`OptimizationError::InvalidScenario`] if validation fails (no LP is built)
    /// - [`OptimizationError::Infeasible`], [`OptimizationError::Unbounded`], or
    ///   [`OptimizationError::SolverFailure`] from the backend
    pub fn solve(&self, scenario: &Scenario) -> Result<DispatchResult, OptimizationError> {
        if let Err(err) = scenario.validate() {
            warn!(%err, "rejecting scenario before solve");
            return Err(err);
        }

        let (lp, vars) = build_model(scenario);
        debug!(
            backend = self.solver.name(),
            variables = lp.num_variables(),
            constraints = lp.num_constraints(),
            "solving dispatch LP"
        );

        let solution = self.solver.solve(&lp).inspect_err(|err| {
            warn!(%err, backend = self.solver.name(), "dispatch solve failed");
        })?;

        let result = extract_result(scenario, &vars, &solution);
        info!(
            total_cost = result.total_cost,
            objective = solution.objective(),
            "dispatch plan solved"
        );
        Ok(result)
    }
}

/// Transcribes the scenario into an LP.
fn build_model(scenario: &Scenario) -> (LinearProgram, Vec<HourVars>) {
    let mut lp = LinearProgram::new();
    let bat = &scenario.battery;
    let soc_min = scenario.soc_min_kwh();
    let soc_max = scenario.soc_max_kwh();

    let vars: Vec<HourVars> = scenario
        .horizon()
        .map(|h| HourVars {
            pv: lp.add_variable(0.0, Some(scenario.pv_forecast_kw[h])),
            charge: lp.add_variable(0.0, Some(bat.power_max_kw)),
            discharge: lp.add_variable(0.0, Some(bat.power_max_kw)),
            grid: lp.add_variable(0.0, None),
            soc: lp.add_variable(soc_min, Some(soc_max)),
        })
        .collect();

    for (h, v) in vars.iter().enumerate() {
        lp.set_objective(v.pv, scenario.cost_pv);
        lp.set_objective(v.discharge, scenario.cost_battery);
        lp.set_objective(v.grid, scenario.cost_grid[h]);

        lp.add_constraint(
            vec![(v.pv, 1.0), (v.discharge, 1.0), (v.charge, -1.0), (v.grid, 1.0)],
            Relation::Eq,
            scenario.load_demand_kw[h],
        );
        lp.add_constraint(vec![(v.pv, 1.0)], Relation::Le, scenario.pv_forecast_kw[h]);
    }

    if let Some(first) = vars.first() {
        lp.add_constraint(
            vec![(first.soc, 1.0)],
            Relation::Eq,
            scenario.soc_initial_kwh(),
        );
    }

    // soc[h] - soc[h-1] - eta_c * charge[h-1] + discharge[h-1] / eta_d == 0
    for pair in vars.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        lp.add_constraint(
            vec![
                (cur.soc, 1.0),
                (prev.soc, -1.0),
                (prev.charge, -bat.eta_charge),
                (prev.discharge, 1.0 / bat.eta_discharge),
            ],
            Relation::Eq,
            0.0,
        );
    }

    (lp, vars)
}

fn extract_result(
    scenario: &Scenario,
    vars: &[HourVars],
    solution: &LpSolution,
) -> DispatchResult {
    let hours: Vec<HourlyDispatch> = vars
        .iter()
        .enumerate()
        .map(|(h, v)| {
            let pv_kw = solution.value(v.pv);
            let battery_charge_kw = solution.value(v.charge);
            let battery_discharge_kw = solution.value(v.discharge);
            let grid_kw = solution.value(v.grid);
            let grid_price = scenario.cost_grid[h];
            HourlyDispatch {
                hour: h,
                load_kw: scenario.load_demand_kw[h],
                pv_forecast_kw: scenario.pv_forecast_kw[h],
                pv_kw,
                battery_charge_kw,
                battery_discharge_kw,
                battery_kw: battery_discharge_kw - battery_charge_kw,
                grid_kw,
                soc_kwh: solution.value(v.soc),
                grid_price,
                cost: scenario.cost_pv * pv_kw
                    + scenario.cost_battery * battery_discharge_kw
                    + grid_price * grid_kw,
            }
        })
        .collect();

    let total_cost = hours.iter().map(|h| h.cost).sum();
    DispatchResult { hours, total_cost }
}

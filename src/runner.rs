//! End-to-end planning: configuration in, solved plan with KPIs out.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, ScenarioConfig};
use crate::devices::ChargerEstimate;
use crate::dispatch::{
    DispatchOptimizer, DispatchResult, DispatchSummary, LpSolver, OptimizationError, Scenario,
};

/// Everything produced by one planning run.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Scenario the plan was solved for.
    pub scenario: Scenario,
    /// Hour-by-hour dispatch.
    pub result: DispatchResult,
    /// Aggregate KPIs.
    pub summary: DispatchSummary,
    /// Charger fleet estimate at the mean grid price.
    pub charger: ChargerEstimate,
}

/// Why a planning run failed.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The configuration failed validation.
    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
    /// The optimizer could not produce a plan.
    #[error(transparent)]
    Optimization(#[from] OptimizationError),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates `config`, solves its scenario with the default backend, and
/// derives the summary and charger estimate.
///
/// # Errors
///
/// Returns [`PlanError::Config`] with every validation problem, or
/// [`PlanError::Optimization`] if the solve fails.
pub fn run_plan(config: &ScenarioConfig) -> Result<Plan, PlanError> {
    run_plan_with(config, &DispatchOptimizer::new())
}

/// Same as [`run_plan`] with a caller-supplied optimizer.
///
/// # Errors
///
/// See [`run_plan`].
pub fn run_plan_with<S: LpSolver>(
    config: &ScenarioConfig,
    optimizer: &DispatchOptimizer<S>,
) -> Result<Plan, PlanError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(PlanError::Config(errors));
    }

    let scenario = config.to_scenario();
    let result = optimizer.solve(&scenario)?;
    let summary = DispatchSummary::from_result(
        &result,
        scenario.battery.capacity_kwh,
        config.tariff().threshold_hour(),
    );
    let charger = config.charger_estimate();
    info!(
        grid_kwh = summary.grid_energy_kwh,
        self_sufficiency_pct = summary.self_sufficiency_pct,
        "plan ready"
    );

    Ok(Plan {
        scenario,
        result,
        summary,
        charger,
    })
}

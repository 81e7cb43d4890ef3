//! API response and query types.
//!
//! Hourly field names match the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::devices::ChargerEstimate;
use crate::dispatch::{DispatchSummary, HourlyDispatch};
use crate::runner::Plan;

/// Full plan response: KPIs, charger estimate, and every hour.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Objective value of the plan.
    pub total_cost: f64,
    /// Aggregate KPIs.
    pub summary: DispatchSummary,
    /// Charger fleet estimate.
    pub charger: ChargerEstimate,
    /// Hourly dispatch rows.
    pub hours: Vec<HourlyDispatch>,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        Self {
            total_cost: plan.result.total_cost,
            summary: plan.summary.clone(),
            charger: plan.charger,
            hours: plan.result.hours.clone(),
        }
    }
}

/// Optional inclusive hour range for `GET /plan/hours`.
#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::runner::run_plan;

    #[test]
    fn plan_response_copies_plan() {
        let plan = run_plan(&ScenarioConfig::base()).expect("base preset should solve");
        let resp = PlanResponse::from(&plan);
        assert_eq!(resp.hours.len(), 24);
        assert_eq!(resp.total_cost, plan.result.total_cost);
        assert_eq!(resp.summary, plan.summary);
    }

    #[test]
    fn hourly_json_uses_export_column_names() {
        let plan = run_plan(&ScenarioConfig::base()).expect("base preset should solve");
        let json = serde_json::to_value(PlanResponse::from(&plan)).expect("serializable");
        let first = &json["hours"][0];
        for key in [
            "hour",
            "load_kw",
            "pv_forecast_kw",
            "pv_kw",
            "battery_charge_kw",
            "battery_discharge_kw",
            "battery_kw",
            "grid_kw",
            "soc_kwh",
            "grid_price",
            "cost",
        ] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
    }
}

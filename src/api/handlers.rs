//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, HoursQuery, PlanResponse};
use crate::config::ScenarioConfig;
use crate::dispatch::HourlyDispatch;
use crate::runner::run_plan;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Returns the startup plan.
///
/// `GET /plan` → 200 + `PlanResponse` JSON
pub async fn get_plan(State(state): State<Arc<AppState>>) -> Json<PlanResponse> {
    Json(PlanResponse::from(&state.plan))
}

/// Returns hourly rows, optionally filtered by hour range.
///
/// `GET /plan/hours` → 200 + `Vec<HourlyDispatch>` JSON
/// `GET /plan/hours?from=N&to=M` → filtered range (inclusive)
/// `GET /plan/hours?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_plan_hours(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HoursQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let hours: Vec<HourlyDispatch> = state
        .plan
        .result
        .hours
        .iter()
        .filter(|h| h.hour >= from && h.hour <= to)
        .cloned()
        .collect();

    Ok(Json(hours))
}

/// Returns the configuration the startup plan was solved from.
///
/// `GET /config` → 200 + `ScenarioConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ScenarioConfig> {
    Json(state.config.clone())
}

/// Solves a posted scenario configuration on a blocking worker.
///
/// `POST /solve` + `ScenarioConfig` JSON → 200 + `PlanResponse` JSON
/// Invalid configuration or failed optimization → 422 + `ErrorResponse`
pub async fn post_solve(Json(config): Json<ScenarioConfig>) -> impl IntoResponse {
    let outcome = tokio::task::spawn_blocking(move || run_plan(&config)).await;

    match outcome {
        Ok(Ok(plan)) => Ok(Json(PlanResponse::from(&plan))),
        Ok(Err(e)) => {
            warn!(%e, "posted scenario rejected");
            Err(error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        Err(e) => Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("solver task failed: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::runner::run_plan;

    fn make_test_state() -> Arc<AppState> {
        let config = ScenarioConfig::priced();
        let plan = run_plan(&config).expect("priced preset should solve");
        Arc::new(AppState { config, plan })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn plan_returns_200() {
        let app = router(make_test_state());

        let req = Request::builder().uri("/plan").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json.get("summary").is_some());
        assert!(json.get("charger").is_some());
        assert_eq!(json["hours"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn hours_range_query() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/plan/hours?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let rows = json.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 6); // hours 5..=10
        assert_eq!(rows[0]["hour"], 5);
        assert_eq!(rows[5]["hour"], 10);
    }

    #[tokio::test]
    async fn hours_invalid_range_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/plan/hours?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn config_round_trips_into_solve() {
        let state = make_test_state();
        let app = router(Arc::clone(&state));

        let req = Request::builder().uri("/config").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let config: ScenarioConfig = serde_json::from_slice(&body).unwrap();
        assert_eq!(config, state.config);

        let resolved = run_plan(&config).expect("served config should solve");
        assert!((resolved.result.total_cost - state.plan.result.total_cost).abs() < 1e-6);
    }

    #[tokio::test]
    async fn solve_valid_config_returns_plan() {
        let app = router(make_test_state());

        let body = serde_json::to_vec(&ScenarioConfig::base()).unwrap();
        let req = Request::builder()
            .method("POST")
            .uri("/solve")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["hours"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn solve_invalid_config_returns_422() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/solve")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"battery":{"eta_charge":0.0}}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap_or_default()
                .contains("battery.eta_charge")
        );
    }
}

//! REST API for the solved plan and on-demand solves.
//!
//! Endpoints:
//! - `GET /plan` returns summary, charger estimate, and every hour
//! - `GET /plan/hours` returns hourly rows with optional range filtering
//! - `GET /config` returns the configuration the startup plan came from
//! - `POST /solve` solves a posted `ScenarioConfig` and returns its plan

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::runner::Plan;

pub use types::{ErrorResponse, HoursQuery, PlanResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the startup plan is solved and wrapped in `Arc`.
pub struct AppState {
    /// Configuration the startup plan was solved from.
    pub config: ScenarioConfig,
    /// Startup plan served by the GET endpoints.
    pub plan: Plan,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plan", get(handlers::get_plan))
        .route("/plan/hours", get(handlers::get_plan_hours))
        .route("/config", get(handlers::get_config))
        .route("/solve", post(handlers::post_solve))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}

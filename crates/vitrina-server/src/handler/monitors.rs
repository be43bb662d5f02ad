//! Store health monitoring handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handler::response::HealthResponse;
use crate::service::{HealthService, ServiceState};

/// Tracing target for monitor handlers.
const TRACING_TARGET: &str = "vitrina_server::handler::monitors";

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Get store health status",
    responses(
        (status = 200, description = "Both stores are reachable", body = HealthResponse),
        (status = 503, description = "A backing store is unreachable", body = HealthResponse),
    ),
)]
async fn health_status(
    State(health_service): State<HealthService>,
) -> (StatusCode, Json<HealthResponse>) {
    let is_healthy = health_service.is_healthy().await;

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy,
        status_code = status_code.as_u16(),
        "Health status checked"
    );

    let response = HealthResponse {
        is_healthy,
        checked_at: jiff::Timestamp::now(),
    };

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(health_status))
}

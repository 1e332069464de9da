use axum::{extract::State, http::StatusCode, Json};
use service::health::{self, HealthReport, PING_TIMEOUT};

use crate::state::ServerState;

#[utoipa::path(
    get, path = "/healthcheck", tag = "health",
    responses(
        (status = 200, description = "Datastore reachable", body = crate::openapi::HealthReportDoc),
        (status = 500, description = "Datastore unreachable", body = crate::openapi::HealthReportDoc)
    )
)]
pub async fn healthcheck(State(state): State<ServerState>) -> (StatusCode, Json<HealthReport>) {
    let report = health::check(state.registry.repository().as_ref(), PING_TIMEOUT).await;
    let status = StatusCode::from_u16(report.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(report))
}

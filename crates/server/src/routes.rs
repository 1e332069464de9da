use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::observability;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod health;
pub mod services;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: registry API, health probes, metrics and docs
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1/services", get(services::list).post(services::create))
        .route(
            "/api/v1/services/:name",
            get(services::fetch_by_name).patch(services::create_version).delete(services::delete),
        )
        .route(
            "/api/v1/services/:name/:version",
            get(services::fetch_version).patch(services::update_version),
        );

    let probes = Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route("/liveness", get(health::healthcheck))
        .route("/readiness", get(health::healthcheck));

    let ops = Router::new()
        .route("/metrics", get(observability::metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    api.merge(probes)
        .with_state(state)
        .merge(ops)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

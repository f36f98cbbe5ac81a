use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use service::ranking::RankingService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::observability;

pub mod ranking;

#[derive(Clone)]
pub struct ServerState {
    pub ranking: Arc<RankingService>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    observability::encode_metrics()
}

/// Browsers opening the game page from `file://` send `Origin: null`; mirroring
/// the origin with credentials allowed covers that case.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // register counters so /metrics lists them from the start
    observability::init_metrics();

    // Ranking routes
    let ranking_routes = Router::new()
        .route("/add_score", post(ranking::add_score))
        .route("/get_ranking", get(ranking::get_ranking));

    // Ops routes (health + metrics)
    let ops_routes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // Compose
    ranking_routes
        .merge(ops_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, method and path at INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // request arrival
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency on response
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and the like at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

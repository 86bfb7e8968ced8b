pub mod api;
pub mod sse;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Cached external listing
        .route("/api/pods", get(api::handle_cached_listing))
        // Liveness probe only; cluster health lives under /api/v1
        .route("/api/health", get(api::handle_health))
        // Published telemetry
        .route("/api/v1/pods", get(api::handle_list_pods))
        .route("/api/v1/pods/stream", get(sse::handle_pod_stream))
        .route("/api/v1/nodes", get(api::handle_list_nodes))
        .route("/api/v1/events", get(api::handle_list_events))
        .route("/api/v1/cluster/health", get(api::handle_cluster_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::events::Event;
use crate::health::{self, ClusterHealth};
use crate::models::entities::{ContainerSummary, NodeView, Pod, node_views};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedListing {
    pub ok: bool,
    pub data: Arc<Vec<ContainerSummary>>,
    pub cached_at: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodListResponse {
    pub ok: bool,
    pub items: Arc<Vec<Pod>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeListResponse {
    pub ok: bool,
    pub items: Vec<NodeView>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Serves the listing snapshot through the TTL cache, reporting when it was
/// fetched so clients can show staleness.
pub async fn handle_cached_listing(State(state): State<AppState>) -> Response {
    match state.cache.get().await {
        Ok((data, cached_at)) => Json(CachedListing {
            ok: true,
            data,
            cached_at: cached_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                ok: false,
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn handle_health() -> Json<Liveness> {
    Json(Liveness { ok: true })
}

pub async fn handle_list_pods(State(state): State<AppState>) -> Json<PodListResponse> {
    let published = state.pods.borrow().clone();
    Json(PodListResponse {
        ok: published.ok,
        items: published.entities,
        updated_at: published.updated_at,
    })
}

pub async fn handle_list_nodes(State(state): State<AppState>) -> Json<NodeListResponse> {
    let nodes = state.nodes.borrow().clone();
    let pods = state.pods.borrow().clone();
    Json(NodeListResponse {
        ok: nodes.ok,
        items: node_views(&nodes.entities, &pods.entities),
        updated_at: nodes.updated_at,
    })
}

pub async fn handle_list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.events.snapshot())
}

pub async fn handle_cluster_health(State(state): State<AppState>) -> Json<ClusterHealth> {
    let pods = state.pods.borrow().clone();
    let nodes = state.nodes.borrow().clone();
    Json(health::classify(&pods.entities, &nodes.entities))
}

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::helpers;
use crate::models::entities::{ContainerSummary, Node, Pod};
use crate::models::telemetry::{ContainerRecord, ListingRecord, NodeRecord};

/// Filter applied before mapping: only records tagged as container-info
/// telemetry with a present payload are considered. Non-matching records are
/// silently excluded, never an error.
pub fn is_container_info(record: &ContainerRecord) -> bool {
    record.component == "container"
        && record.metric_type == "ContainerInfo"
        && record.info().is_some()
}

// The stats fields show up as JSON numbers or numeric strings depending on
// the agent version.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Maps one filtered telemetry record to a Pod. Total: missing sub-fields
/// become empty strings or zero, so a batch of N records yields N pods.
pub fn map_container_record(record: &ContainerRecord, idx: usize, now: DateTime<Utc>) -> Pod {
    let info = record.info();
    let state = info.and_then(|i| i.state.as_ref());
    let stats = info.and_then(|i| i.stats.as_ref());

    let name = info
        .and_then(|i| i.names.first())
        .filter(|n| !n.is_empty())
        .cloned()
        .or_else(|| info.and_then(|i| non_empty(i.id.clone())))
        .unwrap_or_else(|| format!("pod-{idx}"));

    let node = state
        .and_then(|s| s.node_name.clone().or_else(|| s.hostname.clone()))
        .or_else(|| {
            info.and_then(|i| i.config.as_ref())
                .and_then(|c| c.hostname.clone())
        })
        .unwrap_or_default();

    let status = state
        .and_then(|s| s.status.clone().or_else(|| s.status_titled.clone()))
        .unwrap_or_default();

    // StartedAt wins when it parses; otherwise the record's raw timestamp
    // string is passed through verbatim.
    let age = state
        .and_then(|s| s.started_at.as_deref())
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|started| helpers::format_age(started.to_utc(), now))
        .or_else(|| record.timestamp.clone())
        .unwrap_or_default();

    let cpu_usage = numeric(stats.and_then(|s| s.cpu_total_usage.as_ref()))
        .map(helpers::format_cpu)
        .unwrap_or_default();

    let memory_usage = numeric(stats.and_then(|s| s.memory_usage.as_ref()))
        .map(helpers::format_memory)
        .unwrap_or_default();

    Pod {
        name,
        image: info.map(|i| i.image.clone()).unwrap_or_default(),
        labels: record.labels.clone(),
        node,
        status,
        cpu_usage,
        memory_usage,
        age,
        ready: String::new(),
        restarts: 0,
        ip: record.labels.get("ip").cloned().unwrap_or_default(),
    }
}

fn round_pct(v: f64) -> f64 {
    ((v * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

/// Maps one node record to a Node. Status is always the "Ready" sentinel;
/// the pod count is intentionally absent (see `entities::node_views`).
pub fn map_node_record(record: &NodeRecord) -> Node {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    let used_cores = record.cpu_usage / 100.0 * record.cpu_count as f64;

    Node {
        name: record.node_name.clone(),
        status: "Ready".to_string(),
        cpu: format!("{:.1}/{}", used_cores, record.cpu_count),
        memory: format!(
            "{:.1}/{:.1}",
            record.used_memory / GIB,
            record.total_memory / GIB
        ),
        cpu_usage: round_pct(record.cpu_usage),
        memory_usage: round_pct(record.mem_usage),
        storage_usage: 0.0,
    }
}

/// Maps one row of the listing command's output to the summary DTO.
pub fn map_listing_record(record: &ListingRecord) -> ContainerSummary {
    let name = match &record.names {
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    };

    ContainerSummary {
        id: record.id.clone(),
        name,
        image: record
            .image
            .clone()
            .and_then(non_empty)
            .or_else(|| record.image_name.clone())
            .unwrap_or_default(),
        status: record.status.clone().unwrap_or_default(),
        state: record.state.clone().unwrap_or_default(),
        created_at: record.created_at.clone().unwrap_or_default(),
        ports: record.ports.clone(),
        command: record.command.clone(),
        labels: record.labels.clone(),
    }
}

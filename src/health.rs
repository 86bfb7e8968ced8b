use serde::Serialize;

use crate::models::entities::{Node, Pod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterHealth {
    pub status: HealthStatus,
    pub running_pods: usize,
    pub pending_pods: usize,
    pub failed_pods: usize,
    pub total_pods: usize,
    pub running_pod_percentage: f64,
    pub healthy_node_count: usize,
    pub total_node_count: usize,
    pub node_health_percentage: f64,
}

/// Three-level verdict over the current collections. Critical is checked
/// first and short-circuits Warning; an empty cluster counts as fully
/// running and fully healthy.
pub fn classify(pods: &[Pod], nodes: &[Node]) -> ClusterHealth {
    let total_pods = pods.len();
    let running_pods = pods.iter().filter(|p| p.status == "Running").count();
    let pending_pods = pods.iter().filter(|p| p.status == "Pending").count();
    let failed_pods = pods.iter().filter(|p| p.status == "Failed").count();

    let running_pod_percentage = if total_pods > 0 {
        running_pods as f64 / total_pods as f64 * 100.0
    } else {
        100.0
    };

    let healthy_node_count = nodes.iter().filter(|n| n.status == "Ready").count();
    let total_node_count = nodes.len();
    let node_health_percentage = if total_node_count > 0 {
        healthy_node_count as f64 / total_node_count as f64 * 100.0
    } else {
        100.0
    };

    let status = if failed_pods as f64 > total_pods as f64 * 0.2 || node_health_percentage < 100.0 {
        HealthStatus::Critical
    } else if pending_pods as f64 > total_pods as f64 * 0.1 || running_pod_percentage < 90.0 {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    };

    ClusterHealth {
        status,
        running_pods,
        pending_pods,
        failed_pods,
        total_pods,
        running_pod_percentage,
        healthy_node_count,
        total_node_count,
        node_health_percentage,
    }
}

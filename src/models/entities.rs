use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

// Normalized entities. Everything here is rebuilt wholesale on each poll
// tick; there is no per-field patching across ticks.

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    pub image: String,
    pub labels: HashMap<String, String>,
    pub node: String,
    pub status: String,
    pub cpu_usage: String,
    pub memory_usage: String,
    pub age: String,
    pub ready: String,
    pub restarts: u32,
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub status: String,
    pub cpu: String,
    pub memory: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub storage_usage: f64,
}

/// A node plus its pod count. The count is recomputed from the current pod
/// collection whenever a view is assembled, never stored on the entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    #[serde(flatten)]
    pub node: Node,
    pub pods: usize,
}

pub fn node_views(nodes: &[Node], pods: &[Pod]) -> Vec<NodeView> {
    nodes
        .iter()
        .map(|node| NodeView {
            pods: pods.iter().filter(|p| p.node == node.name).count(),
            node: node.clone(),
        })
        .collect()
}

/// One full replacement collection per poll tick. Readers get a shared
/// immutable snapshot; `ok` is false after any failed tick (fail-empty).
#[derive(Debug, Clone)]
pub struct PublishedSet<T> {
    pub entities: Arc<Vec<T>>,
    pub ok: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for PublishedSet<T> {
    fn default() -> Self {
        Self {
            entities: Arc::new(Vec::new()),
            ok: false,
            updated_at: None,
        }
    }
}

/// DTO for one row of the external container listing, as served by the
/// cached listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub state: String,
    pub created_at: String,
    pub ports: serde_json::Value,
    pub command: serde_json::Value,
    pub labels: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod_on(node: &str) -> Pod {
        Pod {
            node: node.to_string(),
            ..Default::default()
        }
    }

    fn node_named(name: &str) -> Node {
        Node {
            name: name.to_string(),
            status: "Ready".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn node_views_recompute_pod_counts() {
        let pods = vec![pod_on("n1"), pod_on("n1"), pod_on("n2"), pod_on("")];
        let nodes = vec![node_named("n1"), node_named("n2"), node_named("n3")];

        let views = node_views(&nodes, &pods);
        assert_eq!(views[0].pods, 2);
        assert_eq!(views[1].pods, 1);
        assert_eq!(views[2].pods, 0);
    }

    #[test]
    fn node_view_serializes_flat() {
        let view = NodeView {
            node: node_named("n1"),
            pods: 3,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "n1");
        assert_eq!(json["pods"], 3);
        assert_eq!(json["cpuUsage"], 0.0);
        assert_eq!(json["storageUsage"], 0.0);
    }

    #[test]
    fn pod_serializes_camel_case() {
        let pod = Pod {
            name: "web-1".to_string(),
            memory_usage: "2.00 MB".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&pod).unwrap();
        assert_eq!(json["memoryUsage"], "2.00 MB");
        assert_eq!(json["restarts"], 0);
        assert_eq!(json["ready"], "");
    }
}

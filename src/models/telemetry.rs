use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

// Raw wire records. The telemetry is loosely typed, so every field defaults
// and the numeric stats are kept as Value until the mapper coerces them.

// --- Container metrics ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerRecord {
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub metric_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub value: Option<MetricEnvelope>,
}

impl ContainerRecord {
    /// The nested payload, present only on well-formed container-info records.
    pub fn info(&self) -> Option<&ContainerInfo> {
        self.value.as_ref().and_then(|v| v.value.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricEnvelope {
    #[serde(default)]
    pub value: Option<ContainerInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub state: Option<ContainerStateInfo>,
    #[serde(default)]
    pub stats: Option<ContainerStats>,
    #[serde(default)]
    pub config: Option<ContainerConfig>,
}

// Both "status" and "Status" occur in the wild depending on the agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStateInfo {
    #[serde(default, rename = "StartedAt")]
    pub started_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "Status")]
    pub status_titled: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStats {
    #[serde(default, rename = "CpuTotalUsage")]
    pub cpu_total_usage: Option<Value>,
    #[serde(default, rename = "MemoryUsage")]
    pub memory_usage: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerConfig {
    #[serde(default, rename = "Hostname")]
    pub hostname: Option<String>,
}

// --- Node metrics ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub cpu_count: u32,
    #[serde(default)]
    pub mem_usage: f64,
    #[serde(default)]
    pub used_memory: f64,
    #[serde(default)]
    pub total_memory: f64,
}

// --- Container listing ---

/// One row of the external listing command's JSON output. `names` may be an
/// array of aliases or a single string; `ports`/`command`/`labels` pass
/// through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingRecord {
    #[serde(default, rename = "Id")]
    pub id: String,
    #[serde(default, rename = "Names")]
    pub names: Value,
    #[serde(default, rename = "Image")]
    pub image: Option<String>,
    #[serde(default, rename = "ImageName")]
    pub image_name: Option<String>,
    #[serde(default, rename = "Status")]
    pub status: Option<String>,
    #[serde(default, rename = "State")]
    pub state: Option<String>,
    #[serde(default, rename = "CreatedAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "Ports")]
    pub ports: Value,
    #[serde(default, rename = "Command")]
    pub command: Value,
    #[serde(default, rename = "Labels")]
    pub labels: Value,
}

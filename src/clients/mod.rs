use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::process::Command;

use crate::cache::ListingSource;
use crate::error::FetchError;
use crate::mapper;
use crate::models::entities::ContainerSummary;
use crate::models::telemetry::{ContainerRecord, ListingRecord, NodeRecord};

/// HTTP client for the metrics service.
pub struct MetricsClient {
    base_url: String,
    http: reqwest::Client,
}

impl MetricsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub async fn container_metrics(&self) -> Result<Vec<ContainerRecord>, FetchError> {
        self.get_json("/api/v1/metrics").await
    }

    pub async fn node_metrics(&self) -> Result<Vec<NodeRecord>, FetchError> {
        self.get_json("/api/v1/metrics/nodes").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::unavailable)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::SourceUnavailable(format!(
                "GET {} returned {}",
                path, status
            )));
        }

        let body = resp.text().await.map_err(FetchError::unavailable)?;
        serde_json::from_str(&body).map_err(FetchError::decode)
    }
}

/// Runs the configured container-listing command and maps its JSON output.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ListingSource for CommandSource {
    async fn list(&self) -> Result<Vec<ContainerSummary>, FetchError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| FetchError::unavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::SourceUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let raw: Vec<ListingRecord> =
            serde_json::from_slice(&output.stdout).map_err(FetchError::decode)?;
        Ok(raw.iter().map(mapper::map_listing_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn command_source_maps_listing_output() {
        let source = CommandSource::new(
            "echo",
            vec![r#"[{"Id":"a1","Names":["web"],"Image":"nginx:1.27","State":"running"}]"#.into()],
        );

        let rows = source.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a1");
        assert_eq!(rows[0].name, "web");
        assert_eq!(rows[0].image, "nginx:1.27");
    }

    #[tokio::test]
    async fn command_failure_is_source_unavailable() {
        let source = CommandSource::new("false", Vec::new());
        let err = source.list().await.unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_program_is_source_unavailable() {
        let source = CommandSource::new("definitely-not-a-real-binary", Vec::new());
        let err = source.list().await.unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn non_json_output_is_a_decode_error() {
        let source = CommandSource::new("echo", vec!["not json".into()]);
        let err = source.list().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}

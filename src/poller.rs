use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::clients::MetricsClient;
use crate::error::FetchError;
use crate::events::{Event, EventLog, EventResource};
use crate::mapper;
use crate::models::entities::{Node, Pod, PublishedSet};

/// One kind of polled telemetry: how to fetch a batch and which entity it
/// yields. Pod and node polling differ only in this, so they share a single
/// poller implementation.
pub trait TelemetrySource: Send + Sync + 'static {
    type Entity: Clone + Send + Sync + 'static;

    fn resource(&self) -> EventResource;

    fn fetch(&self) -> impl Future<Output = Result<Vec<Self::Entity>, FetchError>> + Send;
}

pub struct PodMetricsSource {
    client: Arc<MetricsClient>,
}

impl PodMetricsSource {
    pub fn new(client: Arc<MetricsClient>) -> Self {
        Self { client }
    }
}

impl TelemetrySource for PodMetricsSource {
    type Entity = Pod;

    fn resource(&self) -> EventResource {
        EventResource::Pod
    }

    async fn fetch(&self) -> Result<Vec<Pod>, FetchError> {
        let batch = self.client.container_metrics().await?;
        let now = Utc::now();
        Ok(batch
            .iter()
            .filter(|r| mapper::is_container_info(r))
            .enumerate()
            .map(|(idx, r)| mapper::map_container_record(r, idx, now))
            .collect())
    }
}

pub struct NodeMetricsSource {
    client: Arc<MetricsClient>,
}

impl NodeMetricsSource {
    pub fn new(client: Arc<MetricsClient>) -> Self {
        Self { client }
    }
}

impl TelemetrySource for NodeMetricsSource {
    type Entity = Node;

    fn resource(&self) -> EventResource {
        EventResource::Node
    }

    async fn fetch(&self) -> Result<Vec<Node>, FetchError> {
        let batch = self.client.node_metrics().await?;
        Ok(batch.iter().map(mapper::map_node_record).collect())
    }
}

/// Interval poller for one telemetry kind. Each tick replaces the published
/// collection wholesale; on any failure the replacement is empty rather than
/// stale (fail-empty).
pub struct Poller<S: TelemetrySource> {
    source: S,
    publisher: watch::Sender<PublishedSet<S::Entity>>,
    events: Arc<EventLog>,
    interval: Duration,
    fetch_timeout: Duration,
}

impl<S: TelemetrySource> Poller<S> {
    pub fn new(
        source: S,
        publisher: watch::Sender<PublishedSet<S::Entity>>,
        events: Arc<EventLog>,
        interval: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            publisher,
            events,
            interval,
            fetch_timeout,
        }
    }

    /// Polls once immediately, then on every interval tick until the
    /// shutdown channel fires. Ticks never overlap: each poll fully resolves
    /// before the next is dispatched, and a missed tick delays instead of
    /// bursting.
    pub async fn run(self, mut shutdown: watch::Receiver<()>) {
        self.poll_once().await;

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // consume the immediate tick

        loop {
            tokio::select! {
                _ = interval.tick() => self.poll_once().await,
                _ = shutdown.changed() => {
                    info!("{} poller shutting down", self.source.resource().plural());
                    return;
                }
            }
        }
    }

    /// One fetch-map-publish cycle.
    pub async fn poll_once(&self) {
        let resource = self.source.resource();

        let outcome = match time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(Ok(entities)) if !entities.is_empty() => Ok(entities),
            Ok(Ok(_)) => Err(FetchError::EmptyBatch),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::SourceUnavailable(format!(
                "fetch timed out after {:?}",
                self.fetch_timeout
            ))),
        };

        match outcome {
            Ok(entities) => {
                info!(count = entities.len(), "{} fetch succeeded", resource.plural());
                self.publisher.send_replace(PublishedSet {
                    entities: Arc::new(entities),
                    ok: true,
                    updated_at: Some(Utc::now()),
                });
                self.events.append(Event::fetch_success(resource));
            }
            Err(err) => {
                match &err {
                    FetchError::EmptyBatch => {
                        warn!("{} fetch returned no matching records", resource.plural())
                    }
                    err => warn!("{} fetch failed: {}", resource.plural(), err),
                }
                self.publisher.send_replace(PublishedSet {
                    entities: Arc::new(Vec::new()),
                    ok: false,
                    updated_at: Some(Utc::now()),
                });
                self.events.append(Event::fetch_failure(resource));
            }
        }
    }
}

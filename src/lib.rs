pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod helpers;
pub mod mapper;
pub mod models;
pub mod poller;
pub mod routes;

use std::sync::Arc;

use tokio::sync::watch;

use cache::SnapshotCache;
use clients::CommandSource;
use events::EventLog;
use models::entities::{Node, Pod, PublishedSet};

/// Shared handles for the HTTP layer: the listing cache, the event log, and
/// read sides of the two poller publish channels.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache<CommandSource>>,
    pub events: Arc<EventLog>,
    pub pods: watch::Receiver<PublishedSet<Pod>>,
    pub nodes: watch::Receiver<PublishedSet<Node>>,
}

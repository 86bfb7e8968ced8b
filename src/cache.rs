use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::error::FetchError;
use crate::models::entities::ContainerSummary;

/// A listing backend the cache can refresh from.
pub trait ListingSource: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<ContainerSummary>, FetchError>> + Send;
}

struct CacheEntry {
    data: Arc<Vec<ContainerSummary>>,
    fetched: Instant,
    cached_at: DateTime<Utc>,
}

/// Shields the slow external listing call behind a short TTL. One instance
/// per process, owned state, no globals.
pub struct SnapshotCache<S> {
    source: S,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl<S: ListingSource> SnapshotCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Returns the cached snapshot and its wall-clock fetch time, refreshing
    /// from the source first when the entry is missing or has aged past the
    /// TTL. The refresh runs while holding the entry lock, so callers racing
    /// a stale cache coalesce into a single underlying call; waiters re-check
    /// freshness once they acquire the lock and serve the new entry.
    pub async fn get(&self) -> Result<(Arc<Vec<ContainerSummary>>, DateTime<Utc>), FetchError> {
        let mut entry = self.entry.lock().await;

        if let Some(e) = entry.as_ref() {
            if e.fetched.elapsed() < self.ttl {
                return Ok((e.data.clone(), e.cached_at));
            }
        }

        match self.source.list().await {
            Ok(rows) => {
                let data = Arc::new(rows);
                let cached_at = Utc::now();
                *entry = Some(CacheEntry {
                    data: data.clone(),
                    fetched: Instant::now(),
                    cached_at,
                });
                debug!(rows = data.len(), "listing cache refreshed");
                Ok((data, cached_at))
            }
            Err(e) => {
                // A failed refresh never leaves a previous value in service.
                *entry = None;
                Err(e)
            }
        }
    }
}

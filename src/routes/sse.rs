use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::StreamExt;
use futures_util::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;

use crate::AppState;

/// Streams the published pod collection to the browser: the current state on
/// connect, then one event per poll publish.
pub async fn handle_pod_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.pods.clone()).map(|published| {
        let data = serde_json::to_string(published.entities.as_ref()).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().event("pod-list").data(data))
    });

    Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(15)))
}

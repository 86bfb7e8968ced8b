use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::watch;
use tower::ServiceExt;

use podwatch_console::AppState;
use podwatch_console::cache::SnapshotCache;
use podwatch_console::clients::CommandSource;
use podwatch_console::events::{Event, EventLog, EventResource};
use podwatch_console::models::entities::{Node, Pod, PublishedSet};
use podwatch_console::routes;

struct Fixture {
    router: Router,
    pods_tx: watch::Sender<PublishedSet<Pod>>,
    nodes_tx: watch::Sender<PublishedSet<Node>>,
    events: Arc<EventLog>,
}

fn fixture_with_listing(program: &str, args: &[&str]) -> Fixture {
    let cache = Arc::new(SnapshotCache::new(
        CommandSource::new(program, args.iter().map(|a| a.to_string()).collect()),
        Duration::from_millis(3000),
    ));
    let events = Arc::new(EventLog::new(16));
    let (pods_tx, pods_rx) = watch::channel(PublishedSet::default());
    let (nodes_tx, nodes_rx) = watch::channel(PublishedSet::default());

    let router = routes::build_router(AppState {
        cache,
        events: events.clone(),
        pods: pods_rx,
        nodes: nodes_rx,
    });

    Fixture {
        router,
        pods_tx,
        nodes_tx,
        events,
    }
}

fn fixture() -> Fixture {
    fixture_with_listing("echo", &["[]"])
}

async fn get_json(router: Router, path: &str) -> (StatusCode, serde_json::Value) {
    let resp = router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn pod(name: &str, node: &str, status: &str) -> Pod {
    Pod {
        name: name.to_string(),
        node: node.to_string(),
        status: status.to_string(),
        ..Default::default()
    }
}

fn ready_node(name: &str) -> Node {
    Node {
        name: name.to_string(),
        status: "Ready".to_string(),
        ..Default::default()
    }
}

fn published<T>(entities: Vec<T>) -> PublishedSet<T> {
    PublishedSet {
        entities: Arc::new(entities),
        ok: true,
        updated_at: Some(chrono::Utc::now()),
    }
}

#[tokio::test]
async fn health_endpoint_is_a_plain_liveness_probe() {
    let (status, body) = get_json(fixture().router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn cached_listing_reports_data_and_timestamp() {
    let f = fixture_with_listing(
        "echo",
        &[r#"[{"Id":"a1","Names":["web"],"Image":"nginx:1.27","State":"running"}]"#],
    );

    let (status, body) = get_json(f.router, "/api/pods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"][0]["id"], "a1");
    assert_eq!(body["data"][0]["name"], "web");
    assert_eq!(body["data"][0]["image"], "nginx:1.27");
    assert!(body["cachedAt"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn cached_listing_failure_is_a_500_with_error_body() {
    let f = fixture_with_listing("false", &[]);

    let (status, body) = get_json(f.router, "/api/pods").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn pods_endpoint_serves_the_published_collection() {
    let f = fixture();
    f.pods_tx
        .send(published(vec![pod("web-1", "n1", "Running")]))
        .unwrap();

    let (status, body) = get_json(f.router, "/api/v1/pods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["items"][0]["name"], "web-1");
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn pods_endpoint_reflects_fail_empty_publishes() {
    let f = fixture();
    f.pods_tx.send(PublishedSet::default()).unwrap();

    let (_, body) = get_json(f.router, "/api/v1/pods").await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert!(body["updatedAt"].is_null());
}

#[tokio::test]
async fn nodes_endpoint_recomputes_pod_counts() {
    let f = fixture();
    f.pods_tx
        .send(published(vec![
            pod("a", "n1", "Running"),
            pod("b", "n1", "Running"),
            pod("c", "n2", "Running"),
        ]))
        .unwrap();
    f.nodes_tx
        .send(published(vec![ready_node("n1"), ready_node("n2")]))
        .unwrap();

    let (status, body) = get_json(f.router, "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "n1");
    assert_eq!(body["items"][0]["pods"], 2);
    assert_eq!(body["items"][1]["pods"], 1);
    assert_eq!(body["items"][0]["status"], "Ready");
}

#[tokio::test]
async fn events_endpoint_serves_the_log_most_recent_first() {
    let f = fixture();
    f.events.append(Event::fetch_failure(EventResource::Pod));
    f.events.append(Event::fetch_success(EventResource::Pod));

    let (status, body) = get_json(f.router, "/api/v1/events").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "Fetched");
    assert_eq!(items[0]["status"], "success");
    assert_eq!(items[1]["status"], "error");
}

#[tokio::test]
async fn cluster_health_classifies_the_published_state() {
    let f = fixture();
    f.pods_tx
        .send(published(vec![
            pod("a", "n1", "Failed"),
            pod("b", "n1", "Running"),
            pod("c", "n1", "Running"),
            pod("d", "n1", "Running"),
            pod("e", "n1", "Running"),
        ]))
        .unwrap();
    f.nodes_tx.send(published(vec![ready_node("n1")])).unwrap();

    let (status, body) = get_json(f.router, "/api/v1/cluster/health").await;
    assert_eq!(status, StatusCode::OK);
    // 20% failed is on the strict boundary: not Critical, but the running
    // share of 80% puts it in Warning.
    assert_eq!(body["status"], "Warning");
    assert_eq!(body["failedPods"], 1);
    assert_eq!(body["totalPods"], 5);
    assert_eq!(body["nodeHealthPercentage"], 100.0);
}

#[tokio::test]
async fn empty_state_classifies_healthy() {
    let (status, body) = get_json(fixture().router, "/api/v1/cluster/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Healthy");
    assert_eq!(body["runningPodPercentage"], 100.0);
}

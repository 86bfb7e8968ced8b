use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use podwatch_console::AppState;
use podwatch_console::cache::SnapshotCache;
use podwatch_console::clients::{CommandSource, MetricsClient};
use podwatch_console::config::Config;
use podwatch_console::events::EventLog;
use podwatch_console::models::entities::PublishedSet;
use podwatch_console::poller::{NodeMetricsSource, PodMetricsSource, Poller};
use podwatch_console::routes;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podwatch_console=info".parse().unwrap()),
        )
        .init();

    let cfg = Config::from_env().unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let (program, args) = cfg.listing_command_parts();
    let cache = Arc::new(SnapshotCache::new(
        CommandSource::new(program, args.to_vec()),
        cfg.cache_ttl,
    ));
    let events = Arc::new(EventLog::new(cfg.event_capacity));

    let (pods_tx, pods_rx) = watch::channel(PublishedSet::default());
    let (nodes_tx, nodes_rx) = watch::channel(PublishedSet::default());

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    match cfg.metrics_url.as_deref() {
        Some(url) => {
            let client = Arc::new(MetricsClient::new(url, cfg.fetch_timeout));

            let pod_poller = Poller::new(
                PodMetricsSource::new(client.clone()),
                pods_tx,
                events.clone(),
                cfg.poll_interval,
                cfg.fetch_timeout,
            );
            tokio::spawn(pod_poller.run(shutdown_rx.clone()));

            let node_poller = Poller::new(
                NodeMetricsSource::new(client),
                nodes_tx,
                events.clone(),
                cfg.poll_interval,
                cfg.fetch_timeout,
            );
            tokio::spawn(node_poller.run(shutdown_rx.clone()));
        }
        None => {
            warn!("METRICS_URL not set, telemetry polling disabled");
        }
    }

    let state = AppState {
        cache,
        events,
        pods: pods_rx,
        nodes: nodes_rx,
    };

    let router = routes::build_router(state);

    let listen_addr = cfg.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!("podwatch-console listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(());
        })
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

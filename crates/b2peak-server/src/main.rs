//! `B2Peak` server entry point.
//!
//! Wires the fixture collaborators into the shared state, then starts the
//! Axum HTTP server with graceful shutdown. A background sweeper evicts idle
//! client sessions and is cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use b2peak_server::app::build_router;
use b2peak_server::config::ServerConfig;
use b2peak_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        login_latency_ms = config.login_latency.as_millis(),
        verify_latency_ms = config.verify_latency.as_millis(),
        "B2Peak starting"
    );

    let state = Arc::new(AppState::from_config(config.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = {
        let state = Arc::clone(&state);
        let mut rx = shutdown_rx.clone();
        let interval_secs = config.session_scan_interval_secs;
        let max_idle = config.session_idle_timeout;
        tokio::spawn(async move {
            session_sweeper(state, &mut rx, interval_secs, max_idle).await;
        })
    };

    let app = build_router(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "B2Peak server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(10), sweeper_handle).await;

    info!("B2Peak server stopped");
    Ok(())
}

/// Periodically evict client sessions idle for longer than `max_idle`.
///
/// Eviction drops the session, which aborts its in-flight login and
/// verification tasks.
async fn session_sweeper(
    state: Arc<AppState>,
    shutdown: &mut watch::Receiver<bool>,
    interval_secs: u64,
    max_idle: Duration,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, max_idle_secs = max_idle.as_secs(), "session sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                state.sessions.sweep_idle(max_idle).await;
            }
            _ = shutdown.changed() => {
                info!("session sweeper shutting down");
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM, then notify background workers.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}

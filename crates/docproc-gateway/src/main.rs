//! docproc gateway
//!
//! HTTP front-end of the document processor:
//! - Config from env (PORT, LOG_LEVEL, MAX_FILE_SIZE, WORKERS)
//! - JSON access log, panic recovery, 30 s handler bound, Prometheus metrics
//! - Graceful shutdown on SIGTERM / Ctrl-C

use std::net::SocketAddr;

use docproc_gateway::{app_state, config, obs, router};

#[tokio::main]
async fn main() {
    let cfg = config::Config::load();
    obs::logging::init(&cfg.log_level);

    let listen: SocketAddr = cfg
        .listen_addr()
        .parse()
        .expect("PORT must form a valid listen address");

    tracing::info!(
        %listen,
        max_file_size = cfg.max_file_size,
        workers = cfg.workers,
        "docproc-gateway starting"
    );

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server failed");

    tracing::info!("docproc-gateway stopped");
}

/// Resolves on SIGTERM (Kubernetes) or Ctrl-C (local dev).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }

    tracing::info!("shutdown signal received, draining connections");
}

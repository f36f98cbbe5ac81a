use std::future::Future;

use axum::Router;
use configs::AppConfig;
use service::ranking::RankingService;
use tracing::{info, warn};

use crate::routes::{self, ServerState};

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, shutdown_signal()).await
}

/// Build the app and serve until `shutdown` resolves.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // 1. Data directory for the ranking file:
    common::env::ensure_data_dir(&cfg.storage.ranking_file).await?;

    // 2. Ranking service + router:
    let ranking = RankingService::new(cfg.storage.ranking_file.clone(), cfg.storage.max_entries);
    let state = ServerState { ranking };
    let app: Router = routes::build_router(state, routes::build_cors());

    // 3. Bind and serve:
    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        ranking_file = %cfg.storage.ranking_file.display(),
        max_entries = cfg.storage.max_entries,
        "ranking service listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("ranking service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

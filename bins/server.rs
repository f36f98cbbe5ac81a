use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // load .env first so RUST_LOG, CONFIG_PATH and friends are visible
    dotenv().ok();

    // config.toml first, then environment variables, then defaults
    let cfg = configs::AppConfig::load_and_validate();
    let log_format = cfg
        .as_ref()
        .map(|c| c.logging.format.clone())
        .unwrap_or_else(|_| "compact".to_string());
    // logging comes up even when the config is bad, so the failure below is visible
    common::utils::logging::init_logging(&log_format);
    info!(service = "ranking", event = "logger_init", "tracing subscriber initialized");

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "ranking", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    // service context (no secrets)
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // panic hook: route panics through tracing
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "ranking",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // Tokio runtime sized from server.worker_threads
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "ranking", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    // service start event
    info!(
        service = "ranking",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "ranking service starting"
    );

    // serve until Ctrl+C; run() shuts down gracefully
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "ranking", event = "stop", %service_id, pid, "ranking service stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "ranking", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}

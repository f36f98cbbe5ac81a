use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static SCORES_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ranking_scores_submitted_total",
        "Total scores accepted and persisted"
    )
    .expect("register scores_submitted_total")
});

pub static RANKING_READS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ranking_reads_total",
        "Total ranking list reads"
    )
    .expect("register ranking_reads_total")
});

pub static STORAGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ranking_storage_errors_total",
        "Total submissions that failed to persist"
    )
    .expect("register storage_errors_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

/// Register every counter up front so `/metrics` lists them before first use.
pub fn init_metrics() {
    Lazy::force(&SCORES_SUBMITTED_TOTAL);
    Lazy::force(&RANKING_READS_TOTAL);
    Lazy::force(&STORAGE_ERRORS_TOTAL);
}

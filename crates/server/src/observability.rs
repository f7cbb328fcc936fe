use std::future::Future;
use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use service::Status;

// Prometheus metrics (default registry)
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_mgmt_rpc_requests_total",
        "Total service calls by transport, method and status code",
        &["transport", "method", "code"]
    )
    .expect("register rpc_requests_total")
});

pub static RPC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "user_mgmt_rpc_duration_seconds",
        "Service call duration in seconds",
        &["transport", "method"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("register rpc_duration")
});

/// Time a service call and count its outcome.
pub async fn observe<T, F>(transport: &'static str, method: &'static str, call: F) -> Result<T, Status>
where
    F: Future<Output = Result<T, Status>>,
{
    let started = Instant::now();
    let res = call.await;
    let code = match &res {
        Ok(_) => "OK",
        Err(status) => status.code().as_str(),
    };
    RPC_REQUESTS_TOTAL.with_label_values(&[transport, method, code]).inc();
    RPC_DURATION
        .with_label_values(&[transport, method])
        .observe(started.elapsed().as_secs_f64());
    res
}

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

// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::error::ServiceError;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. The recorder is process-global, so
    /// repeated calls (several routers in one test binary) share one handle.
    pub fn init() -> Result<Self, BuildError> {
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_request(outcome: &'static str, elapsed_ms: f64) {
    counter!("recoman_requests_total", "outcome" => outcome).increment(1);
    histogram!("recoman_request_duration_ms").record(elapsed_ms);
}

pub fn record_upstream_error(err: &ServiceError) {
    let dependency = err.dependency().map(|d| d.as_str()).unwrap_or("none");
    counter!(
        "recoman_upstream_errors_total",
        "dependency" => dependency,
        "kind" => err.kind()
    )
    .increment(1);
}

pub fn record_hits(n: u64) {
    counter!("recoman_search_hits_total").increment(n);
}

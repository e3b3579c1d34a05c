use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("llm_requests_total", "Chat completion requests by operation.");
        describe_counter!(
            "llm_provider_errors_total",
            "Chat completion failures converted to placeholder text."
        );
        describe_counter!("news_lookup_errors_total", "Search provider failures.");
        describe_counter!(
            "keyword_search_hits_total",
            "Snippets returned by the keyword finder."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish which backends are live.
    pub fn init(llm_enabled: bool, news_enabled: bool) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        ensure_metrics_described();
        gauge!("llm_backend_enabled").set(if llm_enabled { 1.0 } else { 0.0 });
        gauge!("news_backend_enabled").set(if news_enabled { 1.0 } else { 0.0 });

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

use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!(
            "price_scout_search_requests_total",
            "Search requests by outcome (ok, not_found, bad_request)"
        );
        describe_counter!(
            "price_scout_upstream_calls_total",
            "Upstream price API calls by outcome"
        );

        Ok(Self { handle })
    }

    /// `/metrics` route rendering the search and upstream-call counters.
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

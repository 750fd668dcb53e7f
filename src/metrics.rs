use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

pub const SUMMARY_REQUESTS: &str = "signals_summary_requests_total";
pub const SUGGEST_REQUESTS: &str = "signals_suggest_requests_total";
pub const VALIDATION_ERRORS: &str = "signals_validation_errors_total";
pub const ENHANCER_FALLBACKS: &str = "signals_enhancer_fallbacks_total";
pub const SENTIMENT_SCORE: &str = "signals_sentiment_score";

// The global recorder can be installed only once per process; routers built
// later (tests build many) share the same handle.
static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    handle: Option<PrometheusHandle>,
}

impl Metrics {
    /// Initialize the Prometheus recorder (first call) and describe our series.
    pub fn init() -> Self {
        let handle = HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(h) => {
                    describe_counter!(SUMMARY_REQUESTS, "Feedback summary requests");
                    describe_counter!(SUGGEST_REQUESTS, "Speaker suggestion requests");
                    describe_counter!(VALIDATION_ERRORS, "Requests rejected by validation");
                    describe_counter!(
                        ENHANCER_FALLBACKS,
                        "Enhancer failures answered by the deterministic summary"
                    );
                    describe_histogram!(SENTIMENT_SCORE, "Sentiment score per summary");
                    // Touch the counters so they show up before the first request.
                    counter!(SUMMARY_REQUESTS).absolute(0);
                    counter!(SUGGEST_REQUESTS).absolute(0);
                    Some(h)
                }
                Err(e) => {
                    warn!(error = %e, "prometheus: recorder not installed");
                    None
                }
            })
            .clone();
        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.map(|h| h.render()).unwrap_or_default() }
            }),
        )
    }
}

use axum::{routing::get, Router};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::engine::Evaluation;
use crate::score::StageLabel;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls reuse it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| -> anyhow::Result<PrometheusHandle> {
            // Use default buckets to avoid API differences across crate versions.
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
            describe_counter!("evaluations_total", "Matches run through the scoring pipeline.");
            describe_counter!(
                "evaluations_insufficient_total",
                "Evaluations that ended with the insufficient-data sentinel."
            );
            describe_counter!(
                "recommendations_total",
                "Final recommendations by label."
            );
            describe_counter!(
                "live_matches_filtered_total",
                "Live matches skipped by the goalless-at-halftime gate."
            );
            Ok(handle)
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
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

/// Count one finished evaluation. No-op until a recorder is installed.
pub fn record_evaluation(e: &Evaluation) {
    counter!("evaluations_total").increment(1);
    match e.recommendation() {
        Some(r) => counter!("recommendations_total", "label" => r.as_str()).increment(1),
        None => counter!("evaluations_insufficient_total").increment(1),
    }
}

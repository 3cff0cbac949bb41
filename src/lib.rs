// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod live;
pub mod metrics;
pub mod score;
pub mod signals;
pub mod stake;

// Scoring pipeline (stages, policy, numeric helpers)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::engine::{evaluate, evaluate_with_policy, Evaluation};
pub use crate::error::PipelineError;
pub use crate::score::{HalftimeLabel, PreMatchLabel, Recommendation, ScoreResult};
pub use crate::signals::{HalftimeStats, MatchSignals, Momentum, PreMatchOdds, RiskInputs};
pub use crate::stake::{Bankroll, StakeRecommendation};

use tracing::info;

/// Build the full in-process Router from the environment (`.env` honoured).
/// The binary and the HTTP tests share this.
pub async fn app() -> anyhow::Result<axum::Router> {
    let _ = dotenvy::dotenv();

    let cfg = config::AppConfig::from_env()?;
    let metrics_enabled = cfg.metrics_enabled;
    info!(
        bankroll = cfg.bankroll.amount(),
        currency = %cfg.currency,
        policy = %cfg.policy_path.display(),
        "building router"
    );

    let router = api::create_router(AppState::from_config(cfg));
    if metrics_enabled {
        let m = crate::metrics::Metrics::init()?;
        return Ok(router.merge(m.router()));
    }
    Ok(router)
}

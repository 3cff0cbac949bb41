use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::analyze::{HotReloadPolicy, ScoringPolicy};
use crate::config::AppConfig;
use crate::engine::{self, Evaluation};
use crate::error::PipelineError;
use crate::ingest::{self, providers::JsonFeedProvider, types::SignalProvider};
use crate::live::{is_goalless_at_halftime, LiveMatch};
use crate::metrics::record_evaluation;
use crate::signals::MatchSignals;
use crate::stake::Bankroll;

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    policy: Arc<HotReloadPolicy>,
    providers: Arc<Vec<Box<dyn SignalProvider>>>,
}

impl AppState {
    /// Providers from config: the fixture file (if present), then the HTTP feed (if set).
    pub fn from_config(config: AppConfig) -> Self {
        let mut providers: Vec<Box<dyn SignalProvider>> = Vec::new();
        if config.live_fixture_path.exists() {
            providers.push(Box::new(JsonFeedProvider::from_file(
                config.live_fixture_path.clone(),
            )));
        }
        if let Some(url) = &config.live_feed_url {
            providers.push(Box::new(JsonFeedProvider::from_url(url.clone())));
        }
        Self::with_providers(config, providers)
    }

    pub fn with_providers(config: AppConfig, providers: Vec<Box<dyn SignalProvider>>) -> Self {
        let policy = HotReloadPolicy::new(Some(config.policy_path.as_path()));
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
            providers: Arc::new(providers),
        }
    }

    fn evaluate(
        &self,
        signals: &MatchSignals,
        bankroll: Bankroll,
        force_exception: bool,
        policy: &ScoringPolicy,
    ) -> Result<Evaluation, PipelineError> {
        let e = engine::evaluate_with_policy(
            signals,
            bankroll,
            force_exception,
            policy,
            &self.config.currency,
        )?;
        record_evaluation(&e);
        Ok(e)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate_one))
        .route("/evaluate/batch", post(evaluate_batch))
        .route("/live", get(live))
        .route("/policy", get(current_policy))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Pipeline precondition failures surface as 422 with a JSON body.
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateReq {
    pub signals: MatchSignals,
    #[serde(default)]
    pub force_exception: bool,
    /// Overrides the configured bankroll for this request only.
    #[serde(default)]
    pub bankroll: Option<f64>,
}

impl EvaluateReq {
    fn bankroll(&self, fallback: Bankroll) -> Result<Bankroll, PipelineError> {
        self.bankroll.map(Bankroll::new).unwrap_or(Ok(fallback))
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Halftime edge service is running",
    }))
}

async fn evaluate_one(
    State(state): State<AppState>,
    Json(req): Json<EvaluateReq>,
) -> Result<Json<Evaluation>, ApiError> {
    let policy = state.policy.current();
    let bankroll = req.bankroll(state.config.bankroll)?;
    let e = state.evaluate(&req.signals, bankroll, req.force_exception, &policy)?;
    tracing::debug!(
        c3 = ?e.c3.score(),
        label = e.c3.label_text(),
        stake = e.stake.amount,
        "evaluated"
    );
    Ok(Json(e))
}

#[derive(Serialize)]
#[serde(untagged)]
enum BatchOut {
    Ok(Evaluation),
    Err { error: String },
}

async fn evaluate_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<EvaluateReq>>,
) -> Json<Vec<BatchOut>> {
    // One policy snapshot for the whole batch.
    let policy = state.policy.current();
    let out = items
        .iter()
        .map(|req| {
            req.bankroll(state.config.bankroll)
                .and_then(|b| state.evaluate(&req.signals, b, req.force_exception, &policy))
                .map(BatchOut::Ok)
                .unwrap_or_else(|e| BatchOut::Err {
                    error: e.to_string(),
                })
        })
        .collect();
    Json(out)
}

#[derive(Serialize)]
struct LiveRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    home: String,
    away: String,
    score: String,
    minute: Option<u32>,
    #[serde(flatten)]
    outcome: BatchOut,
}

#[derive(Serialize)]
struct LiveOut {
    count: usize,
    skipped: usize,
    provider_errors: usize,
    fetched_at: i64,
    matches: Vec<LiveRow>,
}

fn live_row(state: &AppState, m: LiveMatch, policy: &ScoringPolicy) -> LiveRow {
    let outcome = match state.evaluate(&m.signals, state.config.bankroll, false, policy) {
        Ok(e) => {
            tracing::info!(
                home = %m.home,
                away = %m.away,
                c3 = ?e.c3.score(),
                label = e.c3.label_text(),
                "live match scored"
            );
            BatchOut::Ok(e)
        }
        Err(e) => {
            tracing::warn!(home = %m.home, away = %m.away, error = %e, "live match rejected");
            BatchOut::Err {
                error: e.to_string(),
            }
        }
    };
    LiveRow {
        id: m.id,
        home: m.home,
        away: m.away,
        score: m.score,
        minute: m.minute,
        outcome,
    }
}

async fn live(State(state): State<AppState>) -> Json<LiveOut> {
    let report = ingest::run_once(&state.providers).await;
    let policy = state.policy.current();

    let total = report.matches.len();
    let matches: Vec<LiveRow> = report
        .matches
        .into_iter()
        .filter(is_goalless_at_halftime)
        .map(|m| live_row(&state, m, &policy))
        .collect();
    let skipped = total - matches.len();
    metrics::counter!("live_matches_filtered_total").increment(skipped as u64);

    Json(LiveOut {
        count: matches.len(),
        skipped,
        provider_errors: report.errors,
        fetched_at: report.fetched_at,
        matches,
    })
}

async fn current_policy(State(state): State<AppState>) -> Json<ScoringPolicy> {
    Json(state.policy.current())
}

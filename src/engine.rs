//! # Evaluation Engine
//! Pure, testable entry point that maps `(MatchSignals, Bankroll, override)` →
//! `Evaluation`. No I/O, no shared state; safe to call concurrently per match.
//!
//! Policy: the three stages run in order; the stake follows the final label
//! only. Non-finite numbers are rejected up front, everything else degrades
//! to the insufficient-data sentinel.

use serde::Serialize;

use crate::analyze::{self, HalftimeComponents, ScoringPolicy};
use crate::error::{PipelineError, Result};
use crate::score::{HalftimeLabel, PreMatchLabel, Recommendation, ScoreResult};
use crate::signals::MatchSignals;
use crate::stake::{self, Bankroll, StakeRecommendation, DEFAULT_CURRENCY};

/// Full result handed to the service layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub c1: ScoreResult<PreMatchLabel>,
    pub c2: ScoreResult<HalftimeLabel>,
    pub c3: ScoreResult<Recommendation>,
    pub stake: StakeRecommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halftime_components: Option<HalftimeComponents>,
}

impl Evaluation {
    pub fn recommendation(&self) -> Option<Recommendation> {
        self.c3.label()
    }
}

/// Evaluate with the canonical policy.
pub fn evaluate(
    signals: &MatchSignals,
    bankroll: Bankroll,
    force_exception: bool,
) -> Result<Evaluation> {
    evaluate_with_policy(
        signals,
        bankroll,
        force_exception,
        &ScoringPolicy::default(),
        DEFAULT_CURRENCY,
    )
}

pub fn evaluate_with_policy(
    signals: &MatchSignals,
    bankroll: Bankroll,
    force_exception: bool,
    policy: &ScoringPolicy,
    currency: &str,
) -> Result<Evaluation> {
    ensure_finite(signals)?;

    let scores = analyze::run_stages(signals, policy);
    let stake = stake::stake_for(
        scores.recommendation(),
        bankroll,
        force_exception,
        &policy.stake,
        currency,
    );

    Ok(Evaluation {
        c1: scores.c1,
        c2: scores.c2,
        c3: scores.c3,
        stake,
        halftime_components: scores.halftime_components,
    })
}

/// NaN / ±inf are bugs upstream, never coerced.
fn ensure_finite(signals: &MatchSignals) -> Result<()> {
    match signals
        .numeric_fields()
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    {
        Some((field, value)) => Err(PipelineError::NonFiniteInput { field, value }),
        None => Ok(()),
    }
}

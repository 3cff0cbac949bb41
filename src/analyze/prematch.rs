//! Stage-1: pre-match confidence from the four kickoff prices.

use super::numeric::{bound, implied};
use super::policy::PreMatchPolicy;
use crate::score::{PreMatchLabel, ScoreResult, StageLabel};
use crate::signals::PreMatchOdds;

/// Normalized implied probability of the stronger side (margin removed).
pub fn favorite_strength(home: f64, draw: f64, away: f64) -> f64 {
    let (ph, pd, pa) = (implied(home), implied(draw), implied(away));
    ph.max(pa) / (ph + pd + pa)
}

/// Unbounded blend of the over-0.5 probability and favorite strength.
pub fn blend(p_over05: f64, favorite: f64, policy: &PreMatchPolicy) -> f64 {
    policy.over05_weight * p_over05 + policy.favorite_weight * favorite
}

/// Missing or non-positive prices yield `Insufficient`.
pub fn evaluate(odds: Option<&PreMatchOdds>, policy: &PreMatchPolicy) -> ScoreResult<PreMatchLabel> {
    let Some((over05, home, draw, away)) = odds.and_then(PreMatchOdds::complete) else {
        return ScoreResult::Insufficient;
    };

    let raw = blend(implied(over05), favorite_strength(home, draw, away), policy);
    let score = bound(raw, policy.bounds.lower, policy.bounds.upper);
    ScoreResult::Scored {
        score,
        label: PreMatchLabel::classify(score, &policy.thresholds),
    }
}

//! Stage-2: halftime confidence.
//!
//! Blends the Stage-1 score with three in-play components in [0,1]:
//! - `volume`    : activity intensity against reference caps (shots / SoT / xG)
//! - `quality`   : xG per shot on target, scaled against a reference band
//! - `alignment` : agreement between Stage-1 and the halftime market price

use super::numeric::{bound, clamp, implied, ratio};
use super::policy::{HalftimePolicy, VolumeMix};
use crate::score::{HalftimeLabel, ScoreResult, StageLabel};
use crate::signals::HalftimeStats;

/// Component breakdown, kept for explainability in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HalftimeComponents {
    pub volume: f64,
    pub quality: f64,
    pub alignment: f64,
}

pub fn volume(stats: &HalftimeStats, mix: &VolumeMix) -> f64 {
    let raw = mix.shots_weight * ratio(stats.shots, mix.shots_cap)
        + mix.sot_weight * ratio(stats.shots_on_target, mix.sot_cap)
        + mix.xg_weight * ratio(stats.expected_goals, mix.xg_cap);
    raw.min(1.0)
}

/// Zero when nothing was on target, regardless of xG.
pub fn quality(stats: &HalftimeStats, policy: &HalftimePolicy) -> f64 {
    if stats.shots_on_target == 0.0 {
        return 0.0;
    }
    let per_sot = stats.expected_goals / stats.shots_on_target;
    clamp(
        (per_sot - policy.quality_floor) / policy.quality_span,
        0.0,
        1.0,
    )
}

/// Neutral unless the halftime price is a real price (> 1).
pub fn alignment(c1: f64, halftime_odds: Option<f64>, policy: &HalftimePolicy) -> f64 {
    match halftime_odds {
        Some(o) if o > 1.0 => {
            (1.0 - (c1 - implied(o)).abs() / policy.alignment_tolerance).max(0.0)
        }
        _ => policy.alignment_neutral,
    }
}

pub fn components(
    c1: f64,
    stats: &HalftimeStats,
    halftime_odds: Option<f64>,
    policy: &HalftimePolicy,
) -> HalftimeComponents {
    HalftimeComponents {
        volume: volume(stats, &policy.volume),
        quality: quality(stats, policy),
        alignment: alignment(c1, halftime_odds, policy),
    }
}

/// `Insufficient` iff Stage-1 was.
pub fn evaluate(
    c1: Option<f64>,
    stats: &HalftimeStats,
    halftime_odds: Option<f64>,
    policy: &HalftimePolicy,
) -> ScoreResult<HalftimeLabel> {
    evaluate_explained(c1, stats, halftime_odds, policy).0
}

/// Same as [`evaluate`], also returning the components the score was built from.
pub fn evaluate_explained(
    c1: Option<f64>,
    stats: &HalftimeStats,
    halftime_odds: Option<f64>,
    policy: &HalftimePolicy,
) -> (ScoreResult<HalftimeLabel>, Option<HalftimeComponents>) {
    let Some(c1) = c1 else {
        return (ScoreResult::Insufficient, None);
    };

    let stats = stats.floored();
    let parts = components(c1, &stats, halftime_odds, policy);
    let raw = policy.c1_weight * c1
        + policy.volume_weight * parts.volume
        + policy.quality_weight * parts.quality
        + policy.alignment_weight * parts.alignment;

    let score = bound(raw, policy.bounds.lower, policy.bounds.upper);
    let result = ScoreResult::Scored {
        score,
        label: HalftimeLabel::classify(score, &policy.thresholds),
    };
    (result, Some(parts))
}

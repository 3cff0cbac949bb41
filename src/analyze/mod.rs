// src/analyze/mod.rs
//! Scoring pipeline: Stage-1 (pre-match) → Stage-2 (halftime) → Stage-3 (post-interval).
//!
//! Each stage is a pure function of its own inputs plus the previous stage's
//! score. An `Insufficient` result anywhere short-circuits every later stage.

pub mod halftime;
pub mod numeric;
pub mod policy;
pub mod post_interval;
pub mod prematch;

use serde::Serialize;

use crate::score::{HalftimeLabel, PreMatchLabel, Recommendation, ScoreResult};
use crate::signals::MatchSignals;

// Re-export convenient types.
pub use crate::analyze::halftime::HalftimeComponents;
pub use crate::analyze::policy::{HotReloadPolicy, ScoringPolicy};

/// The three stage outputs for one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageScores {
    pub c1: ScoreResult<PreMatchLabel>,
    pub c2: ScoreResult<HalftimeLabel>,
    pub c3: ScoreResult<Recommendation>,
    /// Stage-2 breakdown; absent when Stage-1 was insufficient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halftime_components: Option<HalftimeComponents>,
}

impl StageScores {
    pub fn recommendation(&self) -> Option<Recommendation> {
        self.c3.label()
    }
}

/// Run all three stages in order. Inputs are assumed finite.
pub fn run_stages(signals: &MatchSignals, policy: &ScoringPolicy) -> StageScores {
    let c1 = prematch::evaluate(signals.pre_match_odds.as_ref(), &policy.prematch);
    let (c2, halftime_components) = halftime::evaluate_explained(
        c1.score(),
        &signals.halftime_stats,
        signals.halftime_odds,
        &policy.halftime,
    );
    let c3 = post_interval::evaluate(
        c1.score(),
        c2.score(),
        &signals.momentum,
        &signals.risk,
        &policy.post_interval,
    );
    StageScores {
        c1,
        c2,
        c3,
        halftime_components,
    }
}

// src/signals.rs
//! Raw per-match inputs for the scoring pipeline.
//!
//! A `MatchSignals` value is delivered by a signal provider for one match at one
//! evaluation horizon. The pipeline only reads it; nothing in the crate mutates
//! a value it was handed.

use serde::{Deserialize, Serialize};

/// Pre-match decimal odds. All four must be present and positive for Stage-1
/// to produce a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PreMatchOdds {
    /// Over 0.5 goals.
    #[serde(default, alias = "o05", alias = "over_under_zero_five")]
    pub over05: Option<f64>,
    #[serde(default)]
    pub home: Option<f64>,
    #[serde(default)]
    pub draw: Option<f64>,
    #[serde(default)]
    pub away: Option<f64>,
}

impl PreMatchOdds {
    pub fn new(over05: f64, home: f64, draw: f64, away: f64) -> Self {
        Self {
            over05: Some(over05),
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        }
    }

    /// Returns `(over05, home, draw, away)` only when every price is usable.
    pub fn complete(&self) -> Option<(f64, f64, f64, f64)> {
        let usable = |o: Option<f64>| o.filter(|v| *v > 0.0);
        Some((
            usable(self.over05)?,
            usable(self.home)?,
            usable(self.draw)?,
            usable(self.away)?,
        ))
    }
}

/// First-half volume and quality. Unmeasured fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HalftimeStats {
    #[serde(default)]
    pub shots: f64,
    #[serde(default, alias = "sot")]
    pub shots_on_target: f64,
    #[serde(default, alias = "xg")]
    pub expected_goals: f64,
}

impl HalftimeStats {
    pub fn new(shots: f64, shots_on_target: f64, expected_goals: f64) -> Self {
        Self {
            shots,
            shots_on_target,
            expected_goals,
        }
    }

    /// Negative counts are treated as unmeasured.
    pub(crate) fn floored(&self) -> Self {
        Self {
            shots: self.shots.max(0.0),
            shots_on_target: self.shots_on_target.max(0.0),
            expected_goals: self.expected_goals.max(0.0),
        }
    }
}

/// Second-half activity accumulated since the interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    #[serde(default)]
    pub shots_delta: f64,
    #[serde(default, alias = "sot_delta")]
    pub shots_on_target_delta: f64,
    #[serde(default, alias = "xg_delta")]
    pub expected_goals_delta: f64,
}

impl Momentum {
    pub fn new(shots_delta: f64, shots_on_target_delta: f64, expected_goals_delta: f64) -> Self {
        Self {
            shots_delta,
            shots_on_target_delta,
            expected_goals_delta,
        }
    }

    pub(crate) fn floored(&self) -> Self {
        Self {
            shots_delta: self.shots_delta.max(0.0),
            shots_on_target_delta: self.shots_on_target_delta.max(0.0),
            expected_goals_delta: self.expected_goals_delta.max(0.0),
        }
    }
}

/// Optional risk / expected-value adjustments. Absent values are neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    #[serde(default)]
    pub risk_flag: Option<f64>,
    #[serde(default, alias = "ev_now")]
    pub expected_value_now: Option<f64>,
    #[serde(default, alias = "ev_60")]
    pub expected_value_at60: Option<f64>,
}

/// Everything the pipeline needs for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSignals {
    #[serde(default)]
    pub pre_match_odds: Option<PreMatchOdds>,
    #[serde(default)]
    pub halftime_stats: HalftimeStats,
    #[serde(default)]
    pub halftime_odds: Option<f64>,
    #[serde(default)]
    pub momentum: Momentum,
    #[serde(flatten)]
    pub risk: RiskInputs,
}

impl MatchSignals {
    /// Every numeric field that is present, labelled for error reporting.
    pub(crate) fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut out = Vec::with_capacity(13);
        if let Some(o) = &self.pre_match_odds {
            for (name, v) in [
                ("pre_match_odds.over05", o.over05),
                ("pre_match_odds.home", o.home),
                ("pre_match_odds.draw", o.draw),
                ("pre_match_odds.away", o.away),
            ] {
                if let Some(v) = v {
                    out.push((name, v));
                }
            }
        }
        out.push(("halftime_stats.shots", self.halftime_stats.shots));
        out.push((
            "halftime_stats.shots_on_target",
            self.halftime_stats.shots_on_target,
        ));
        out.push((
            "halftime_stats.expected_goals",
            self.halftime_stats.expected_goals,
        ));
        if let Some(v) = self.halftime_odds {
            out.push(("halftime_odds", v));
        }
        out.push(("momentum.shots_delta", self.momentum.shots_delta));
        out.push((
            "momentum.shots_on_target_delta",
            self.momentum.shots_on_target_delta,
        ));
        out.push((
            "momentum.expected_goals_delta",
            self.momentum.expected_goals_delta,
        ));
        for (name, v) in [
            ("risk_flag", self.risk.risk_flag),
            ("expected_value_now", self.risk.expected_value_now),
            ("expected_value_at60", self.risk.expected_value_at60),
        ] {
            if let Some(v) = v {
                out.push((name, v));
            }
        }
        out
    }
}

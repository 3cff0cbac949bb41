//! Stage-3: post-interval confidence and the final recommendation.

use super::numeric::bound;
use super::policy::PostIntervalPolicy;
use crate::score::{Recommendation, ScoreResult, StageLabel};
use crate::signals::{Momentum, RiskInputs};

/// Weighted second-half activity; xG carries most of the weight.
pub fn momentum(m: &Momentum, policy: &PostIntervalPolicy) -> f64 {
    policy.shots_weight * m.shots_delta
        + policy.sot_weight * m.shots_on_target_delta
        + policy.xg_weight * m.expected_goals_delta
}

/// True when the risk/negative-EV haircut applies. Absent values count as zero.
pub fn penalized(risk: &RiskInputs, policy: &PostIntervalPolicy) -> bool {
    let risky = risk.risk_flag.unwrap_or(0.0) >= policy.risk_limit;
    let best_ev = risk
        .expected_value_now
        .unwrap_or(0.0)
        .max(risk.expected_value_at60.unwrap_or(0.0));
    risky || best_ev < 0.0
}

/// `Insufficient` if either earlier stage was.
pub fn evaluate(
    c1: Option<f64>,
    c2: Option<f64>,
    momentum_signals: &Momentum,
    risk: &RiskInputs,
    policy: &PostIntervalPolicy,
) -> ScoreResult<Recommendation> {
    let (Some(c1), Some(c2)) = (c1, c2) else {
        return ScoreResult::Insufficient;
    };

    let base = policy.c1_weight * c1 + policy.c2_weight * c2;
    let mut raw = base + momentum(&momentum_signals.floored(), policy);
    if penalized(risk, policy) {
        raw -= policy.penalty;
    }

    let score = bound(raw, policy.bounds.lower, policy.bounds.upper);
    ScoreResult::Scored {
        score,
        label: Recommendation::classify(score, &policy.thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> PostIntervalPolicy {
        PostIntervalPolicy::default()
    }

    #[test]
    fn either_missing_stage_propagates() {
        let m = Momentum::default();
        let r = RiskInputs::default();
        assert!(evaluate(None, Some(0.8), &m, &r, &p()).is_insufficient());
        assert!(evaluate(Some(0.8), None, &m, &r, &p()).is_insufficient());
    }

    #[test]
    fn quiet_second_half_keeps_base() {
        let r = evaluate(Some(0.80), Some(0.76), &Momentum::default(), &RiskInputs::default(), &p());
        assert_eq!(r.score(), Some(0.78));
        assert_eq!(r.label(), Some(Recommendation::SmallStake));
    }

    #[test]
    fn strong_momentum_caps_at_upper_bound() {
        let m = Momentum::new(3.0, 2.0, 0.35);
        let r = evaluate(Some(0.76), Some(0.76), &m, &RiskInputs::default(), &p());
        assert_eq!(r.score(), Some(0.92));
        assert_eq!(r.label(), Some(Recommendation::TopPick));
    }

    #[test]
    fn risk_flag_applies_penalty() {
        let risk = RiskInputs {
            risk_flag: Some(40.0),
            ..Default::default()
        };
        let r = evaluate(Some(0.80), Some(0.80), &Momentum::default(), &risk, &p());
        assert_eq!(r.score(), Some(0.70));
        assert_eq!(r.label(), Some(Recommendation::Borderline));

        let mild = RiskInputs {
            risk_flag: Some(39.0),
            ..Default::default()
        };
        let r = evaluate(Some(0.80), Some(0.80), &Momentum::default(), &mild, &p());
        assert_eq!(r.score(), Some(0.80));
    }

    #[test]
    fn negative_ev_needs_both_horizons_negative() {
        let both = RiskInputs {
            expected_value_now: Some(-0.02),
            expected_value_at60: Some(-0.01),
            ..Default::default()
        };
        assert!(penalized(&both, &p()));

        // An absent horizon counts as zero, which is not negative.
        let one = RiskInputs {
            expected_value_now: Some(-0.02),
            ..Default::default()
        };
        assert!(!penalized(&one, &p()));

        let mixed = RiskInputs {
            expected_value_now: Some(-0.02),
            expected_value_at60: Some(0.03),
            ..Default::default()
        };
        assert!(!penalized(&mixed, &p()));
    }

    #[test]
    fn penalty_never_breaks_lower_bound() {
        let risk = RiskInputs {
            risk_flag: Some(90.0),
            ..Default::default()
        };
        let r = evaluate(Some(0.05), Some(0.05), &Momentum::default(), &risk, &p());
        assert_eq!(r.score(), Some(0.05));
        assert_eq!(r.label(), Some(Recommendation::Avoid));
    }
}

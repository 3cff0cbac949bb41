//! Stake Calculator: final recommendation → amount against a fixed bankroll.

use serde::{Deserialize, Serialize};

use crate::analyze::policy::StakePolicy;
use crate::error::{PipelineError, Result};
use crate::score::Recommendation;

pub const DEFAULT_BANKROLL: f64 = 500.0;
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Positive, finite bankroll. Construct through [`Bankroll::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bankroll(f64);

impl Bankroll {
    pub fn new(amount: f64) -> Result<Self> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(PipelineError::InvalidBankroll(amount))
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl Default for Bankroll {
    fn default() -> Self {
        Self(DEFAULT_BANKROLL)
    }
}

impl TryFrom<f64> for Bankroll {
    type Error = PipelineError;

    fn try_from(v: f64) -> Result<Self> {
        Self::new(v)
    }
}

impl<'de> Deserialize<'de> for Bankroll {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        Bankroll::new(v).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecommendation {
    pub amount: u64,
    pub currency: String,
}

impl StakeRecommendation {
    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            amount: 0,
            currency: currency.into(),
        }
    }
}

/// Fraction of bankroll for a tier. `None` is the insufficient-data case.
pub fn fraction_for(label: Option<Recommendation>, policy: &StakePolicy) -> f64 {
    match label {
        Some(Recommendation::TopPick) => policy.top_pick,
        Some(Recommendation::BetNow) => policy.bet_now,
        Some(Recommendation::SmallStake) => policy.small_stake,
        Some(Recommendation::Borderline) => policy.borderline,
        Some(Recommendation::Avoid) | None => 0.0,
    }
}

/// `force_exception` is the manual override and ignores the label entirely.
pub fn stake_for(
    label: Option<Recommendation>,
    bankroll: Bankroll,
    force_exception: bool,
    policy: &StakePolicy,
    currency: &str,
) -> StakeRecommendation {
    let fraction = if force_exception {
        policy.exception
    } else {
        fraction_for(label, policy)
    };
    StakeRecommendation {
        amount: (bankroll.amount() * fraction).round().max(0.0) as u64,
        currency: currency.to_string(),
    }
}

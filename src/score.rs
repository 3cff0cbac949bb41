//! Stage outputs: a bounded score plus a categorical label.
//!
//! Každá fáze vrací buď `Scored { score, label }`, nebo `Insufficient`
//! (sentinel "—"). Sentinel se propaguje dopředu do všech dalších fází.

use serde::{Serialize, Serializer};
use std::fmt;

/// Label text used when a stage had too little input.
pub const INSUFFICIENT_LABEL: &str = "—";

/// A label type owned by one stage. Variants are listed strongest first and
/// map one-to-one onto the stage's four descending thresholds (+ fallback).
pub trait StageLabel: Copy + Eq + fmt::Debug + 'static {
    /// Strongest first; length is thresholds + 1.
    const LADDER: [Self; 5];

    fn as_str(&self) -> &'static str;

    /// Step function over `thresholds` (strictly descending, inclusive lower bounds).
    fn classify(score: f64, thresholds: &[f64; 4]) -> Self {
        thresholds
            .iter()
            .position(|t| score >= *t)
            .map(|i| Self::LADDER[i])
            .unwrap_or(Self::LADDER[4])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreMatchLabel {
    Elite,
    Strong,
    Good,
    Weak,
    Bad,
}

impl StageLabel for PreMatchLabel {
    const LADDER: [Self; 5] = [
        Self::Elite,
        Self::Strong,
        Self::Good,
        Self::Weak,
        Self::Bad,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Elite => "ELITE pre",
            Self::Strong => "STRONG pre",
            Self::Good => "GOOD pre",
            Self::Weak => "WEAK pre",
            Self::Bad => "BAD pre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalftimeLabel {
    Elite,
    Strong,
    Borderline,
    Weak,
    Dead,
}

impl StageLabel for HalftimeLabel {
    const LADDER: [Self; 5] = [
        Self::Elite,
        Self::Strong,
        Self::Borderline,
        Self::Weak,
        Self::Dead,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Elite => "ELITE (HT)",
            Self::Strong => "STRONG (HT)",
            Self::Borderline => "BORDERLINE (HT)",
            Self::Weak => "WEAK (HT)",
            Self::Dead => "DEAD (HT)",
        }
    }
}

/// Final recommendation after Stage-3. Ordered by strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Recommendation {
    Avoid,
    Borderline,
    SmallStake,
    BetNow,
    TopPick,
}

impl StageLabel for Recommendation {
    const LADDER: [Self; 5] = [
        Self::TopPick,
        Self::BetNow,
        Self::SmallStake,
        Self::Borderline,
        Self::Avoid,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::TopPick => "TOP PICK",
            Self::BetNow => "BET NOW",
            Self::SmallStake => "SMALL STAKE",
            Self::Borderline => "BORDERLINE",
            Self::Avoid => "AVOID",
        }
    }
}

macro_rules! label_display_and_serialize {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }
    )*};
}

label_display_and_serialize!(PreMatchLabel, HalftimeLabel, Recommendation);

/// Output of one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreResult<L> {
    Scored { score: f64, label: L },
    Insufficient,
}

impl<L: StageLabel> ScoreResult<L> {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Scored { score, .. } => Some(*score),
            Self::Insufficient => None,
        }
    }

    pub fn label(&self) -> Option<L> {
        match self {
            Self::Scored { label, .. } => Some(*label),
            Self::Insufficient => None,
        }
    }

    /// Display text; the sentinel for `Insufficient`.
    pub fn label_text(&self) -> &'static str {
        self.label().map(|l| l.as_str()).unwrap_or(INSUFFICIENT_LABEL)
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::Insufficient)
    }
}

#[derive(Serialize)]
struct ScoreWire {
    score: Option<f64>,
    label: &'static str,
}

impl<L: StageLabel> Serialize for ScoreResult<L> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        ScoreWire {
            score: self.score(),
            label: self.label_text(),
        }
        .serialize(s)
    }
}

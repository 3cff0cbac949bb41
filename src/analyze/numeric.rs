//! Shared numeric helpers for the stage evaluators.

/// Clamp into `[lo, hi]`.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Round half away from zero to two decimals.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Clamp then round, the common tail of every stage.
#[inline]
pub fn bound(x: f64, lo: f64, hi: f64) -> f64 {
    round2(clamp(x, lo, hi))
}

/// Decimal odds → implied probability.
#[inline]
pub fn implied(odds: f64) -> f64 {
    1.0 / odds
}

/// `value / cap`, zero for a non-positive cap.
#[inline]
pub fn ratio(value: f64, cap: f64) -> f64 {
    if cap > 0.0 {
        value / cap
    } else {
        0.0
    }
}

//! Profit rating bands.

use crate::domain::RatingTier;

/// Lower bound (exclusive) of the `Excellent` band.
pub const EXCELLENT_ABOVE: f64 = 100_000.0;
/// Lower bound (exclusive) of the `Caution` band.
pub const CAUTION_ABOVE: f64 = 25_000.0;
/// Lower bound (exclusive) of the `Warning` band.
pub const WARNING_ABOVE: f64 = 0.0;

/// Map annual profit to a rating tier.
///
/// Bands are half-open on the left and checked top-down:
/// `(100k, ∞)`, `(25k, 100k]`, `(0, 25k]`, `(-∞, 0]`.
pub fn classify_rating(annual_profit: f64) -> RatingTier {
    if annual_profit > EXCELLENT_ABOVE {
        RatingTier::Excellent
    } else if annual_profit > CAUTION_ABOVE {
        RatingTier::Caution
    } else if annual_profit > WARNING_ABOVE {
        RatingTier::Warning
    } else {
        RatingTier::Poor
    }
}

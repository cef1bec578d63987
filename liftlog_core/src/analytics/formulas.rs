//! Numeric building blocks shared by the analytics views.

use serde::{Deserialize, Serialize};

/// Above this rep count the Brzycki estimate is not extrapolated.
pub const BRZYCKI_MAX_REPS: u32 = 36;

/// Relative change (in percent) a series must exceed to count as a trend.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Estimated one-rep-max using the Brzycki formula
///
/// - 1 rep: the weight itself
/// - 2..=36 reps: `weight * 36 / (37 - reps)`
/// - more than 36 reps: the weight itself (the linear model breaks down)
pub fn one_rep_max(reps: u32, weight: f64) -> f64 {
    match reps {
        0 => 0.0,
        1 => weight,
        r if r <= BRZYCKI_MAX_REPS => weight * 36.0 / (37.0 - f64::from(r)),
        _ => weight,
    }
}

/// `(last - first) / first * 100`, or 0 when `first` is zero
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        return 0.0;
    }
    (last - first) / first * 100.0
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Classify a chronologically ordered series by comparing its endpoints.
pub fn classify_trend(series: &[f64]) -> TrendDirection {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (*first, *last),
        _ => return TrendDirection::Stable,
    };

    if first == 0.0 {
        return if last > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Stable
        };
    }

    let change = percent_change(first, last);
    if change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Up
    } else if change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

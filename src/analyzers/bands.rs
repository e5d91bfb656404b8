//! Threshold bands that turn a number into a qualitative class.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    Stable,
    Growth,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyBand {
    Excellent,
    Good,
    Irregular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementBand {
    High,
    Good,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Acceleration,
    Steady,
    Slowdown,
}

/// Percent change from `previous` to `recent`; 0 when `previous` is 0.
pub fn percent_change(recent: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (recent - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// | Change              | Class   |
/// |---------------------|---------|
/// | \|c\| < stable_pct  | Stable  |
/// | c > 0               | Growth  |
/// | otherwise           | Decline |
pub fn classify_trend(change_pct: f64, stable_pct: f64) -> TrendClass {
    match change_pct {
        c if c.abs() < stable_pct => TrendClass::Stable,
        c if c > 0.0 => TrendClass::Growth,
        _ => TrendClass::Decline,
    }
}

pub fn consistency_band(rate_pct: f64, excellent_pct: f64, good_pct: f64) -> ConsistencyBand {
    match rate_pct {
        r if r >= excellent_pct => ConsistencyBand::Excellent,
        r if r >= good_pct => ConsistencyBand::Good,
        _ => ConsistencyBand::Irregular,
    }
}

pub fn engagement_band(rate_pct: f64, high_pct: f64, good_pct: f64) -> EngagementBand {
    match rate_pct {
        r if r > high_pct => EngagementBand::High,
        r if r > good_pct => EngagementBand::Good,
        _ => EngagementBand::Low,
    }
}

/// Compares the second-half mean against the first-half mean scaled by the ratios.
pub fn pace(first_mean: f64, second_mean: f64, acceleration: f64, slowdown: f64) -> Pace {
    match second_mean {
        s if s > first_mean * acceleration => Pace::Acceleration,
        s if s < first_mean * slowdown => Pace::Slowdown,
        _ => Pace::Steady,
    }
}

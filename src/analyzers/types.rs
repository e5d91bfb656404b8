//! Data types produced by the insight composer.

use serde::Serialize;

use super::bands::TrendClass;
use crate::config::{DashboardConfig, Thresholds};

/// A short observation with an icon and title, ready for a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: String,
    pub title: String,
    pub text: String,
}

impl Insight {
    pub(crate) fn new(kind: InsightKind, icon: &str, title: &str, text: String) -> Self {
        Self {
            kind,
            icon: icon.to_string(),
            title: title.to_string(),
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    ContentStrategy,
    PeakActivity,
    Consistency,
    Trend,
    Engagement,
    TemporalShift,
}

/// Recent window against the window just before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendWindow {
    /// Days in the recent window.
    pub days: usize,
    pub recent: f64,
    pub previous: f64,
    /// Whole-point percent change.
    pub change_pct: i64,
    pub class: TrendClass,
}

/// Thresholds and category choices for [`super::insights::compose`].
#[derive(Debug, Clone)]
pub struct InsightOptions {
    pub thresholds: Thresholds,
    pub engagement_categories: Vec<String>,
}

impl Default for InsightOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for InsightOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            engagement_categories: config.engagement_categories.clone(),
        }
    }
}

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::info;

use crate::config::{DashboardConfig, MetricDef};
use crate::error::Result;
use crate::fetch::{HttpClient, Loader};
use crate::format::{format_compact, round_to};
use crate::parser::parse_daily_counts;
use crate::stats::{AggregateOptions, Series, Summary, aggregate};

/// One performance metric as shown on its card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub id: String,
    pub label: String,
    pub total: f64,
    /// `format_compact(total)`
    pub headline: String,
    /// Mean over days with activity, one decimal.
    pub average: f64,
    pub peak: f64,
    pub peak_date: Option<NaiveDate>,
    pub min_non_zero: f64,
    pub latest: Option<f64>,
    pub latest_date: Option<NaiveDate>,
    pub active_days: usize,
    pub total_days: usize,
    /// Active days as a share of all days, one decimal.
    pub activity_rate: f64,
    pub series: Series,
}

impl MetricCard {
    pub fn new(def: &MetricDef, series: Series, summary: &Summary) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            total: summary.total,
            headline: format_compact(summary.total),
            average: round_to(summary.mean_over_active_days, 1),
            peak: summary.peak.map_or(0.0, |p| p.value),
            peak_date: summary.peak.map(|p| p.date),
            min_non_zero: summary.min_non_zero,
            latest: summary.latest.map(|r| r.value),
            latest_date: summary.latest.map(|r| r.date),
            active_days: summary.active_days,
            total_days: summary.total_days,
            activity_rate: round_to(summary.activity_rate(), 1),
            series,
        }
    }
}

pub fn build_card(def: &MetricDef, raw: &str, options: &AggregateOptions) -> Result<MetricCard> {
    let series = Series::new(def.id.clone(), parse_daily_counts(raw)?);
    let summary = aggregate(&series, options);
    Ok(MetricCard::new(def, series, &summary))
}

async fn load_metric<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
    def: &MetricDef,
    options: &AggregateOptions,
) -> Result<MetricCard> {
    let sources = config.sources.candidates(&def.file);
    let raw = loader
        .load_text(&format!("{} data", def.label), &sources)
        .await?;
    build_card(def, &raw, options)
}

/// Fetches every configured metric concurrently. The first failure fails the
/// whole page; no partial set of cards is returned.
#[tracing::instrument(skip_all, fields(metrics = config.metrics.len()))]
pub async fn load_performance<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
) -> Result<Vec<MetricCard>> {
    let options = AggregateOptions {
        high_intensity_threshold: config.thresholds.high_intensity,
    };

    let cards = try_join_all(
        config
            .metrics
            .iter()
            .map(|def| load_metric(loader, config, def, &options)),
    )
    .await?;

    info!(cards = cards.len(), "Performance cards ready");
    Ok(cards)
}

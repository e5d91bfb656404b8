//! Daily activity: the full aggregate of any `date,count` source.

use tracing::info;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::fetch::{HttpClient, Loader, Source};
use crate::parser::parse_daily_counts;
use crate::stats::{AggregateOptions, Series, Summary, aggregate};

pub fn summarize_text(raw: &str, category: &str, options: &AggregateOptions) -> Result<Summary> {
    let series = Series::new(category, parse_daily_counts(raw)?);
    Ok(aggregate(&series, options))
}

/// Reads `location` (URL or path) and aggregates it under `category`.
#[tracing::instrument(skip(loader, config))]
pub async fn load_summary<C: HttpClient>(
    loader: &Loader<C>,
    location: &str,
    category: &str,
    config: &DashboardConfig,
) -> Result<Summary> {
    let raw = loader
        .load_text("daily activity data", &[Source::text(location)])
        .await?;
    let options = AggregateOptions {
        high_intensity_threshold: config.thresholds.high_intensity,
    };
    let summary = summarize_text(&raw, category, &options)?;

    info!(
        days = summary.total_days,
        total = summary.total,
        longest_zero_streak = summary.longest_zero_streak,
        "Daily activity summarized"
    );
    Ok(summary)
}

use serde::Serialize;
use tracing::info;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::fetch::{HttpClient, Loader};
use crate::format::round_to;
use crate::parser::{CategoryCount, parse_category_counts};
use crate::stats::percentage_share;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentShare {
    pub key: String,
    pub label: String,
    pub count: f64,
    /// Share of all classified items, one decimal.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub total: f64,
    pub shares: Vec<SentimentShare>,
}

pub fn build_report(counts: Vec<CategoryCount>, config: &DashboardConfig) -> SentimentReport {
    let total: f64 = counts.iter().map(|c| c.count).sum();
    let shares = counts
        .into_iter()
        .map(|c| SentimentShare {
            label: config.sentiment_label(&c.category).to_string(),
            share_pct: round_to(percentage_share(c.count, total), 1),
            count: c.count,
            key: c.category,
        })
        .collect();

    SentimentReport { total, shares }
}

/// A file with no category rows is rejected so the loader tries the next root.
pub fn build_from_text(raw: &str, config: &DashboardConfig) -> Result<SentimentReport> {
    let counts = parse_category_counts(raw)?;
    if counts.is_empty() {
        return Err(DashboardError::InvalidPayload(
            "no sentiment rows".to_string(),
        ));
    }
    Ok(build_report(counts, config))
}

#[tracing::instrument(skip_all)]
pub async fn load_sentiment<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
) -> Result<SentimentReport> {
    let sources = config.sources.candidates(&config.files.sentiment);
    let report = loader
        .load_any("sentiment data", &sources, |loaded| {
            build_from_text(&loaded.into_text(), config)
        })
        .await?;

    info!(total = report.total, classes = report.shares.len(), "Sentiment report ready");
    Ok(report)
}

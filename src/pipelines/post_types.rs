use serde::Serialize;
use tracing::info;

use super::SeriesFilter;
use crate::analyzers::insights::compose;
use crate::analyzers::types::{Insight, InsightOptions};
use crate::config::{ALL_CATEGORY, CategoryDef, DashboardConfig};
use crate::error::Result;
use crate::fetch::{HttpClient, Loader};
use crate::format::{format_short_day, round_to};
use crate::parser::{CategoryMap, CategoryTable, parse_tagged_rows};
use crate::stats::{Record, Series, peak, percentage_share};

/// Headline card for one post type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTypeCard {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub total: f64,
    /// Share of all posts, one decimal.
    pub share_pct: f64,
    pub peak: Option<Record>,
    /// Short day of the peak, or `-`.
    pub peak_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTypesReport {
    /// Every post, including rows whose type is unknown.
    pub total: f64,
    /// Only post types that occur at least once, in configured order.
    pub cards: Vec<PostTypeCard>,
    pub insights: Vec<Insight>,
    /// "All" followed by each carded category.
    pub series: Vec<Series>,
}

impl PostTypesReport {
    /// Series a chart should draw under `filter`. "All" is always drawn.
    pub fn visible_series<'a>(&'a self, filter: &SeriesFilter) -> Vec<&'a Series> {
        self.series
            .iter()
            .filter(|s| s.category() == ALL_CATEGORY || filter.is_visible(s.category()))
            .collect()
    }
}

fn card(def: &CategoryDef, series: Series, grand_total: f64) -> PostTypeCard {
    let total: f64 = series.values().sum();
    let peak = peak(series.records());
    PostTypeCard {
        key: def.key.clone(),
        label: def.label.clone(),
        icon: def.icon.clone(),
        color: def.color.clone(),
        total,
        share_pct: round_to(percentage_share(total, grand_total), 1),
        peak,
        peak_label: peak.map_or_else(|| "-".to_string(), |p| format_short_day(p.date)),
    }
}

/// Cards, chart series and insights for a parsed table.
pub fn build_report(mut table: CategoryTable, config: &DashboardConfig) -> PostTypesReport {
    table.sort_chronologically();
    let grand_total = table.total_all();

    let mut cards = Vec::new();
    let mut series = vec![table.all_series()];
    for def in &config.post_types {
        let Some(s) = table.series(&def.key) else {
            continue;
        };
        if s.values().sum::<f64>() <= 0.0 {
            continue;
        }
        series.push(s.clone());
        cards.push(card(def, s, grand_total));
    }

    let insights = compose(&table, &InsightOptions::from(config));

    PostTypesReport {
        total: grand_total,
        cards,
        insights,
        series,
    }
}

/// Parses the tab-delimited export and builds the report.
pub fn build_from_text(raw: &str, config: &DashboardConfig) -> Result<PostTypesReport> {
    let categories = CategoryMap::from_defs(&config.post_types);
    let table = parse_tagged_rows(raw, &config.columns, &categories)?;
    Ok(build_report(table, config))
}

#[tracing::instrument(skip_all)]
pub async fn load_post_types<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
) -> Result<PostTypesReport> {
    let sources = config.sources.candidates(&config.files.post_types);
    let raw = loader.load_text("post type data", &sources).await?;
    let report = build_from_text(&raw, config)?;

    info!(
        total = report.total,
        cards = report.cards.len(),
        insights = report.insights.len(),
        "Post type report ready"
    );
    Ok(report)
}

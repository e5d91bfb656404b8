use serde::Serialize;
use tracing::info;

use super::SeriesFilter;
use crate::config::{ALL_CATEGORY, DashboardConfig};
use crate::error::Result;
use crate::fetch::{HttpClient, Loader};
use crate::format::round_to;
use crate::parser::{Section, parse_sectioned};
use crate::stats::{Series, percentage_share};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTotal {
    pub name: String,
    pub total: f64,
    /// Share of [`PostMixReport::headline_total`], one decimal.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMixReport {
    /// Sum of the typed sections.
    pub total: f64,
    /// Total of the "All" section as exported, which can differ from `total`.
    pub all_total: f64,
    /// Typed sections only, in configured order.
    pub sections: Vec<SectionTotal>,
    /// One series per section, "All" included.
    pub series: Vec<Series>,
}

impl PostMixReport {
    /// The count shown in the headline: the exported "All" total when present.
    pub fn headline_total(&self) -> f64 {
        if self.all_total > 0.0 {
            self.all_total
        } else {
            self.total
        }
    }

    pub fn visible_series<'a>(&'a self, filter: &SeriesFilter) -> Vec<&'a Series> {
        self.series
            .iter()
            .filter(|s| filter.is_visible(s.category()))
            .collect()
    }
}

/// Per-section totals and shares from parsed sections.
pub fn build_report(sections: Vec<Section>) -> PostMixReport {
    let mut all_total = 0.0;
    let mut typed = Vec::new();
    let mut series = Vec::with_capacity(sections.len());

    for section in sections {
        let total: f64 = section.records.iter().map(|r| r.value).sum();
        if section.name == ALL_CATEGORY {
            all_total = total;
        } else {
            typed.push((section.name.clone(), total));
        }
        series.push(Series::new(section.name, section.records));
    }

    let mut report = PostMixReport {
        total: typed.iter().map(|(_, t)| t).sum(),
        all_total,
        sections: Vec::with_capacity(typed.len()),
        series,
    };
    let base = report.headline_total();
    report.sections = typed
        .into_iter()
        .map(|(name, t)| SectionTotal {
            name,
            total: t,
            share_pct: round_to(percentage_share(t, base), 1),
        })
        .collect();
    report
}

pub fn build_from_text(raw: &str, config: &DashboardConfig) -> Result<PostMixReport> {
    let sections = parse_sectioned(raw, &config.post_mix_sections)?;
    Ok(build_report(sections))
}

#[tracing::instrument(skip_all)]
pub async fn load_post_mix<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
) -> Result<PostMixReport> {
    let sources = config.sources.candidates(&config.files.post_mix);
    let raw = loader.load_text("post mix data", &sources).await?;
    let report = build_from_text(&raw, config)?;

    info!(
        total = report.total,
        all_total = report.all_total,
        "Post mix report ready"
    );
    Ok(report)
}

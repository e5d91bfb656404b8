//! Static reference data and tunable thresholds.
//!
//! Everything here has a built-in default matching the published dashboards.
//! A JSON file can override any subset of it:
//! ```json
//! {
//!   "sources": { "api_base": "https://example.org", "data_roots": ["static/data"] },
//!   "thresholds": { "high_intensity": 20 }
//! }
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::analyzers::peaks::{PeakEvent, PeakEventTable};
use crate::error::Result;
use crate::fetch::Source;

/// Name of the synthetic category that counts every row.
pub const ALL_CATEGORY: &str = "All";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    pub files: DataFiles,
    pub thresholds: Thresholds,
    pub columns: TaggedColumns,
    pub peak_events: Vec<PeakEventEntry>,
    pub post_types: Vec<CategoryDef>,
    pub post_mix_sections: Vec<String>,
    pub engagement_categories: Vec<String>,
    pub metrics: Vec<MetricDef>,
    pub sentiment_labels: BTreeMap<String, String>,
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Built-in defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn peak_table(&self) -> PeakEventTable {
        self.peak_events
            .iter()
            .map(|e| {
                (
                    e.date,
                    PeakEvent {
                        title: e.title.clone(),
                        description: e.description.clone(),
                    },
                )
            })
            .collect()
    }

    pub fn sentiment_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.sentiment_labels
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            files: DataFiles::default(),
            thresholds: Thresholds::default(),
            columns: TaggedColumns::default(),
            peak_events: default_peak_events(),
            post_types: default_post_types(),
            post_mix_sections: ["All", "Reposts", "Original Posts", "Quote Posts", "Replies"]
                .into_iter()
                .map(String::from)
                .collect(),
            engagement_categories: ["Replies", "Quote Posts", "Reposts"]
                .into_iter()
                .map(String::from)
                .collect(),
            metrics: default_metrics(),
            sentiment_labels: [
                ("positive", "Positive"),
                ("neutral", "Neutral"),
                ("negative", "Negative"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }
}

/// Where data comes from: an optional pre-aggregating API and the ordered
/// list of roots that static files may be hosted under.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub api_base: Option<String>,
    pub news_endpoint: String,
    pub data_roots: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            news_endpoint: "/api/news-mentions".to_string(),
            data_roots: vec![
                "static/data".to_string(),
                "./static/data".to_string(),
                "docs/static/data".to_string(),
            ],
        }
    }
}

impl SourceConfig {
    /// The pre-aggregated news endpoint, when an API base is configured.
    pub fn news_api(&self) -> Option<Source> {
        self.api_base.as_ref().map(|base| {
            Source::json(format!(
                "{}{}",
                base.trim_end_matches('/'),
                self.news_endpoint
            ))
        })
    }

    /// Every root joined with `file`, in declared order.
    pub fn candidates(&self, file: &str) -> Vec<Source> {
        self.data_roots
            .iter()
            .map(|root| {
                let root = root.trim_end_matches('/');
                if root.is_empty() {
                    Source::text(file)
                } else {
                    Source::text(format!("{root}/{file}"))
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub news_mentions: String,
    pub post_types: String,
    pub post_mix: String,
    pub sentiment: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            news_mentions: "mentions_trend.csv".to_string(),
            post_types: "fromawqaf_ksa.csv".to_string(),
            post_mix: "post_type_trend.csv".to_string(),
            sentiment: "sentiment_breakdown.csv".to_string(),
        }
    }
}

/// Cutoffs used by the aggregator and the insight bands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub high_intensity: f64,
    pub top_peaks: usize,
    pub top_months: usize,
    pub trend_window: usize,
    pub trend_stable_pct: f64,
    pub dominant_share_pct: f64,
    pub consistency_excellent_pct: f64,
    pub consistency_good_pct: f64,
    pub engagement_high_pct: f64,
    pub engagement_good_pct: f64,
    pub acceleration_ratio: f64,
    pub slowdown_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_intensity: 15.0,
            top_peaks: 3,
            top_months: 5,
            trend_window: 7,
            trend_stable_pct: 5.0,
            dominant_share_pct: 70.0,
            consistency_excellent_pct: 80.0,
            consistency_good_pct: 60.0,
            engagement_high_pct: 25.0,
            engagement_good_pct: 15.0,
            acceleration_ratio: 1.2,
            slowdown_ratio: 0.8,
        }
    }
}

/// Header names located in the tab-delimited export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaggedColumns {
    pub date: String,
    pub category: String,
}

impl Default for TaggedColumns {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            category: "Content Type".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeakEventEntry {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
}

/// A post type as shown on the dashboard, plus the raw export values that map to it.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDef {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricDef {
    pub id: String,
    pub label: String,
    pub file: String,
}

fn default_peak_events() -> Vec<PeakEventEntry> {
    let entry = |y, m, d, title: &str, description: &str| PeakEventEntry {
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        title: title.to_string(),
        description: description.to_string(),
    };
    vec![
        entry(
            2025,
            1,
            23,
            "LEAP 2025",
            "Launch of the Awqaf digital services platform at LEAP 2025",
        ),
        entry(
            2025,
            8,
            12,
            "Eastern Province reception",
            "The Eastern Province governor receives the authority's staff and praises the leadership's support",
        ),
        entry(
            2025,
            8,
            11,
            "Annual report",
            "Publication of the authority's annual report and the TEDxKAU community initiative",
        ),
        entry(
            2024,
            12,
            25,
            "Digital services",
            "The authority's digital services become available through the Tawakkalna app",
        ),
        entry(
            2024,
            12,
            30,
            "Memorandum of understanding",
            "Signing of a memorandum of understanding with the Ministry of Culture",
        ),
        entry(
            2025,
            10,
            18,
            "Endowment establishment rules",
            "Issue of the regulation governing endowment establishment and transparent fundraising",
        ),
        entry(
            2025,
            2,
            6,
            "Violations schedule",
            "Announcement of the violations and penalties schedule for endowment stewardship",
        ),
        entry(
            2025,
            4,
            22,
            "Governance principles",
            "Draft principles for endowment governance, transparency and accountability",
        ),
    ]
}

fn default_post_types() -> Vec<CategoryDef> {
    let def = |key: &str, label: &str, icon: &str, color: &str, aliases: &[&str]| CategoryDef {
        key: key.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    };
    vec![
        def(
            "Original Posts",
            "Original posts",
            "📝",
            "#3498db",
            &["social post", "original post", "social"],
        ),
        def("Reposts", "Reposts", "🔄", "#e74c3c", &["repost", "retweet"]),
        def(
            "Quote Posts",
            "Quotes",
            "💬",
            "#27ae60",
            &["quote", "quote post", "quote tweet"],
        ),
        def("Replies", "Replies", "↩️", "#9b59b6", &["reply"]),
        def(
            "Direct Messages",
            "Direct messages",
            "✉️",
            "#95a5a6",
            &["direct message"],
        ),
    ]
}

fn default_metrics() -> Vec<MetricDef> {
    let def = |id: &str, label: &str, file: &str| MetricDef {
        id: id.to_string(),
        label: label.to_string(),
        file: file.to_string(),
    };
    vec![
        def("views", "Views", "views_timeseries.csv"),
        def("reach", "Reach", "reach_timeseries.csv"),
        def("impressions", "Estimated impressions", "impressions_timeseries.csv"),
        def("authors", "Active publishing days", "authors_timeseries.csv"),
    ]
}

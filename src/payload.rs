//! The news-mentions payload: one shape for both the pre-aggregated API and
//! the CSV fallback.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::analyzers::peaks::{AnnotatedPeak, annotate_peaks};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::format::round_to;
use crate::stats::{
    MonthTotal, Record, Series, active_days, high_intensity_days, longest_zero_streak,
    mean_over_all_days, monthly_totals, peak, total, zero_days,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub series: Vec<SeriesPoint>,
    pub summary: PayloadSummary,
    #[serde(default)]
    pub top_peaks: Vec<TopPeak>,
    #[serde(default)]
    pub top_months: Vec<MonthTotal>,
    #[serde(default)]
    pub top_topics: Vec<TopicBreakdown>,
    #[serde(default)]
    pub top_newspapers: Vec<OutletBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub count: f64,
}

impl From<&Record> for SeriesPoint {
    fn from(r: &Record) -> Self {
        Self {
            date: r.date,
            count: r.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadSummary {
    pub total_mentions: f64,
    /// Mean over every day of the series, one decimal.
    #[serde(deserialize_with = "number_or_string")]
    pub daily_average: f64,
    pub peak: f64,
    pub coverage_days: usize,
    pub zero_days: usize,
    pub high_intensity_days: usize,
    #[serde(default)]
    pub longest_zero_streak: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPeak {
    pub date: NaiveDate,
    pub label: String,
    pub count: f64,
    pub title: String,
    pub description: String,
}

impl From<AnnotatedPeak> for TopPeak {
    fn from(p: AnnotatedPeak) -> Self {
        Self {
            date: p.date,
            label: p.label,
            count: p.value,
            title: p.title,
            description: p.description,
        }
    }
}

/// Only ever supplied by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBreakdown {
    pub label: String,
    #[serde(default)]
    pub count: f64,
    #[serde(default)]
    pub percentage: f64,
}

/// Only ever supplied by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutletBreakdown {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub total_reach: f64,
    #[serde(default)]
    pub mentions: f64,
    #[serde(default)]
    pub latest_date: Option<String>,
    #[serde(default)]
    pub top_topics: Vec<TopicBreakdown>,
}

/// The API has sent `daily_average` both as a number and as a preformatted string.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(serde::de::Error::custom),
    }
}

impl DashboardPayload {
    /// Builds the payload from a parsed CSV series.
    pub fn from_series(series: &Series, config: &DashboardConfig) -> Self {
        let records = series.records();
        let thresholds = &config.thresholds;

        let mut top_months = monthly_totals(records);
        top_months.truncate(thresholds.top_months);

        Self {
            series: records.iter().map(SeriesPoint::from).collect(),
            summary: PayloadSummary {
                total_mentions: total(records),
                daily_average: round_to(mean_over_all_days(records), 1),
                peak: peak(records).map_or(0.0, |p| p.value),
                coverage_days: active_days(records),
                zero_days: zero_days(records),
                high_intensity_days: high_intensity_days(records, thresholds.high_intensity),
                longest_zero_streak: longest_zero_streak(records),
            },
            top_peaks: annotate_peaks(series, thresholds.top_peaks, &config.peak_table())
                .into_iter()
                .map(TopPeak::from)
                .collect(),
            top_months,
            top_topics: Vec::new(),
            top_newspapers: Vec::new(),
        }
    }

    /// Checks the invariants the rest of the dashboard relies on.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.series.len());
        for point in &self.series {
            if !seen.insert(point.date) {
                return Err(DashboardError::InvalidPayload(format!(
                    "duplicate date {} in series",
                    point.date
                )));
            }
            check_count("series count", point.count)?;
        }

        let s = &self.summary;
        check_count("total_mentions", s.total_mentions)?;
        check_count("daily_average", s.daily_average)?;
        check_count("peak", s.peak)?;

        for peak in &self.top_peaks {
            check_count("top peak count", peak.count)?;
        }

        let topics = self
            .top_topics
            .iter()
            .chain(self.top_newspapers.iter().flat_map(|o| &o.top_topics));
        for topic in topics {
            if !(0.0..=100.0).contains(&topic.percentage) {
                return Err(DashboardError::InvalidPayload(format!(
                    "topic \"{}\" has percentage {} outside 0-100",
                    topic.label, topic.percentage
                )));
            }
        }

        Ok(())
    }

    /// The series as records, for re-aggregation.
    pub fn records(&self) -> Vec<Record> {
        self.series
            .iter()
            .map(|p| Record {
                date: p.date,
                value: p.count,
            })
            .collect()
    }
}

fn check_count(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DashboardError::InvalidPayload(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn three_days() -> Series {
        Series::new(
            "All",
            vec![
                Record { date: day(1), value: 10.0 },
                Record { date: day(2), value: 0.0 },
                Record { date: day(3), value: 20.0 },
            ],
        )
    }

    #[test]
    fn test_from_series_news_scenario() {
        let payload = DashboardPayload::from_series(&three_days(), &DashboardConfig::default());
        let s = &payload.summary;
        assert_eq!(s.total_mentions, 30.0);
        assert_eq!(s.peak, 20.0);
        assert_eq!(s.zero_days, 1);
        assert_eq!(s.coverage_days, 2);
        assert_eq!(s.high_intensity_days, 1);
        assert_eq!(s.daily_average, 10.0);
        assert_eq!(s.longest_zero_streak, 1);

        assert_eq!(payload.top_peaks.len(), 3);
        assert_eq!(payload.top_peaks[0].date, day(3));
        assert_eq!(payload.top_months.len(), 1);
        assert!(payload.top_topics.is_empty());
        payload.validate().unwrap();
    }

    #[test]
    fn test_from_empty_series() {
        let payload =
            DashboardPayload::from_series(&Series::new("All", vec![]), &DashboardConfig::default());
        assert_eq!(payload.summary.daily_average, 0.0);
        assert_eq!(payload.summary.peak, 0.0);
        assert!(payload.top_peaks.is_empty());
    }

    #[test]
    fn test_api_payload_with_string_average() {
        let raw = json!({
            "series": [{"date": "2025-01-01", "count": 4}],
            "summary": {
                "total_mentions": 4,
                "daily_average": "4.0",
                "peak": 4,
                "coverage_days": 1,
                "zero_days": 0,
                "high_intensity_days": 0
            },
            "top_peaks": [],
            "top_months": [{"label": "Jan 2025", "count": 4}],
            "top_topics": [{"label": "Governance", "count": 3, "percentage": 75.0}],
            "top_newspapers": [{"name": "Okaz", "mentions": 2, "total_reach": 1000}]
        });
        let payload: DashboardPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.summary.daily_average, 4.0);
        assert_eq!(payload.summary.longest_zero_streak, 0);
        assert_eq!(payload.top_newspapers[0].name, "Okaz");
        payload.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicate_dates() {
        let mut payload = DashboardPayload::from_series(&three_days(), &DashboardConfig::default());
        payload.series.push(SeriesPoint { date: day(1), count: 1.0 });
        assert!(matches!(
            payload.validate(),
            Err(DashboardError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_percentage_and_negative_count() {
        let mut payload = DashboardPayload::from_series(&three_days(), &DashboardConfig::default());
        payload.top_topics.push(TopicBreakdown {
            label: "x".into(),
            count: 1.0,
            percentage: 140.0,
        });
        assert!(payload.validate().is_err());

        let mut payload = DashboardPayload::from_series(&three_days(), &DashboardConfig::default());
        payload.series[0].count = -1.0;
        assert!(payload.validate().is_err());
    }
}

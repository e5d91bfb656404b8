//! Aggregation over per-day series: totals, averages, activity counts,
//! zero streaks, peaks and shares.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub value: f64,
}

/// Chronologically ordered records for one category; each date appears once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    category: String,
    records: Vec<Record>,
}

impl Series {
    /// Sorts `records` by date (stable). When a date repeats, the last value wins.
    pub fn new(category: impl Into<String>, mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.date);

        let mut unique: Vec<Record> = Vec::with_capacity(records.len());
        for record in records {
            match unique.last_mut() {
                Some(last) if last.date == record.date => last.value = record.value,
                _ => unique.push(record),
            }
        }

        Self {
            category: category.into(),
            records: unique,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.value)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Knobs for [`aggregate`].
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Days at or above this value count as high-intensity.
    pub high_intensity_threshold: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            high_intensity_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub category: String,
    pub total_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total: f64,
    /// `total / total_days`
    pub mean_over_all_days: f64,
    /// `total / active_days`
    pub mean_over_active_days: f64,
    pub peak: Option<Record>,
    pub min_non_zero: f64,
    pub latest: Option<Record>,
    pub active_days: usize,
    pub zero_days: usize,
    pub high_intensity_days: usize,
    pub longest_zero_streak: usize,
}

impl Summary {
    /// Active days as a percentage of all days.
    pub fn activity_rate(&self) -> f64 {
        percentage_share(self.active_days as f64, self.total_days as f64)
    }
}

/// Collects every statistic for `series` into a [`Summary`].
pub fn aggregate(series: &Series, options: &AggregateOptions) -> Summary {
    let records = series.records();
    Summary {
        category: series.category().to_string(),
        total_days: records.len(),
        first_date: records.first().map(|r| r.date),
        last_date: records.last().map(|r| r.date),
        total: total(records),
        mean_over_all_days: mean_over_all_days(records),
        mean_over_active_days: mean_over_active_days(records),
        peak: peak(records),
        min_non_zero: min_non_zero(records),
        latest: records.last().copied(),
        active_days: active_days(records),
        zero_days: zero_days(records),
        high_intensity_days: high_intensity_days(records, options.high_intensity_threshold),
        longest_zero_streak: longest_zero_streak(records),
    }
}

pub fn total(records: &[Record]) -> f64 {
    records.iter().map(|r| r.value).sum()
}

/// Mean over every day in the series, silent days included. 0 for an empty series.
pub fn mean_over_all_days(records: &[Record]) -> f64 {
    if records.is_empty() {
        0.0
    } else {
        total(records) / records.len() as f64
    }
}

/// Mean over days with a value above zero. 0 when there are none.
pub fn mean_over_active_days(records: &[Record]) -> f64 {
    let active = active_days(records);
    if active == 0 {
        0.0
    } else {
        total(records) / active as f64
    }
}

pub fn active_days(records: &[Record]) -> usize {
    records.iter().filter(|r| r.value > 0.0).count()
}

pub fn zero_days(records: &[Record]) -> usize {
    records.iter().filter(|r| r.value == 0.0).count()
}

pub fn high_intensity_days(records: &[Record], threshold: f64) -> usize {
    records.iter().filter(|r| r.value >= threshold).count()
}

/// Longest run of consecutive zero-value records. Expects chronological order.
pub fn longest_zero_streak(records: &[Record]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for r in records {
        if r.value == 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// The first record holding the maximum value, among values above zero.
pub fn peak(records: &[Record]) -> Option<Record> {
    records.iter().fold(None, |best: Option<Record>, r| match best {
        Some(b) if b.value >= r.value => Some(b),
        _ if r.value > 0.0 => Some(*r),
        _ => best,
    })
}

/// Smallest value above zero, or 0 when there is none.
pub fn min_non_zero(records: &[Record]) -> f64 {
    records
        .iter()
        .map(|r| r.value)
        .filter(|v| *v > 0.0)
        .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))))
        .unwrap_or(0.0)
}

/// The `k` largest records. Equal values keep their original order, so the
/// earlier date ranks first.
pub fn top_values(records: &[Record], k: usize) -> Vec<Record> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(k);
    ranked
}

/// `100 * part / total`, or 0 when `total` is 0.
pub fn percentage_share(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        (part / total) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    pub label: String,
    pub count: f64,
}

/// Calendar-month totals ranked by count; ties keep calendar order.
pub fn monthly_totals(records: &[Record]) -> Vec<MonthTotal> {
    let mut months: Vec<MonthTotal> = Vec::new();
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.date);

    for r in &sorted {
        let (year, month) = (r.date.year(), r.date.month());
        match months.last_mut() {
            Some(m) if m.year == year && m.month == month => m.count += r.value,
            _ => months.push(MonthTotal {
                year,
                month,
                label: r.date.format("%b %Y").to_string(),
                count: r.value,
            }),
        }
    }

    months.sort_by(|a, b| b.count.total_cmp(&a.count));
    months
}

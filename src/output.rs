//! Output formatting and persistence for page reports.
//!
//! Supports pretty-printing, JSON documents, and CSV append.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::format::round_to;
use crate::stats::Summary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(report: &T) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as a pretty JSON document, replacing any previous file.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, report: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}

#[derive(Debug, Serialize)]
struct ErrorState<'a> {
    error: &'a str,
}

/// Writes `{"error": message}` so a renderer shows the failure instead of an empty chart.
pub fn write_error_state(path: impl AsRef<Path>, message: &str) -> Result<()> {
    write_json(path, &ErrorState { error: message })
}

/// Flat, CSV-friendly view of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_days: usize,
    pub total: f64,
    pub mean_over_all_days: f64,
    pub mean_over_active_days: f64,
    pub peak_value: f64,
    pub peak_date: Option<NaiveDate>,
    pub min_non_zero: f64,
    pub latest_value: Option<f64>,
    pub active_days: usize,
    pub zero_days: usize,
    pub high_intensity_days: usize,
    pub longest_zero_streak: usize,
    pub activity_rate: f64,
}

impl From<&Summary> for SummaryRow {
    fn from(s: &Summary) -> Self {
        Self {
            category: s.category.clone(),
            first_date: s.first_date,
            last_date: s.last_date,
            total_days: s.total_days,
            total: s.total,
            mean_over_all_days: round_to(s.mean_over_all_days, 2),
            mean_over_active_days: round_to(s.mean_over_active_days, 2),
            peak_value: s.peak.map_or(0.0, |p| p.value),
            peak_date: s.peak.map(|p| p.date),
            min_non_zero: s.min_non_zero,
            latest_value: s.latest.map(|r| r.value),
            active_days: s.active_days,
            zero_days: s.zero_days,
            high_intensity_days: s.high_intensity_days,
            longest_zero_streak: s.longest_zero_streak,
            activity_rate: round_to(s.activity_rate(), 1),
        }
    }
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record<T: Serialize>(path: impl AsRef<Path>, record: &T) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

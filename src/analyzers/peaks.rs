//! Curated real-world events used to explain publishing peaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::format::{format_count, format_day};
use crate::stats::{Record, Series, top_values};

pub const GENERIC_PEAK_TITLE: &str = "Publishing spike";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakEvent {
    pub title: String,
    pub description: String,
}

/// Date -> event lookup. Static reference data, never derived from input.
#[derive(Debug, Clone, Default)]
pub struct PeakEventTable {
    events: HashMap<NaiveDate, PeakEvent>,
}

impl PeakEventTable {
    pub fn get(&self, date: NaiveDate) -> Option<&PeakEvent> {
        self.events.get(&date)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<(NaiveDate, PeakEvent)> for PeakEventTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, PeakEvent)>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedPeak {
    pub date: NaiveDate,
    pub label: String,
    pub value: f64,
    pub title: String,
    pub description: String,
    /// Whether the title came from the curated table.
    pub curated: bool,
}

/// Attaches the curated event for `record.date`, or a generic description.
pub fn annotate(record: Record, table: &PeakEventTable) -> AnnotatedPeak {
    let (title, description, curated) = match table.get(record.date) {
        Some(event) => (event.title.clone(), event.description.clone(), true),
        None => (
            GENERIC_PEAK_TITLE.to_string(),
            format!(
                "{} news items published on this day",
                format_count(record.value)
            ),
            false,
        ),
    };

    AnnotatedPeak {
        date: record.date,
        label: format_day(record.date),
        value: record.value,
        title,
        description,
        curated,
    }
}

/// The `k` highest days of `series`, earlier dates first on ties, annotated.
pub fn annotate_peaks(series: &Series, k: usize, table: &PeakEventTable) -> Vec<AnnotatedPeak> {
    top_values(series.records(), k)
        .into_iter()
        .map(|r| annotate(r, table))
        .collect()
}

//! Series parser: loosely structured delimited text into per-day records.
//!
//! Four shapes are understood:
//! - `date,count` rows ([`parse_daily_counts`])
//! - tab-delimited exports with named columns, one row per post ([`parse_tagged_rows`])
//! - `date,count` blocks under section header lines ([`parse_sectioned`])
//! - `category,count` rows ([`parse_category_counts`])
//!
//! All of them strip a BOM, skip blank lines, unquote fields and read numbers
//! leniently: a cell that is not a usable number counts as zero instead of
//! failing the whole file.

mod categories;
mod daily;
mod sectioned;
mod tagged;

pub use categories::{CategoryCount, parse_category_counts};
pub use daily::parse_daily_counts;
pub use sectioned::{Section, parse_sectioned};
pub use tagged::{Category, CategoryMap, CategoryTable, DailyBreakdown, parse_tagged_rows};

use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

use crate::stats::Record;

/// Keeps the calendar day of a `date` or `date time` cell.
pub fn parse_day(cell: &str) -> Option<NaiveDate> {
    let day = cell.trim().trim_matches('"').split(' ').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Reads a count cell. A plain number is taken as is; otherwise separators
/// and stray symbols are dropped first, so `"1,234"` reads as 1234. Negative
/// or non-finite values are rejected.
pub fn parse_value(cell: &str) -> Option<f64> {
    let parsed = cell.trim().parse::<f64>().or_else(|_| {
        cell.chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect::<String>()
            .parse::<f64>()
    });
    match parsed {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

/// [`parse_value`], recovering a malformed cell as zero.
pub(crate) fn value_or_zero(cell: &str, line: u64) -> f64 {
    parse_value(cell).unwrap_or_else(|| {
        debug!(line, cell, "Malformed value, counting as zero");
        0.0
    })
}

pub(crate) fn strip_bom(raw: &str) -> Cow<'_, str> {
    if raw.contains('\u{feff}') {
        Cow::Owned(raw.replace('\u{feff}', ""))
    } else {
        Cow::Borrowed(raw)
    }
}

/// With `quoting` off, `"` is an ordinary character and a stray one cannot
/// swallow the rows after it.
pub(crate) fn reader(
    text: &str,
    delimiter: u8,
    has_headers: bool,
    quoting: bool,
) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .quoting(quoting)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

pub(crate) fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}

/// Per-day values in first-seen order; a repeated day overwrites the value
/// but keeps its original position.
#[derive(Debug, Default)]
pub(crate) struct DailyRecords {
    records: Vec<Record>,
    index: HashMap<NaiveDate, usize>,
}

impl DailyRecords {
    pub(crate) fn set(&mut self, date: NaiveDate, value: f64) {
        match self.index.get(&date) {
            Some(&i) => self.records[i].value = value,
            None => {
                self.index.insert(date, self.records.len());
                self.records.push(Record { date, value });
            }
        }
    }

    pub(crate) fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_keeps_date_part() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 23);
        assert_eq!(parse_day("2025-01-23 10:00:00"), expected);
        assert_eq!(parse_day("\"2025-01-23\""), expected);
        assert_eq!(parse_day(" 2025-01-23 "), expected);
        assert_eq!(parse_day("Date"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("7"), Some(7.0));
        assert_eq!(parse_value("1,234"), Some(1234.0));
        assert_eq!(parse_value("12.5 "), Some(12.5));
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("-3"), None);
    }

    #[test]
    fn test_parse_value_keeps_plain_numbers() {
        assert_eq!(parse_value("1e3"), Some(1000.0));
        assert_eq!(parse_value(" 2.5E1 "), Some(25.0));
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}Date,Count"), "Date,Count");
        assert!(matches!(strip_bom("Date,Count"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_daily_records_last_value_first_position() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut days = DailyRecords::default();
        days.set(d1, 1.0);
        days.set(d2, 2.0);
        days.set(d1, 5.0);

        let records = days.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record { date: d1, value: 5.0 });
        assert_eq!(records[1], Record { date: d2, value: 2.0 });
    }
}

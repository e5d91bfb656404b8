use tracing::{debug, warn};

use super::{DailyRecords, line_of, parse_day, reader, strip_bom, value_or_zero};
use crate::error::ParseError;
use crate::stats::Record;

/// Parses `date,count` rows into records in first-seen order.
///
/// The date cell may carry a time (`"2025-01-23 10:00:00"`); only the day is
/// kept. A first row without a readable date is taken as the header. Later
/// rows without a readable date, or without a count cell, are skipped.
///
/// # Errors
///
/// Only reader-level failures; malformed counts are read as zero.
pub fn parse_daily_counts(raw: &str) -> Result<Vec<Record>, ParseError> {
    let text = strip_bom(raw);
    let mut rdr = reader(&text, b',', false, true);
    let mut days = DailyRecords::default();

    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let line = line_of(&row);
        let date_cell = row.get(0).unwrap_or("");

        let Some(date) = parse_day(date_cell) else {
            if i == 0 {
                debug!(line, "Skipping header row");
            } else if !date_cell.is_empty() {
                warn!(line, cell = date_cell, "Skipping row with unreadable date");
            }
            continue;
        };

        let Some(value_cell) = row.get(1) else {
            warn!(line, "Skipping row without a count");
            continue;
        };

        days.set(date, value_or_zero(value_cell, line));
    }

    Ok(days.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quoted_date_time_keeps_day() {
        let records = parse_daily_counts("\"2025-01-23 10:00:00\",7\n").unwrap();
        assert_eq!(
            records,
            vec![Record {
                date: day(2025, 1, 23),
                value: 7.0
            }]
        );
    }

    #[test]
    fn test_header_bom_and_blank_lines() {
        let raw = "\u{feff}Date,Count\r\n\r\n2025-01-01,10\n\n2025-01-02,0\n";
        let records = parse_daily_counts(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, day(2025, 1, 1));
        assert_eq!(records[1].value, 0.0);
    }

    #[test]
    fn test_malformed_value_counts_as_zero() {
        let mut raw = String::from("date,count\n\"2025-01-01\",abc\n");
        for d in 2..=10 {
            raw.push_str(&format!("2025-01-{d:02},{d}\n"));
        }

        let records = parse_daily_counts(&raw).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].date, day(2025, 1, 1));
        assert_eq!(records[0].value, 0.0);
        assert_eq!(records[9].value, 10.0);
    }

    #[test]
    fn test_trailing_comma_and_missing_count() {
        let raw = "\"2025-01-01 00:00:00\",4,\n2025-01-02\n2025-01-03,\n";
        let records = parse_daily_counts(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, 4.0);
        assert_eq!(records[1].date, day(2025, 1, 3));
        assert_eq!(records[1].value, 0.0);
    }

    #[test]
    fn test_source_order_is_preserved() {
        let raw = "2025-01-03,3\n2025-01-01,1\n2025-01-02,2\n";
        let dates: Vec<_> = parse_daily_counts(raw)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![day(2025, 1, 3), day(2025, 1, 1), day(2025, 1, 2)]);
    }

    #[test]
    fn test_unreadable_date_rows_are_skipped() {
        let raw = "2025-01-01,1\nnot-a-date,5\n2025-01-02,2\n";
        assert_eq!(parse_daily_counts(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_daily_counts("").unwrap().is_empty());
        assert!(parse_daily_counts("\u{feff}\n\n").unwrap().is_empty());
    }
}

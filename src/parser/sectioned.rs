use serde::Serialize;
use tracing::debug;

use super::{DailyRecords, line_of, parse_day, reader, strip_bom, value_or_zero};
use crate::error::ParseError;
use crate::stats::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub records: Vec<Record>,
}

/// Parses an export where `date,count` blocks sit under section header lines:
///
/// ```text
/// Mention Type Trend
/// All
/// Date,Count
/// "2025-01-01 00:00:00",12,
/// Reposts
/// Date,Count
/// "2025-01-01 00:00:00",3,
/// ```
///
/// A line equal to one of `section_names` moves the cursor; data rows belong
/// to the section under the cursor until the next header. Rows before the
/// first header, titles and column headers are ignored. One [`Section`] is
/// returned per name, in the order given, empty when absent from the text.
pub fn parse_sectioned(raw: &str, section_names: &[String]) -> Result<Vec<Section>, ParseError> {
    let text = strip_bom(raw);
    let mut rdr = reader(&text, b',', false, true);
    let mut sections: Vec<DailyRecords> = section_names.iter().map(|_| DailyRecords::default()).collect();
    let mut cursor: Option<usize> = None;

    for result in rdr.records() {
        let row = result?;
        let line = line_of(&row);
        let first = row.get(0).unwrap_or("");

        let rest_empty = row.iter().skip(1).all(str::is_empty);
        if rest_empty {
            if let Some(idx) = section_names.iter().position(|name| name == first) {
                debug!(line, section = first, "Entering section");
                cursor = Some(idx);
                continue;
            }
        }

        let Some(current) = cursor else {
            continue;
        };
        let Some(date) = parse_day(first) else {
            continue;
        };
        let Some(value_cell) = row.get(1) else {
            continue;
        };

        sections[current].set(date, value_or_zero(value_cell, line));
    }

    Ok(section_names
        .iter()
        .zip(sections)
        .map(|(name, days)| Section {
            name: name.clone(),
            records: days.into_records(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn names() -> Vec<String> {
        ["All", "Reposts", "Original Posts"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    const SAMPLE: &str = "\
Mention Type Trend
All
Date,Count
\"2025-01-01 00:00:00\",12,
\"2025-01-02 00:00:00\",8,

Reposts
Date,Count
\"2025-01-01 00:00:00\",3,
\"2025-01-02 00:00:00\",x,
Original Posts
\"2025-01-02 00:00:00\",5,
";

    #[test]
    fn test_rows_follow_the_section_cursor() {
        let sections = parse_sectioned(SAMPLE, &names()).unwrap();
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].name, "All");
        assert_eq!(sections[0].records.len(), 2);
        assert_eq!(sections[0].records[0].value, 12.0);

        assert_eq!(sections[1].records.len(), 2);
        assert_eq!(sections[1].records[1].value, 0.0);

        assert_eq!(
            sections[2].records,
            vec![Record {
                date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                value: 5.0
            }]
        );
    }

    #[test]
    fn test_rows_before_any_header_are_ignored() {
        let raw = "2025-01-01,9\nReposts\n2025-01-01,1\n";
        let sections = parse_sectioned(raw, &names()).unwrap();
        assert!(sections[0].records.is_empty());
        assert_eq!(sections[1].records.len(), 1);
        assert_eq!(sections[1].records[0].value, 1.0);
    }

    #[test]
    fn test_absent_sections_are_empty() {
        let sections = parse_sectioned("All\n2025-01-01,1\n", &names()).unwrap();
        assert!(sections[1].records.is_empty());
        assert!(sections[2].records.is_empty());
    }
}

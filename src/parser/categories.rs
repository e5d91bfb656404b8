use serde::Serialize;
use tracing::debug;

use super::{line_of, parse_value, reader, strip_bom, value_or_zero};
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: f64,
}

/// Parses `category,count` rows such as a sentiment breakdown.
///
/// Keys are trimmed and lower-cased; repeated keys are summed in first-seen
/// order. A first row whose count is not a number is the header.
pub fn parse_category_counts(raw: &str) -> Result<Vec<CategoryCount>, ParseError> {
    let text = strip_bom(raw);
    let mut rdr = reader(&text, b',', false, true);
    let mut counts: Vec<CategoryCount> = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let line = line_of(&row);
        let key = row.get(0).unwrap_or("").to_lowercase();
        if key.is_empty() {
            continue;
        }
        let cell = row.get(1).unwrap_or("");
        if i == 0 && parse_value(cell).is_none() {
            debug!(line, "Skipping header row");
            continue;
        }

        let count = value_or_zero(cell, line);
        match counts.iter_mut().find(|c| c.category == key) {
            Some(existing) => existing.count += count,
            None => counts.push(CategoryCount {
                category: key,
                count,
            }),
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_rows() {
        let raw = "sentiment,count\nPositive,120\n neutral ,300\nnegative,30\n";
        let counts = parse_category_counts(raw).unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].category, "positive");
        assert_eq!(counts[1].category, "neutral");
        assert_eq!(counts[1].count, 300.0);
    }

    #[test]
    fn test_headerless_input_keeps_first_row() {
        let counts = parse_category_counts("positive,5\nnegative,2\n").unwrap();
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_duplicates_are_summed_and_bad_counts_zeroed() {
        let raw = "sentiment,count\npositive,5\nnegative,n/a\npositive,2\n";
        let counts = parse_category_counts(raw).unwrap();
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "positive".into(),
                    count: 7.0
                },
                CategoryCount {
                    category: "negative".into(),
                    count: 0.0
                },
            ]
        );
    }
}

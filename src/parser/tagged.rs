use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use super::{line_of, parse_day, reader, strip_bom};
use crate::config::{ALL_CATEGORY, CategoryDef, TaggedColumns};
use crate::error::ParseError;
use crate::stats::{Record, Series};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

/// Normalises raw export values ("Retweet", "quote tweet", ...) to category keys.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    categories: Vec<Category>,
    aliases: HashMap<String, usize>,
}

impl CategoryMap {
    pub fn from_defs(defs: &[CategoryDef]) -> Self {
        let mut aliases = HashMap::new();
        let categories = defs
            .iter()
            .enumerate()
            .map(|(i, def)| {
                aliases.insert(def.key.to_lowercase(), i);
                for alias in &def.aliases {
                    aliases.insert(alias.trim().to_lowercase(), i);
                }
                Category {
                    key: def.key.clone(),
                    label: def.label.clone(),
                }
            })
            .collect();
        Self {
            categories,
            aliases,
        }
    }

    /// Index of the category `raw` maps to, ignoring case and padding.
    pub fn normalize(&self, raw: &str) -> Option<usize> {
        self.aliases.get(&raw.trim().to_lowercase()).copied()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// Post counts for one day: everything, and per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub all: f64,
    /// Aligned with [`CategoryTable::categories`].
    pub counts: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTable {
    pub categories: Vec<Category>,
    pub days: Vec<DailyBreakdown>,
}

impl CategoryTable {
    pub fn empty(categories: Vec<Category>) -> Self {
        Self {
            categories,
            days: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn sort_chronologically(&mut self) {
        self.days.sort_by_key(|d| d.date);
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.key == key)
    }

    pub fn total_all(&self) -> f64 {
        self.days.iter().map(|d| d.all).sum()
    }

    /// Per-category totals, aligned with `categories`.
    pub fn totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.categories.len()];
        for day in &self.days {
            for (total, count) in totals.iter_mut().zip(&day.counts) {
                *total += count;
            }
        }
        totals
    }

    /// The "All" counts as a chronological series.
    pub fn all_series(&self) -> Series {
        Series::new(
            ALL_CATEGORY,
            self.days
                .iter()
                .map(|d| Record {
                    date: d.date,
                    value: d.all,
                })
                .collect(),
        )
    }

    pub fn series(&self, key: &str) -> Option<Series> {
        let idx = self.index_of(key)?;
        Some(Series::new(
            key,
            self.days
                .iter()
                .map(|d| Record {
                    date: d.date,
                    value: d.counts[idx],
                })
                .collect(),
        ))
    }
}

/// Counts posts per day and category from a tab-delimited export.
///
/// The date and category columns are found by header name. Every row with a
/// readable date adds one to that day's "All" count, and one to its category
/// when the raw type is known to `categories`. Days are in first-seen order.
///
/// # Errors
///
/// [`ParseError::MissingColumn`] when either named column is absent from the
/// header; nothing is returned in that case.
pub fn parse_tagged_rows(
    raw: &str,
    columns: &TaggedColumns,
    categories: &CategoryMap,
) -> Result<CategoryTable, ParseError> {
    let text = strip_bom(raw);
    let mut table = CategoryTable::empty(categories.categories().to_vec());
    if text.trim().is_empty() {
        return Ok(table);
    }

    let mut rdr = reader(&text, b'\t', true, false);
    let headers = rdr.headers()?.clone();
    let date_idx = find_column(&headers, &columns.date)?;
    let type_idx = find_column(&headers, &columns.category)?;

    let width = table.categories.len();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for result in rdr.records() {
        let row = result?;
        let date_cell = row.get(date_idx).unwrap_or("");
        if date_cell.is_empty() {
            continue;
        }
        let Some(date) = parse_day(date_cell) else {
            warn!(line = line_of(&row), cell = date_cell, "Skipping row with unreadable date");
            continue;
        };

        let pos = *index.entry(date).or_insert_with(|| {
            table.days.push(DailyBreakdown {
                date,
                all: 0.0,
                counts: vec![0.0; width],
            });
            table.days.len() - 1
        });

        let day = &mut table.days[pos];
        day.all += 1.0;
        let raw_type = row.get(type_idx).unwrap_or("").trim_matches('"');
        if let Some(cat) = categories.normalize(raw_type) {
            day.counts[cat] += 1.0;
        }
    }

    Ok(table)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| h.trim_matches('"') == name)
        .ok_or_else(|| ParseError::MissingColumn {
            column: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn map() -> CategoryMap {
        CategoryMap::from_defs(&DashboardConfig::default().post_types)
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        let map = map();
        assert_eq!(map.normalize("Retweet"), Some(1));
        assert_eq!(map.normalize(" Social Post "), Some(0));
        assert_eq!(map.normalize("Quote Posts"), Some(2));
        assert_eq!(map.normalize("podcast"), None);
    }

    #[test]
    fn test_counts_rows_per_day_and_type() {
        let raw = "\u{feff}Author\tDate\tContent Type\n\
                   a\t2025-01-02\tReply\n\
                   b\t2025-01-01\tSocial Post\n\
                   c\t2025-01-02\tRepost\n\
                   d\t2025-01-02\tPodcast\n\
                   e\t\tReply\n";
        let table = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap();

        assert_eq!(table.days.len(), 2);
        let first = &table.days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(first.all, 3.0);
        assert_eq!(first.counts[table.index_of("Replies").unwrap()], 1.0);
        assert_eq!(first.counts[table.index_of("Reposts").unwrap()], 1.0);

        assert_eq!(table.total_all(), 4.0);
        assert_eq!(table.totals(), vec![1.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_category_column_is_fatal() {
        let raw = "Date\tType\n2025-01-01\tReply\n";
        let err = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumn {
                column: "Content Type".to_string()
            }
        );
    }

    #[test]
    fn test_missing_date_column_is_fatal() {
        let raw = "When\tContent Type\n2025-01-01\tReply\n";
        let err = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap_err();
        assert!(err.to_string().contains("\"Date\""));
    }

    #[test]
    fn test_unbalanced_quote_keeps_later_rows() {
        let raw = "Date\tText\tContent Type\n\
                   2025-03-01\t\"hello world\tReply\n\
                   2025-03-02\tplain\tReply\n\
                   2025-03-03\tplain\tRepost\n";
        let table = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap();

        assert_eq!(table.days.len(), 3);
        assert_eq!(table.total_all(), 3.0);
        assert_eq!(table.days[0].counts[table.index_of("Replies").unwrap()], 1.0);
        assert_eq!(table.days[2].counts[table.index_of("Reposts").unwrap()], 1.0);
    }

    #[test]
    fn test_quoted_header_still_matches() {
        let raw = "\"Date\"\t\"Content Type\"\n\"2025-01-01\"\t\"Reply\"\n";
        let table = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap();
        assert_eq!(table.total_all(), 1.0);
        assert_eq!(table.totals()[table.index_of("Replies").unwrap()], 1.0);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = parse_tagged_rows("", &TaggedColumns::default(), &map()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.categories.len(), 5);
    }

    #[test]
    fn test_series_extraction_sorts_days() {
        let raw = "Date\tContent Type\n2025-01-03\tReply\n2025-01-01\tReply\n2025-01-01\tRepost\n";
        let table = parse_tagged_rows(raw, &TaggedColumns::default(), &map()).unwrap();

        let all = table.all_series();
        assert_eq!(all.records()[0].value, 2.0);
        assert_eq!(all.records()[1].value, 1.0);

        let replies = table.series("Replies").unwrap();
        assert_eq!(replies.category(), "Replies");
        assert_eq!(replies.records().iter().map(|r| r.value).sum::<f64>(), 2.0);
        assert!(table.series("Unknown").is_none());
    }
}

//! Display formatting for numbers and days.
//!
//! Grouping always uses `,` between thousands and `.` for decimals.

use chrono::NaiveDate;

/// Rounds to a whole number and groups thousands, e.g. `12345.6` -> `"12,346"`.
pub fn format_count(value: f64) -> String {
    format_decimal(value, 0)
}

/// Fixed number of decimal places with a grouped integer part.
pub fn format_decimal(value: f64, places: usize) -> String {
    let fixed = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short form for card headlines: `950`, `1.2K`, `3.4M`, `2B`.
pub fn format_compact(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    let (scaled, suffix) = match abs {
        a if a >= 1e9 => (value / 1e9, "B"),
        a if a >= 1e6 => (value / 1e6, "M"),
        a if a >= 1e3 => (value / 1e3, "K"),
        _ => return format_decimal(value, if value.fract() == 0.0 { 0 } else { 1 }),
    };

    let mut text = format!("{scaled:.1}");
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    format!("{text}{suffix}")
}

/// `2025-01-23` -> `"23 January 2025"`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// `2025-01-23` -> `"23 Jan"`
pub fn format_short_day(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Rounds to `places` decimals, for values serialized next to their display text.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Percentage rounded to whole points, as shown on insight lines.
pub fn whole_percent(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(12345.6), "12,346");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.56, 1), "1,234.6");
        assert_eq!(format_decimal(10.0, 1), "10.0");
        assert_eq!(format_decimal(-1500.0, 0), "-1,500");
        assert_eq!(format_decimal(-0.01, 1), "0.0");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12.5), "12.5");
        assert_eq!(format_compact(1200.0), "1.2K");
        assert_eq!(format_compact(3_400_000.0), "3.4M");
        assert_eq!(format_compact(2_000_000_000.0), "2B");
    }

    #[test]
    fn test_day_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 23).unwrap();
        assert_eq!(format_day(date), "23 January 2025");
        assert_eq!(format_short_day(date), "23 Jan");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(33.333, 1), 33.3);
        assert_eq!(round_to(2.0 / 3.0 * 100.0, 1), 66.7);
        assert_eq!(round_to(10.0, 1), 10.0);
    }

    #[test]
    fn test_whole_percent_rounds_half_away_from_zero() {
        assert_eq!(whole_percent(19.5), 20);
        assert_eq!(whole_percent(-4.4), -4);
    }
}

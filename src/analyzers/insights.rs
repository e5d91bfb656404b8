//! Insight composer: comparative observations over a per-category table.

use super::bands::{
    ConsistencyBand, EngagementBand, Pace, TrendClass, classify_trend, consistency_band,
    engagement_band, pace, percent_change,
};
use super::types::{Insight, InsightKind, InsightOptions, TrendWindow};
use crate::format::{format_count, format_decimal, format_short_day, round_to, whole_percent};
use crate::parser::{Category, CategoryTable, DailyBreakdown};
use crate::stats::percentage_share;

/// Builds the insights for `table` in display order: content strategy, peak
/// activity, consistency, trend, engagement, temporal shift.
///
/// Fewer than two days of data yields nothing. Insights whose preconditions
/// are not met (no categorised posts, no previous window, steady pace) are
/// left out.
pub fn compose(table: &CategoryTable, options: &InsightOptions) -> Vec<Insight> {
    let mut days: Vec<&DailyBreakdown> = table.days.iter().collect();
    days.sort_by_key(|d| d.date);
    if days.len() < 2 {
        return Vec::new();
    }

    let t = &options.thresholds;
    let totals = table.totals();
    let all = table.total_all();
    let daily_all: Vec<f64> = days.iter().map(|d| d.all).collect();

    let engagement: Vec<usize> = options
        .engagement_categories
        .iter()
        .filter_map(|key| table.index_of(key))
        .collect();

    [
        dominant_category(&table.categories, &totals, all, t.dominant_share_pct),
        peak_activity(&table.categories, &days),
        Some(consistency(&days, all, t.consistency_excellent_pct, t.consistency_good_pct)),
        trend_window(&daily_all, t.trend_window, t.trend_stable_pct).map(trend_insight),
        engagement_share(&engagement, &totals, all, t.engagement_high_pct, t.engagement_good_pct),
        temporal_shift(&daily_all, t.acceleration_ratio, t.slowdown_ratio),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Names the largest category and its share of all posts. Above
/// `warn_share_pct` a diversification note is added; otherwise the runner-up
/// is mentioned.
pub fn dominant_category(
    categories: &[Category],
    totals: &[f64],
    all: f64,
    warn_share_pct: f64,
) -> Option<Insight> {
    let mut ranked: Vec<(usize, f64)> = totals
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, total)| *total > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let &(top, top_total) = ranked.first()?;
    let top_pct = whole_percent(percentage_share(top_total, all));

    let mut text = format!(
        "{} is the dominant type at {}%",
        categories[top].label, top_pct
    );
    if top_pct as f64 > warn_share_pct {
        text.push_str(" - diversifying content is recommended to lift engagement");
    } else if let Some(&(second, second_total)) = ranked.get(1) {
        text.push_str(&format!(
            ", followed by {} at {}%",
            categories[second].label,
            whole_percent(percentage_share(second_total, all))
        ));
    }

    Some(Insight::new(
        InsightKind::ContentStrategy,
        "📊",
        "Content strategy",
        text,
    ))
}

/// The single busiest category-day across all categories.
pub fn peak_activity(categories: &[Category], days: &[&DailyBreakdown]) -> Option<Insight> {
    let mut best: Option<(usize, &DailyBreakdown, f64)> = None;

    for (idx, _) in categories.iter().enumerate() {
        for day in days {
            let count = day.counts.get(idx).copied().unwrap_or(0.0);
            if count > best.map_or(0.0, |(_, _, v)| v) {
                best = Some((idx, day, count));
            }
        }
    }

    let (idx, day, count) = best?;
    Some(Insight::new(
        InsightKind::PeakActivity,
        "🔥",
        "Peak activity",
        format!(
            "Highest activity on {} ({}) with {} {}",
            format_short_day(day.date),
            day.date.format("%A"),
            format_count(count),
            categories[idx].label
        ),
    ))
}

/// Share of days with any activity, with the average per active day.
pub fn consistency(
    days: &[&DailyBreakdown],
    all: f64,
    excellent_pct: f64,
    good_pct: f64,
) -> Insight {
    let active = days.iter().filter(|d| d.all > 0.0).count();
    let rate = whole_percent(percentage_share(active as f64, days.len() as f64));
    let per_active = if active == 0 { 0.0 } else { all / active as f64 };

    let verdict = match consistency_band(rate as f64, excellent_pct, good_pct) {
        ConsistencyBand::Excellent => "excellent regular activity",
        ConsistencyBand::Good => "good activity with room to improve",
        ConsistencyBand::Irregular => "publishing more regularly is recommended",
    };

    Insight::new(
        InsightKind::Consistency,
        "📅",
        "Publishing consistency",
        format!(
            "Consistency rate {rate}% - {verdict} ({} posts per active day)",
            format_decimal(per_active, 1)
        ),
    )
}

/// Compares the last `window` days with up to `window` days before them.
///
/// `None` when there is nothing before the recent window.
pub fn trend_window(daily: &[f64], window: usize, stable_pct: f64) -> Option<TrendWindow> {
    let days = window.min(daily.len());
    if days == 0 {
        return None;
    }

    let split = daily.len() - days;
    let previous = &daily[split.saturating_sub(days)..split];
    if previous.is_empty() {
        return None;
    }

    let recent: f64 = daily[split..].iter().sum();
    let previous: f64 = previous.iter().sum();
    let change_pct = whole_percent(percent_change(recent, previous));

    Some(TrendWindow {
        days,
        recent,
        previous,
        change_pct,
        class: classify_trend(change_pct as f64, stable_pct),
    })
}

fn trend_insight(window: TrendWindow) -> Insight {
    let (icon, text) = match window.class {
        TrendClass::Stable => (
            "➡️",
            format!(
                "Stable activity over the last {} days ({} posts)",
                window.days,
                format_count(window.recent)
            ),
        ),
        TrendClass::Growth => (
            "📈",
            format!(
                "Positive growth of {}% - keeping the current momentum is recommended",
                window.change_pct
            ),
        ),
        TrendClass::Decline => (
            "📉",
            format!(
                "Decline of {}% - reviewing the publishing strategy is recommended",
                window.change_pct.abs()
            ),
        ),
    };
    Insight::new(InsightKind::Trend, icon, "Growth trend", text)
}

/// Share of posts in the engagement categories (replies, quotes, reposts).
///
/// `None` when none of those categories has any posts.
pub fn engagement_share(
    engagement: &[usize],
    totals: &[f64],
    all: f64,
    high_pct: f64,
    good_pct: f64,
) -> Option<Insight> {
    let present: Vec<f64> = engagement
        .iter()
        .filter_map(|&idx| totals.get(idx).copied())
        .filter(|total| *total > 0.0)
        .collect();
    if present.is_empty() {
        return None;
    }

    let rate = whole_percent(percentage_share(present.iter().sum(), all));
    let verdict = match engagement_band(rate as f64, high_pct, good_pct) {
        EngagementBand::High => "excellent engagement level",
        EngagementBand::Good => "good engagement",
        EngagementBand::Low => "audience interaction can be strengthened",
    };

    Some(Insight::new(
        InsightKind::Engagement,
        "💬",
        "Engagement level",
        format!("Engagement share {rate}% of content - {verdict}"),
    ))
}

/// First-half against second-half daily mean. Only a clear acceleration or
/// slowdown produces an insight.
pub fn temporal_shift(daily: &[f64], acceleration: f64, slowdown: f64) -> Option<Insight> {
    let half = daily.len() / 2;
    let (first, second) = daily.split_at(half);
    if first.is_empty() || second.is_empty() {
        return None;
    }

    // Classified on the one-decimal means the text shows.
    let first_mean = round_to(first.iter().sum::<f64>() / first.len() as f64, 1);
    let second_mean = round_to(second.iter().sum::<f64>() / second.len() as f64, 1);
    let averages = format!(
        "average {} vs {} per day",
        format_decimal(second_mean, 1),
        format_decimal(first_mean, 1)
    );

    match pace(first_mean, second_mean, acceleration, slowdown) {
        Pace::Acceleration => Some(Insight::new(
            InsightKind::TemporalShift,
            "⚡",
            "Activity pattern",
            format!("Noticeable acceleration in the second half of the period - {averages}"),
        )),
        Pace::Slowdown => Some(Insight::new(
            InsightKind::TemporalShift,
            "⚠️",
            "Activity pattern",
            format!("Slowdown in the second half of the period - {averages}"),
        )),
        Pace::Steady => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn categories() -> Vec<Category> {
        ["Original Posts", "Reposts", "Replies"]
            .into_iter()
            .map(|k| Category {
                key: k.to_string(),
                label: k.to_string(),
            })
            .collect()
    }

    /// One row per day; each entry is (original, reposts, replies).
    fn table(rows: &[(f64, f64, f64)]) -> CategoryTable {
        let days = rows
            .iter()
            .enumerate()
            .map(|(i, &(o, r, p))| DailyBreakdown {
                date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Days::new(i as u64),
                all: o + r + p,
                counts: vec![o, r, p],
            })
            .collect();
        CategoryTable {
            categories: categories(),
            days,
        }
    }

    fn options() -> InsightOptions {
        InsightOptions {
            engagement_categories: vec!["Reposts".into(), "Replies".into(), "Quote Posts".into()],
            ..InsightOptions::default()
        }
    }

    #[test]
    fn test_trend_growth_scenario() {
        let mut daily = vec![0.0; 14];
        daily[0] = 100.0;
        daily[7] = 120.0;
        let window = trend_window(&daily, 7, 5.0).unwrap();
        assert_eq!(window.previous, 100.0);
        assert_eq!(window.recent, 120.0);
        assert_eq!(window.change_pct, 20);
        assert_eq!(window.class, TrendClass::Growth);
    }

    #[test]
    fn test_trend_uses_shorter_previous_window() {
        let daily = [10.0, 10.0, 5.0, 5.0, 5.0];
        let window = trend_window(&daily, 3, 5.0).unwrap();
        assert_eq!(window.days, 3);
        assert_eq!(window.previous, 20.0);
        assert_eq!(window.recent, 15.0);
        assert_eq!(window.class, TrendClass::Decline);
    }

    #[test]
    fn test_trend_needs_previous_days() {
        assert!(trend_window(&[1.0, 2.0], 7, 5.0).is_none());
        assert!(trend_window(&[], 7, 5.0).is_none());
    }

    #[test]
    fn test_dominant_warns_above_share() {
        let cats = categories();
        let insight = dominant_category(&cats, &[80.0, 15.0, 5.0], 100.0, 70.0).unwrap();
        assert!(insight.text.starts_with("Original Posts is the dominant type at 80%"));
        assert!(insight.text.contains("diversifying"));
    }

    #[test]
    fn test_dominant_mentions_runner_up() {
        let cats = categories();
        let insight = dominant_category(&cats, &[10.0, 50.0, 40.0], 100.0, 70.0).unwrap();
        assert_eq!(
            insight.text,
            "Reposts is the dominant type at 50%, followed by Replies at 40%"
        );
    }

    #[test]
    fn test_dominant_skipped_without_categorised_posts() {
        assert!(dominant_category(&categories(), &[0.0, 0.0, 0.0], 4.0, 70.0).is_none());
    }

    #[test]
    fn test_consistency_bands() {
        let t = table(&[(1.0, 0.0, 0.0), (0.0, 0.0, 0.0), (2.0, 0.0, 1.0), (1.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let days: Vec<&DailyBreakdown> = t.days.iter().collect();
        let insight = consistency(&days, t.total_all(), 80.0, 60.0);
        assert_eq!(
            insight.text,
            "Consistency rate 80% - excellent regular activity (1.5 posts per active day)"
        );
    }

    #[test]
    fn test_engagement_share_bands() {
        let insight = engagement_share(&[1, 2], &[70.0, 20.0, 10.0], 100.0, 25.0, 15.0).unwrap();
        assert_eq!(
            insight.text,
            "Engagement share 30% of content - excellent engagement level"
        );
        assert!(engagement_share(&[1, 2], &[70.0, 0.0, 0.0], 70.0, 25.0, 15.0).is_none());
    }

    #[test]
    fn test_temporal_shift_is_asymmetric() {
        let up = temporal_shift(&[1.0, 1.0, 3.0, 3.0], 1.2, 0.8).unwrap();
        assert_eq!(up.icon, "⚡");
        assert!(up.text.ends_with("average 3.0 vs 1.0 per day"));

        let down = temporal_shift(&[4.0, 4.0, 1.0, 1.0], 1.2, 0.8).unwrap();
        assert_eq!(down.icon, "⚠️");

        assert!(temporal_shift(&[2.0, 2.0, 2.0, 2.1], 1.2, 0.8).is_none());
    }

    #[test]
    fn test_temporal_shift_compares_displayed_means() {
        // 1.16 vs 0.96 is above 1.2x, but the shown 1.2 vs 1.0 is not.
        assert!(temporal_shift(&[0.96, 0.96, 1.16, 1.16], 1.2, 0.8).is_none());

        let up = temporal_shift(&[1.0, 1.0, 1.3, 1.3], 1.2, 0.8).unwrap();
        assert!(up.text.ends_with("average 1.3 vs 1.0 per day"));
    }

    #[test]
    fn test_peak_activity_tie_goes_to_earliest_day() {
        let mut t = table(&[(0.0, 4.0, 0.0), (0.0, 1.0, 0.0), (0.0, 4.0, 0.0)]);
        t.days.reverse();
        let insights = compose(&t, &options());
        let peak = insights
            .iter()
            .find(|i| i.kind == InsightKind::PeakActivity)
            .unwrap();
        assert!(peak.text.starts_with("Highest activity on 1 Mar (Saturday)"));
    }

    #[test]
    fn test_peak_activity_picks_largest_category_day() {
        let t = table(&[(2.0, 1.0, 0.0), (3.0, 6.0, 0.0), (1.0, 6.0, 0.0)]);
        let days: Vec<&DailyBreakdown> = t.days.iter().collect();
        let insight = peak_activity(&t.categories, &days).unwrap();
        assert_eq!(insight.text, "Highest activity on 2 Mar (Sunday) with 6 Reposts");
    }

    #[test]
    fn test_compose_order_and_minimum_days() {
        assert!(compose(&table(&[(1.0, 0.0, 0.0)]), &options()).is_empty());

        let t = table(&[
            (5.0, 1.0, 0.0),
            (5.0, 1.0, 0.0),
            (0.0, 0.0, 0.0),
            (9.0, 2.0, 1.0),
        ]);
        let kinds: Vec<_> = compose(&t, &options()).into_iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::ContentStrategy,
                InsightKind::PeakActivity,
                InsightKind::Consistency,
                InsightKind::Engagement,
            ]
        );
    }
}

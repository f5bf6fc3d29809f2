//! HbA1c trend narrative built from stored readings.
//!
//! Deterministic and side-effect free: identical inputs always give the
//! same sentence. Bad data degrades to `n/a` placeholders rather than
//! failing, so callers always have something to show.
//!
//! The direction labels assume lower is better, which holds for HbA1c.
//! Do not reuse them for lab panels where a rising value is good.

use serde::Serialize;

use crate::models::{PriorSummary, ReadingPoint};

pub const NO_HISTORY_MESSAGE: &str =
    "No HbA1c history saved yet. Upload reports with dates to see trends.";

/// Changes smaller than this (in percentage points) count as stable.
pub const STABLE_THRESHOLD: f64 = 0.1;

const MISSING: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Stable,
    /// Value went up; adverse for HbA1c.
    Rising,
    /// Value went down.
    Improving,
}

impl TrendDirection {
    /// Classify the change between the earliest and latest reading.
    pub fn from_change(change: f64) -> Self {
        if change.abs() < STABLE_THRESHOLD {
            TrendDirection::Stable
        } else if change > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Improving
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Stable => "stable",
            TrendDirection::Rising => "rising",
            TrendDirection::Improving => "improving",
        }
    }
}

/// Numbers behind the narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStats {
    pub first: ReadingPoint,
    pub last: ReadingPoint,
    pub direction: TrendDirection,
    pub average: f64,
    pub count: usize,
}

/// Compute trend statistics; `None` for an empty history.
///
/// Works on a sorted copy so the caller's slice keeps its order. Readings
/// without a date sort before dated ones. A missing value counts as zero,
/// both in the average and in the change between the endpoints.
pub fn compute_trend(history: &[ReadingPoint]) -> Option<TrendStats> {
    let mut sorted = history.to_vec();
    sorted.sort_by(|a, b| a.reading_date.cmp(&b.reading_date));

    let first = *sorted.first()?;
    let last = *sorted.last()?;

    let direction =
        TrendDirection::from_change(last.value.unwrap_or(0.0) - first.value.unwrap_or(0.0));

    let count = sorted.len();
    let total: f64 = sorted.iter().map(|r| r.value.unwrap_or(0.0)).sum();
    let average = total / count.max(1) as f64;

    Some(TrendStats {
        first,
        last,
        direction,
        average,
        count,
    })
}

/// Build the trend sentence for a reading history.
///
/// `prior_summaries` is most recent first; only the first entry is used,
/// and only to cite its date.
pub fn synthesize_trend(history: &[ReadingPoint], prior_summaries: &[PriorSummary]) -> String {
    let Some(stats) = compute_trend(history) else {
        return NO_HISTORY_MESSAGE.to_string();
    };

    let latest = format_value(stats.last.value);
    let latest_date = stats
        .last
        .reading_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| MISSING.to_string());

    let mut summary = format!("Latest HbA1c {latest}% on {latest_date}. ");
    summary.push_str(&format!(
        "Trend looks {} from {}% to {latest}%. ",
        stats.direction.as_str(),
        format_value(stats.first.value),
    ));
    summary.push_str(&format!(
        "Average across {} readings: {}%.",
        stats.count,
        format_one_decimal(stats.average)
    ));

    if let Some(date) = prior_summaries.first().and_then(PriorSummary::associated_date) {
        summary.push_str(&format!(" Last summary recorded on {date}."));
    }

    summary
}

fn format_value(value: Option<f64>) -> String {
    value
        .map(format_one_decimal)
        .unwrap_or_else(|| MISSING.to_string())
}

/// One decimal place, ties rounded away from zero (6.75 -> "6.8").
///
/// `format!("{:.1}")` alone rounds exact ties to even, hence the explicit
/// `round()` first.
pub fn format_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid "-0.0" for tiny negative values.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(y: i32, m: u32, d: u32, value: f64) -> ReadingPoint {
        ReadingPoint::new(date(y, m, d), value)
    }

    fn prior(report_date: Option<NaiveDate>) -> PriorSummary {
        PriorSummary {
            id: Uuid::new_v4(),
            summary: "Summary text".into(),
            report_id: None,
            report_date,
            created_at: None,
        }
    }

    #[test]
    fn empty_history_returns_fixed_message() {
        assert_eq!(synthesize_trend(&[], &[]), NO_HISTORY_MESSAGE);
        // Prior summaries alone do not produce a trend.
        assert_eq!(
            synthesize_trend(&[], &[prior(Some(date(2024, 1, 1)))]),
            NO_HISTORY_MESSAGE
        );
    }

    #[test]
    fn rising_history_full_sentence() {
        let history = vec![point(2024, 1, 1, 6.0), point(2024, 6, 1, 7.5)];
        assert_eq!(
            synthesize_trend(&history, &[]),
            "Latest HbA1c 7.5% on 2024-06-01. Trend looks rising from 6.0% to 7.5%. \
             Average across 2 readings: 6.8%."
        );
    }

    #[test]
    fn improving_when_value_drops() {
        let history = vec![point(2024, 1, 1, 8.1), point(2024, 4, 1, 7.0)];
        let stats = compute_trend(&history).unwrap();
        assert_eq!(stats.direction, TrendDirection::Improving);
        assert!(synthesize_trend(&history, &[]).contains("Trend looks improving from 8.1% to 7.0%"));
    }

    #[test]
    fn small_change_is_stable() {
        let history = vec![point(2024, 1, 1, 6.50), point(2024, 2, 1, 6.55)];
        assert_eq!(
            compute_trend(&history).unwrap().direction,
            TrendDirection::Stable
        );
    }

    #[test]
    fn direction_thresholds() {
        assert_eq!(TrendDirection::from_change(0.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_change(-0.09), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_change(0.2), TrendDirection::Rising);
        assert_eq!(TrendDirection::from_change(-0.2), TrendDirection::Improving);
    }

    #[test]
    fn single_reading_is_stable() {
        let history = vec![point(2024, 3, 15, 6.2)];
        assert_eq!(
            synthesize_trend(&history, &[]),
            "Latest HbA1c 6.2% on 2024-03-15. Trend looks stable from 6.2% to 6.2%. \
             Average across 1 readings: 6.2%."
        );
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let sorted = vec![
            point(2023, 11, 2, 8.4),
            point(2024, 2, 10, 7.9),
            point(2024, 5, 20, 7.1),
        ];
        let shuffled = vec![sorted[2], sorted[0], sorted[1]];
        assert_eq!(
            synthesize_trend(&sorted, &[]),
            synthesize_trend(&shuffled, &[])
        );
        assert!(synthesize_trend(&shuffled, &[]).starts_with("Latest HbA1c 7.1% on 2024-05-20."));
    }

    #[test]
    fn caller_slice_is_not_reordered() {
        let history = vec![point(2024, 6, 1, 7.5), point(2024, 1, 1, 6.0)];
        let before = history.clone();
        let _ = synthesize_trend(&history, &[]);
        assert_eq!(history, before);
    }

    #[test]
    fn prior_summary_date_appended_once() {
        let history = vec![point(2024, 1, 1, 6.0), point(2024, 6, 1, 7.5)];
        let priors = vec![prior(Some(date(2024, 6, 1))), prior(Some(date(2024, 1, 1)))];
        let text = synthesize_trend(&history, &priors);
        assert!(text.ends_with(" Last summary recorded on 2024-06-01."));
        assert_eq!(text.matches("Last summary recorded").count(), 1);
    }

    #[test]
    fn prior_summary_falls_back_to_creation_date() {
        let history = vec![point(2024, 1, 1, 6.0)];
        let mut summary = prior(None);
        summary.created_at = Some(Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap());
        let text = synthesize_trend(&history, &[summary]);
        assert!(text.ends_with(" Last summary recorded on 2024-07-04."));
    }

    #[test]
    fn prior_summary_without_any_date_adds_nothing() {
        let history = vec![point(2024, 1, 1, 6.0)];
        let text = synthesize_trend(&history, &[prior(None)]);
        assert!(!text.contains("Last summary"));
        assert_eq!(text, synthesize_trend(&history, &[]));
    }

    #[test]
    fn missing_values_render_placeholder_and_count_as_zero() {
        let history = vec![
            point(2024, 1, 1, 6.0),
            ReadingPoint {
                reading_date: Some(date(2024, 6, 1)),
                value: None,
            },
        ];
        assert_eq!(
            synthesize_trend(&history, &[]),
            "Latest HbA1c n/a% on 2024-06-01. Trend looks improving from 6.0% to n/a%. \
             Average across 2 readings: 3.0%."
        );
    }

    #[test]
    fn missing_first_value_counts_as_zero_in_change() {
        let history = vec![
            ReadingPoint {
                reading_date: Some(date(2024, 1, 1)),
                value: None,
            },
            point(2024, 6, 1, 7.5),
        ];
        let stats = compute_trend(&history).unwrap();
        assert_eq!(stats.direction, TrendDirection::Rising);
        assert!(synthesize_trend(&history, &[]).contains("Trend looks rising from n/a% to 7.5%."));
    }

    #[test]
    fn both_endpoints_missing_is_stable() {
        let missing = |m| ReadingPoint {
            reading_date: Some(date(2024, m, 1)),
            value: None,
        };
        let history = vec![missing(1), missing(2)];
        assert_eq!(
            compute_trend(&history).unwrap().direction,
            TrendDirection::Stable
        );
    }

    #[test]
    fn missing_date_sorts_first_and_renders_placeholder() {
        let undated = ReadingPoint {
            reading_date: None,
            value: Some(9.0),
        };
        let history = vec![point(2024, 2, 1, 7.0), undated];
        let stats = compute_trend(&history).unwrap();
        assert_eq!(stats.first, undated);
        assert_eq!(stats.direction, TrendDirection::Improving);

        let only_undated = synthesize_trend(&[undated], &[]);
        assert!(only_undated.starts_with("Latest HbA1c 9.0% on n/a."));
    }

    #[test]
    fn one_decimal_rounds_half_away_from_zero() {
        assert_eq!(format_one_decimal(6.75), "6.8");
        assert_eq!(format_one_decimal(6.25), "6.3");
        assert_eq!(format_one_decimal(7.0), "7.0");
        assert_eq!(format_one_decimal(12.04), "12.0");
        assert_eq!(format_one_decimal(-0.04), "0.0");
    }
}

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{ChartPoint, PredictionRecord};

/// A line needs at least two points to say anything about direction.
pub const MIN_TREND_POINTS: usize = 2;

const DATE_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trend {
    Line { points: Vec<ChartPoint> },
    InsufficientHistory { points: usize },
}

/// Turns newest-first history into oldest-first chart points.
/// The caller's slice is left untouched.
pub fn build_series(history: &[PredictionRecord]) -> Vec<ChartPoint> {
    history
        .iter()
        .rev()
        .map(|record| ChartPoint {
            date: date_label(record.timestamp.as_deref()),
            score: to_score(record.prediction_score),
        })
        .collect()
}

pub fn trend(points: Vec<ChartPoint>) -> Trend {
    if points.len() < MIN_TREND_POINTS {
        Trend::InsufficientHistory {
            points: points.len(),
        }
    } else {
        Trend::Line { points }
    }
}

/// Probability in [0, 1] to a whole percentage, clamped to [0, 100].
pub fn to_score(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Short day/month label such as `05 Jan`. The date is taken as written in
/// the timestamp, without shifting into the local zone.
pub fn date_label(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_date)
        .map(|date| date.format("%d %b").to_string())
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::from_str(raw) {
        return Some(stamp.date());
    }
    NaiveDate::from_str(raw).ok()
}

pub fn write_csv(path: &Path, points: &[ChartPoint]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: &str, score: f64) -> PredictionRecord {
        PredictionRecord {
            timestamp: Some(timestamp.to_string()),
            prediction_score: score,
            prediction_label: None,
        }
    }

    #[test]
    fn series_is_reversed_and_length_preserving() {
        let history = vec![
            record("2026-03-10T09:00:00", 0.81),
            record("2026-02-20T09:00:00", 0.64),
            record("2026-01-05T09:00:00", 0.42),
        ];
        let original = history.clone();

        let points = build_series(&history);

        assert_eq!(history, original);
        assert_eq!(points.len(), history.len());
        assert_eq!(points[0].date, "05 Jan");
        assert_eq!(points[0].score, 42);
        assert_eq!(points[2].date, "10 Mar");
        assert_eq!(points[2].score, 81);
    }

    #[test]
    fn empty_history_yields_empty_series() {
        assert!(build_series(&[]).is_empty());
    }

    #[test]
    fn scores_round_to_nearest_whole_percent() {
        assert_eq!(to_score(0.73), 73);
        assert_eq!(to_score(0.995), 100);
        assert_eq!(to_score(0.0), 0);
        assert_eq!(to_score(1.0), 100);
    }

    #[test]
    fn scores_stay_inside_percent_range() {
        assert_eq!(to_score(1.4), 100);
        assert_eq!(to_score(-0.2), 0);
        assert_eq!(to_score(f64::NAN), 0);
    }

    #[test]
    fn date_labels_accept_common_timestamp_shapes() {
        assert_eq!(date_label(Some("2026-01-05T10:20:30.123")), "05 Jan");
        assert_eq!(date_label(Some("2026-11-30T23:59:59+05:30")), "30 Nov");
        assert_eq!(date_label(Some("2026-07-04")), "04 Jul");
    }

    #[test]
    fn unreadable_dates_use_placeholder() {
        assert_eq!(date_label(None), "—");
        assert_eq!(date_label(Some("yesterday")), "—");
    }

    #[test]
    fn single_point_is_insufficient_history() {
        let points = build_series(&[record("2026-01-05T09:00:00", 0.5)]);
        assert_eq!(trend(points), Trend::InsufficientHistory { points: 1 });
        assert_eq!(trend(Vec::new()), Trend::InsufficientHistory { points: 0 });
    }

    #[test]
    fn two_points_form_a_line() {
        let points = build_series(&[
            record("2026-01-06T09:00:00", 0.6),
            record("2026-01-05T09:00:00", 0.5),
        ]);
        match trend(points) {
            Trend::Line { points } => assert_eq!(points.len(), 2),
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!("chart-{}.csv", uuid::Uuid::new_v4()));
        let points = vec![
            ChartPoint {
                date: "05 Jan".to_string(),
                score: 42,
            },
            ChartPoint {
                date: "10 Mar".to_string(),
                score: 81,
            },
        ];

        write_csv(&path, &points).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(written, "date,score\n05 Jan,42\n10 Mar,81\n");
    }
}

//! Loader for the published lunar productivity CSV.
//!
//! The file is a wide table: the header row names each day of the cycle,
//! and a row labelled `productivity` carries one score per column.
//!
//! ```text
//! day,Hekate,Selene,Artemis
//! productivity,4,6,9
//! ```

use std::path::Path;

use chrono::{Days, NaiveDate};

use crate::models::feed::FeedPoint;

const PRODUCTIVITY_ROW: &str = "productivity";
const MAX_SCORE: u8 = 10;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed is empty")]
    Empty,

    #[error("Feed has no productivity row")]
    MissingProductivityRow,

    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_feed(path: &Path, start: NaiveDate) -> Result<Vec<FeedPoint>, FeedError> {
    let text = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_feed(&text, start)
}

/// Column `i` (1-based) lands on `start + (i - 1)` days. Blank headers and
/// non-numeric cells are skipped.
pub fn parse_feed(text: &str, start: NaiveDate) -> Result<Vec<FeedPoint>, FeedError> {
    let mut rows = text.lines().filter(|line| !line.trim().is_empty());
    let headers: Vec<&str> = rows
        .next()
        .ok_or(FeedError::Empty)?
        .split(',')
        .map(str::trim)
        .collect();

    let values: Vec<&str> = rows
        .map(|row| row.split(',').map(str::trim).collect::<Vec<_>>())
        .find(|cells| {
            cells
                .first()
                .is_some_and(|label| label.eq_ignore_ascii_case(PRODUCTIVITY_ROW))
        })
        .ok_or(FeedError::MissingProductivityRow)?;

    let mut points = Vec::new();
    for (column, label) in headers.iter().enumerate().skip(1) {
        if label.is_empty() {
            continue;
        }
        let Some(raw) = values.get(column) else {
            continue;
        };
        let Ok(score) = raw.parse::<i64>() else {
            tracing::debug!(column, value = %raw, "Skipping non-numeric feed cell");
            continue;
        };
        let Some(date) = start.checked_add_days(Days::new(column as u64 - 1)) else {
            tracing::warn!(column, %start, "Feed column falls past the last representable date");
            break;
        };
        points.push(FeedPoint {
            cycle_day: column as u32,
            label: (*label).to_string(),
            date,
            productivity: score.clamp(0, MAX_SCORE as i64) as u8,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_parse_feed_maps_columns_to_dates() {
        let csv = "day,Hekate,Selene,Artemis\nmood,1,2,3\nproductivity,4,6,9\n";
        let points = parse_feed(csv, march_10()).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label, "Hekate");
        assert_eq!(points[0].date, march_10());
        assert_eq!(points[0].cycle_day, 1);
        assert_eq!(points[2].label, "Artemis");
        assert_eq!(points[2].date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(points[2].productivity, 9);
    }

    #[test]
    fn test_parse_feed_skips_blank_and_bad_cells() {
        let csv = "day,Hekate,,Artemis,Nyx\nproductivity,4,5,n/a,42";
        let points = parse_feed(csv, march_10()).unwrap();

        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Hekate", "Nyx"]);
        // Nyx sits in column 4 and is clamped to the score ceiling
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert_eq!(points[1].productivity, 10);
    }

    #[test]
    fn test_parse_feed_stops_at_last_representable_date() {
        let csv = "day,Hekate,Selene,Artemis\nproductivity,4,6,9";
        let points = parse_feed(csv, NaiveDate::MAX).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, NaiveDate::MAX);
    }

    #[test]
    fn test_parse_feed_short_value_row() {
        let csv = "day,Hekate,Selene\nproductivity,4";
        let points = parse_feed(csv, march_10()).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_parse_feed_errors() {
        assert!(matches!(parse_feed("", march_10()), Err(FeedError::Empty)));
        assert!(matches!(
            parse_feed("day,Hekate\nmood,3", march_10()),
            Err(FeedError::MissingProductivityRow)
        ));
    }

    #[test]
    fn test_load_feed_missing_file() {
        let err = load_feed(Path::new("/nonexistent/moon.csv"), march_10()).unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }
}

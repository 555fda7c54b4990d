//! Chart series that overlays logged entries on the published lunar feed.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::lunar::{self, LunarPhase};
use crate::models::entry::DailyEntry;
use crate::models::feed::FeedPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOptions {
    pub include_feed: bool,
    pub include_entries: bool,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            include_feed: true,
            include_entries: true,
            start: None,
            end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub label: String,
    pub productivity: u8,
    pub mood: Option<u8>,
    pub lunar_day: u8,
    /// Set on new and full moons so the chart can draw reference lines
    pub marker: Option<LunarPhase>,
    pub is_user_entry: bool,
}

impl SeriesPoint {
    fn from_feed(point: &FeedPoint) -> Self {
        Self {
            date: point.date,
            label: point.label.clone(),
            productivity: point.productivity,
            mood: None,
            lunar_day: lunar::lunar_day_of(point.date),
            marker: marker_for(point.date),
            is_user_entry: false,
        }
    }
}

fn marker_for(date: NaiveDate) -> Option<LunarPhase> {
    match lunar::lunar_phase_of(date) {
        phase @ (LunarPhase::NewMoon | LunarPhase::FullMoon) => Some(phase),
        _ => None,
    }
}

/// Entries win over feed points on the same date but keep the feed's label.
pub fn merge_series(
    feed: &[FeedPoint],
    entries: &[DailyEntry],
    options: SeriesOptions,
) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = if options.include_feed {
        feed.iter().map(SeriesPoint::from_feed).collect()
    } else {
        Vec::new()
    };

    if options.include_entries {
        let feed_labels: HashMap<NaiveDate, &str> =
            feed.iter().map(|p| (p.date, p.label.as_str())).collect();

        for entry in entries {
            let Some(productivity) = entry.productivity else {
                continue;
            };
            if let Some(existing) = points.iter_mut().find(|p| p.date == entry.date) {
                existing.productivity = productivity;
                existing.mood = entry.mood;
                existing.is_user_entry = true;
                continue;
            }

            let lunar_day = entry.lunar_day();
            let label = feed_labels
                .get(&entry.date)
                .map(|label| (*label).to_string())
                .unwrap_or_else(|| format!("Day {lunar_day}"));
            points.push(SeriesPoint {
                date: entry.date,
                label,
                productivity,
                mood: entry.mood,
                lunar_day,
                marker: marker_for(entry.date),
                is_user_entry: true,
            });
        }
    }

    points.sort_by_key(|p| p.date);
    points.retain(|p| {
        options.start.map_or(true, |start| p.date >= start)
            && options.end.map_or(true, |end| p.date <= end)
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn feed() -> Vec<FeedPoint> {
        ["Hekate", "Selene", "Artemis"]
            .iter()
            .enumerate()
            .map(|(i, label)| FeedPoint {
                cycle_day: i as u32 + 1,
                label: label.to_string(),
                date: march(10) + Duration::days(i as i64),
                productivity: 5,
            })
            .collect()
    }

    fn entry(id: u64, date: NaiveDate, mood: u8, productivity: u8) -> DailyEntry {
        DailyEntry {
            id,
            date,
            colors: vec![],
            mood: Some(mood),
            productivity: Some(productivity),
            foods: vec![],
        }
    }

    #[test]
    fn test_entry_overrides_feed_on_same_date() {
        let entries = vec![entry(1, march(11), 8, 9)];
        let series = merge_series(&feed(), &entries, SeriesOptions::default());

        assert_eq!(series.len(), 3);
        let merged = &series[1];
        assert_eq!(merged.label, "Selene");
        assert_eq!(merged.productivity, 9);
        assert_eq!(merged.mood, Some(8));
        assert!(merged.is_user_entry);
        assert!(!series[0].is_user_entry);
    }

    #[test]
    fn test_entry_outside_feed_gets_day_label_and_sorted() {
        let entries = vec![entry(1, march(1), 6, 7)];
        let series = merge_series(&feed(), &entries, SeriesOptions::default());

        assert_eq!(series.len(), 4);
        assert_eq!(series[0].date, march(1));
        assert_eq!(series[0].label, format!("Day {}", lunar::lunar_day_of(march(1))));
    }

    #[test]
    fn test_entries_only_keeps_feed_labels() {
        let entries = vec![entry(1, march(12), 6, 7)];
        let options = SeriesOptions {
            include_feed: false,
            ..SeriesOptions::default()
        };
        let series = merge_series(&feed(), &entries, options);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Artemis");
    }

    #[test]
    fn test_feed_only_ignores_entries() {
        let entries = vec![entry(1, march(11), 8, 9)];
        let options = SeriesOptions {
            include_entries: false,
            ..SeriesOptions::default()
        };
        let series = merge_series(&feed(), &entries, options);
        assert!(series.iter().all(|p| !p.is_user_entry));
        assert_eq!(series[1].productivity, 5);
    }

    #[test]
    fn test_window_is_inclusive() {
        let options = SeriesOptions {
            start: Some(march(11)),
            end: Some(march(12)),
            ..SeriesOptions::default()
        };
        let series = merge_series(&feed(), &[], options);
        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![march(11), march(12)]);
    }

    #[test]
    fn test_markers_only_on_new_and_full_moons() {
        let start = march(1);
        let points: Vec<FeedPoint> = (0..30)
            .map(|i| FeedPoint {
                cycle_day: i + 1,
                label: format!("d{i}"),
                date: start + Duration::days(i64::from(i)),
                productivity: 5,
            })
            .collect();
        let series = merge_series(&points, &[], SeriesOptions::default());

        assert!(series
            .iter()
            .filter_map(|p| p.marker)
            .all(|m| matches!(m, LunarPhase::NewMoon | LunarPhase::FullMoon)));
        assert!(series.iter().any(|p| p.marker == Some(LunarPhase::FullMoon)));
    }
}

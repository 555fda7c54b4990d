//! Mood and productivity averaged per lunar day.

use serde::Serialize;

use crate::lunar::MAX_LUNAR_DAY;
use crate::models::entry::DailyEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleDay {
    pub lunar_day: u8,
    pub count: u32,
    pub mean_mood: Option<f64>,
    pub mean_productivity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub entries: usize,
    pub mean_mood: Option<f64>,
    pub mean_productivity: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Sums {
    count: u32,
    mood: u32,
    productivity: u32,
}

impl Sums {
    fn means(&self) -> (Option<f64>, Option<f64>) {
        if self.count == 0 {
            return (None, None);
        }
        let n = f64::from(self.count);
        (
            Some(f64::from(self.mood) / n),
            Some(f64::from(self.productivity) / n),
        )
    }
}

/// Always one row per lunar day, 1 through 30.
pub fn cycle_profile(entries: &[DailyEntry]) -> Vec<CycleDay> {
    let mut sums = [Sums::default(); MAX_LUNAR_DAY as usize];
    for entry in entries {
        let Some((mood, productivity)) = entry.scores() else {
            continue;
        };
        let slot = &mut sums[usize::from(entry.lunar_day() - 1)];
        slot.count += 1;
        slot.mood += u32::from(mood);
        slot.productivity += u32::from(productivity);
    }

    (1..=MAX_LUNAR_DAY)
        .zip(sums.iter())
        .map(|(lunar_day, s)| {
            let (mean_mood, mean_productivity) = s.means();
            CycleDay {
                lunar_day,
                count: s.count,
                mean_mood,
                mean_productivity,
            }
        })
        .collect()
}

pub fn summarize(entries: &[DailyEntry]) -> EntrySummary {
    let mut sums = Sums::default();
    for (mood, productivity) in entries.iter().filter_map(DailyEntry::scores) {
        sums.count += 1;
        sums.mood += u32::from(mood);
        sums.productivity += u32::from(productivity);
    }
    let (mean_mood, mean_productivity) = sums.means();
    EntrySummary {
        entries: entries.len(),
        mean_mood,
        mean_productivity,
    }
}

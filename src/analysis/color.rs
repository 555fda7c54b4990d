//! Color-by-outcome aggregation and the (color, food, phase) combination table.

use std::collections::HashMap;

use serde::Serialize;

use super::food::{tenths, FoodFilter, Tally};
use crate::lunar::LunarPhase;
use crate::models::entry::DailyEntry;

/// A combination needs this many entries before it is listed.
pub const MIN_COMBINATION_OCCURRENCES: u32 = 2;

pub const COMBINATION_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorStat {
    pub color: String,
    pub count: u32,
    pub mean_mood: f64,
    pub mean_productivity: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ColorAnalysis {
    pub by_mood: Vec<ColorStat>,
    pub by_productivity: Vec<ColorStat>,
    pub analyzed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Combination {
    pub color: String,
    pub food: String,
    pub phase: LunarPhase,
    pub count: u32,
    pub mean_mood: f64,
    pub mean_productivity: f64,
    pub combined: f64,
}

/// Scores and phase bucket, or `None` when the entry is incomplete.
fn scored(entry: &DailyEntry) -> Option<(u8, u8, LunarPhase)> {
    let (mood, productivity) = entry.scores()?;
    Some((mood, productivity, entry.phase_bucket()?))
}

pub fn aggregate_by_color(entries: &[DailyEntry], filter: &FoodFilter) -> ColorAnalysis {
    let mut tallies: Vec<(String, Tally)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut analyzed = 0;
    let mut skipped = 0;

    for entry in entries.iter().filter(|e| filter.admits(e)) {
        let Some((mood, productivity, _)) = scored(entry) else {
            skipped += 1;
            continue;
        };
        if entry.colors.is_empty() {
            skipped += 1;
            continue;
        }
        analyzed += 1;

        for color in &entry.colors {
            let slot = *index.entry(color.clone()).or_insert_with(|| {
                tallies.push((color.clone(), Tally::default()));
                tallies.len() - 1
            });
            tallies[slot].1.add(mood, productivity);
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, analyzed, "Skipped incomplete entries during color aggregation");
    }

    let stats: Vec<ColorStat> = tallies
        .into_iter()
        .map(|(color, tally)| ColorStat {
            color,
            count: tally.count(),
            mean_mood: tally.mean_mood(),
            mean_productivity: tally.mean_productivity(),
            combined: tally.combined(),
        })
        .collect();

    let mut by_mood = stats.clone();
    by_mood.sort_by_key(|stat| std::cmp::Reverse(tenths(stat.mean_mood)));

    let mut by_productivity = stats;
    by_productivity.sort_by_key(|stat| std::cmp::Reverse(tenths(stat.mean_productivity)));

    ColorAnalysis {
        by_mood,
        by_productivity,
        analyzed,
        skipped,
    }
}

/// Best (color, food, phase bucket) combinations by combined score.
pub fn top_combinations(entries: &[DailyEntry], filter: &FoodFilter) -> Vec<Combination> {
    type Key = (String, String, LunarPhase);

    let mut tallies: Vec<(Key, Tally)> = Vec::new();
    let mut index: HashMap<Key, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| filter.admits(e)) {
        let Some((mood, productivity, phase)) = scored(entry) else {
            continue;
        };
        for color in &entry.colors {
            for food in &entry.foods {
                let key = (color.clone(), food.clone(), phase);
                let slot = *index.entry(key.clone()).or_insert_with(|| {
                    tallies.push((key, Tally::default()));
                    tallies.len() - 1
                });
                tallies[slot].1.add(mood, productivity);
            }
        }
    }

    let mut combinations: Vec<Combination> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.count() >= MIN_COMBINATION_OCCURRENCES)
        .map(|((color, food, phase), tally)| Combination {
            color,
            food,
            phase,
            count: tally.count(),
            mean_mood: tally.mean_mood(),
            mean_productivity: tally.mean_productivity(),
            combined: tally.combined(),
        })
        .collect();
    combinations.sort_by_key(|combo| std::cmp::Reverse(tenths(combo.combined)));
    combinations.truncate(COMBINATION_LIMIT);
    combinations
}

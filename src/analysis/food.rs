//! Food-by-outcome aggregation.
//!
//! Each entry contributes its mood and productivity to every food it lists,
//! both overall and within the entry's lunar-day phase bucket. Foods are
//! reported in two orderings (by mood, by productivity) and the ones seen at
//! least [`MIN_RANKING_OCCURRENCES`] times are ranked by combined score.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lunar::LunarPhase;
use crate::models::entry::DailyEntry;

/// A food needs this many entries before it can be ranked.
pub const MIN_RANKING_OCCURRENCES: u32 = 2;

/// How many ranked foods are reported.
pub const RANKED_LIMIT: usize = 5;

/// Relative look-back window, resolved against a caller-supplied today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    /// First date inside the window, or `None` for no lower bound.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            TimeRange::All => return None,
            TimeRange::Month => 1,
            TimeRange::Quarter => 3,
            TimeRange::Year => 12,
        };
        today.checked_sub_months(Months::new(months))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub phase: Option<LunarPhase>,
}

impl FoodFilter {
    pub fn with_time_range(mut self, range: TimeRange, today: NaiveDate) -> Self {
        if self.start.is_none() {
            self.start = range.cutoff(today);
        }
        self
    }

    pub(crate) fn admits(&self, entry: &DailyEntry) -> bool {
        if self.start.is_some_and(|start| entry.date < start) {
            return false;
        }
        if self.end.is_some_and(|end| entry.date > end) {
            return false;
        }
        match self.phase {
            Some(phase) => phase.day_range().contains(&entry.lunar_day()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tally {
    count: u32,
    mood: u32,
    productivity: u32,
}

impl Tally {
    pub(crate) fn add(&mut self, mood: u8, productivity: u8) {
        self.count += 1;
        self.mood += u32::from(mood);
        self.productivity += u32::from(productivity);
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn mean_mood(&self) -> f64 {
        mean(self.mood, self.count)
    }

    pub(crate) fn mean_productivity(&self) -> f64 {
        mean(self.productivity, self.count)
    }

    pub(crate) fn combined(&self) -> f64 {
        mean(self.mood + self.productivity, self.count * 2)
    }
}

fn mean(total: u32, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(count)
    }
}

/// Sort key: a score rounded to one decimal, as shown on the charts.
/// Scores equal to the tenth tie and keep their encounter order.
pub(crate) fn tenths(score: f64) -> i64 {
    (score * 10.0).round() as i64
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhaseStat {
    pub phase: LunarPhase,
    pub count: u32,
    pub mean_mood: f64,
    pub mean_productivity: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodStat {
    pub food: String,
    pub count: u32,
    pub mean_mood: f64,
    pub mean_productivity: f64,
    pub combined: f64,
    /// Buckets with at least one entry, in lunar order
    pub phases: Vec<PhaseStat>,
}

impl FoodStat {
    /// Bucket with the highest combined score; earlier buckets win ties.
    pub fn best_phase(&self) -> Option<LunarPhase> {
        let mut best: Option<&PhaseStat> = None;
        for stat in &self.phases {
            if best.map_or(true, |b| stat.combined > b.combined) {
                best = Some(stat);
            }
        }
        best.map(|stat| stat.phase)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedFood {
    #[serde(flatten)]
    pub stat: FoodStat,
    pub best_phase: Option<LunarPhase>,
}

/// One (food, phase) row for the phase breakdown table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodPhaseRow {
    pub food: String,
    #[serde(flatten)]
    pub stat: PhaseStat,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FoodAnalysis {
    pub by_mood: Vec<FoodStat>,
    pub by_productivity: Vec<FoodStat>,
    pub ranked: Vec<RankedFood>,
    pub phase_breakdown: Vec<FoodPhaseRow>,
    /// Entries that passed the filter and were counted
    pub analyzed: usize,
    /// Entries that passed the filter but lacked scores, foods or a bucket
    pub skipped: usize,
}

struct FoodTally {
    food: String,
    overall: Tally,
    by_phase: [Tally; 8],
}

impl FoodTally {
    fn new(food: &str) -> Self {
        Self {
            food: food.to_string(),
            overall: Tally::default(),
            by_phase: [Tally::default(); 8],
        }
    }

    fn into_stat(self) -> FoodStat {
        let phases = LunarPhase::ALL
            .iter()
            .zip(self.by_phase.iter())
            .filter(|(_, tally)| tally.count > 0)
            .map(|(phase, tally)| PhaseStat {
                phase: *phase,
                count: tally.count,
                mean_mood: tally.mean_mood(),
                mean_productivity: tally.mean_productivity(),
                combined: tally.combined(),
            })
            .collect();

        FoodStat {
            food: self.food,
            count: self.overall.count,
            mean_mood: self.overall.mean_mood(),
            mean_productivity: self.overall.mean_productivity(),
            combined: self.overall.combined(),
            phases,
        }
    }
}

fn phase_index(phase: LunarPhase) -> usize {
    LunarPhase::ALL
        .iter()
        .position(|p| *p == phase)
        .unwrap_or_default()
}

pub fn aggregate_by_food(entries: &[DailyEntry], filter: &FoodFilter) -> FoodAnalysis {
    // Foods keep the order in which they are first seen so sorts break ties stably
    let mut tallies: Vec<FoodTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut analyzed = 0;
    let mut skipped = 0;

    for entry in entries.iter().filter(|e| filter.admits(e)) {
        let (Some((mood, productivity)), Some(phase)) = (entry.scores(), entry.phase_bucket())
        else {
            skipped += 1;
            continue;
        };
        if entry.foods.is_empty() {
            skipped += 1;
            continue;
        }
        analyzed += 1;

        let bucket = phase_index(phase);
        for food in &entry.foods {
            let slot = *index.entry(food.clone()).or_insert_with(|| {
                tallies.push(FoodTally::new(food));
                tallies.len() - 1
            });
            let tally = &mut tallies[slot];
            tally.overall.add(mood, productivity);
            tally.by_phase[bucket].add(mood, productivity);
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, analyzed, "Skipped incomplete entries during food aggregation");
    }

    let stats: Vec<FoodStat> = tallies.into_iter().map(FoodTally::into_stat).collect();

    let mut by_mood = stats.clone();
    by_mood.sort_by_key(|stat| std::cmp::Reverse(tenths(stat.mean_mood)));

    let mut by_productivity = stats.clone();
    by_productivity.sort_by_key(|stat| std::cmp::Reverse(tenths(stat.mean_productivity)));

    let phase_breakdown = stats
        .iter()
        .flat_map(|stat| {
            stat.phases.iter().map(|phase| FoodPhaseRow {
                food: stat.food.clone(),
                stat: phase.clone(),
            })
        })
        .collect();

    let mut eligible: Vec<FoodStat> = stats
        .into_iter()
        .filter(|stat| stat.count >= MIN_RANKING_OCCURRENCES)
        .collect();
    eligible.sort_by_key(|stat| std::cmp::Reverse(tenths(stat.combined)));
    let ranked = eligible
        .into_iter()
        .take(RANKED_LIMIT)
        .map(|stat| RankedFood {
            best_phase: stat.best_phase(),
            stat,
        })
        .collect();

    FoodAnalysis {
        by_mood,
        by_productivity,
        ranked,
        phase_breakdown,
        analyzed,
        skipped,
    }
}

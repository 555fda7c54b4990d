use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lunar::{self, LunarPhase};

/// Valid range for mood and productivity scores.
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Food tag renamed when the category list was split into red meat and poultry.
const LEGACY_MEAT_TAG: &str = "Meat";
const RED_MEAT_TAG: &str = "Red Meat";

/// One day's log. Lunar fields are never stored; they are read off `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub colors: Vec<String>,
    pub mood: Option<u8>,
    pub productivity: Option<u8>,
    pub foods: Vec<String>,
}

impl DailyEntry {
    pub fn lunar_day(&self) -> u8 {
        lunar::lunar_day_of(self.date)
    }

    /// Phase name from the moon-age table.
    pub fn lunar_phase(&self) -> LunarPhase {
        lunar::lunar_phase_of(self.date)
    }

    pub fn glyph(&self) -> &'static str {
        lunar::lunar_glyph_of(self.date)
    }

    /// Analysis bucket from the lunar-day table.
    pub fn phase_bucket(&self) -> Option<LunarPhase> {
        LunarPhase::from_lunar_day(self.lunar_day())
    }

    /// Mood and productivity when both are present and in range.
    pub fn scores(&self) -> Option<(u8, u8)> {
        let mood = self.mood.filter(|m| SCORE_RANGE.contains(m))?;
        let productivity = self.productivity.filter(|p| SCORE_RANGE.contains(p))?;
        Some((mood, productivity))
    }
}

/// Everything about an entry except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub colors: Vec<String>,
    pub mood: Option<u8>,
    pub productivity: Option<u8>,
    pub foods: Vec<String>,
}

impl NewEntry {
    pub fn into_entry(self, id: u64) -> DailyEntry {
        DailyEntry {
            id,
            date: self.date,
            colors: normalize_tags(self.colors),
            mood: self.mood,
            productivity: self.productivity,
            foods: normalize_food_tags(self.foods),
        }
    }
}

/// Trim, drop blanks and drop repeats, keeping first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

pub fn normalize_food_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let renamed = tags.into_iter().map(|tag| {
        let tag = tag.as_ref().trim();
        if tag == LEGACY_MEAT_TAG {
            RED_MEAT_TAG.to_string()
        } else {
            tag.to_string()
        }
    });
    normalize_tags(renamed)
}

/// Splits the legacy `"Greens, Red Meat, Grains"` form.
pub fn parse_food_list(joined: &str) -> Vec<String> {
    normalize_food_tags(joined.split(','))
}

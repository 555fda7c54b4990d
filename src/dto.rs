//! # Lunalog — Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Body validation is expressed via `validator` derive macros

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::cycle::{CycleDay, EntrySummary};
use crate::analysis::food::{FoodFilter, TimeRange};
use crate::analysis::series::SeriesOptions;
use crate::error::{AppError, AppResult};
use crate::lunar::LunarPhase;
use crate::models::entry::{parse_food_list, DailyEntry, NewEntry};

// ============================================================================
// Common
// ============================================================================

/// Delete confirmation; `deleted` is false when nothing was there
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: u64,
}

// ============================================================================
// Lunar calendar
// ============================================================================

/// GET /api/lunar
#[derive(Debug, Deserialize)]
pub struct LunarQuery {
    /// Default: today (UTC)
    pub date: Option<NaiveDate>,
}

/// GET /api/lunar/cycle
#[derive(Debug, Deserialize)]
pub struct LunarCycleQuery {
    pub start_date: Option<NaiveDate>,
    /// Number of days to list, 1-62. Default: 30
    pub days: Option<u32>,
}

// ============================================================================
// Entries
// ============================================================================

/// Foods arrive either as a list or as the legacy comma-joined string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FoodList {
    Tags(Vec<String>),
    Joined(String),
}

impl Default for FoodList {
    fn default() -> Self {
        FoodList::Tags(Vec::new())
    }
}

impl FoodList {
    fn into_tags(self) -> Vec<String> {
        match self {
            FoodList::Tags(tags) => tags,
            FoodList::Joined(joined) => parse_food_list(&joined),
        }
    }
}

/// POST /api/entries, PUT /api/entries/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct EntryRequest {
    /// Default: today (UTC)
    pub date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood: u8,

    #[validate(range(min = 1, max = 10, message = "Productivity must be 1-10"))]
    pub productivity: u8,

    #[serde(default)]
    #[validate(length(max = 13, message = "At most 13 colors"))]
    pub colors: Vec<String>,

    #[serde(default)]
    pub foods: FoodList,
}

impl EntryRequest {
    /// Validates and converts into a store record dated `today` when no date is given.
    pub fn into_new_entry(self, today: NaiveDate) -> AppResult<NewEntry> {
        self.validate()?;
        let foods = self.foods.into_tags();
        if foods.len() > 20 {
            return Err(AppError::Validation("At most 20 foods".into()));
        }
        Ok(NewEntry {
            date: self.date.unwrap_or(today),
            colors: self.colors,
            mood: Some(self.mood),
            productivity: Some(self.productivity),
            foods,
        })
    }
}

/// Entry with its lunar fields computed from the date
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: u64,
    pub date: NaiveDate,
    pub lunar_day: u8,
    pub lunar_phase: LunarPhase,
    pub glyph: &'static str,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub productivity: Option<u8>,
    pub foods: Vec<String>,
}

impl From<DailyEntry> for EntryResponse {
    fn from(entry: DailyEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            lunar_day: entry.lunar_day(),
            lunar_phase: entry.lunar_phase(),
            glyph: entry.glyph(),
            colors: entry.colors,
            mood: entry.mood,
            productivity: entry.productivity,
            foods: entry.foods,
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// GET /api/analysis/foods, /api/analysis/colors, /api/analysis/combinations
#[derive(Debug, Default, Deserialize)]
pub struct FoodAnalysisQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// "all", "month", "quarter" or "year". Ignored when start_date is set.
    #[serde(default)]
    pub range: TimeRange,
    /// Phase slug or name; "all" or absent means every phase
    pub phase: Option<String>,
}

impl FoodAnalysisQuery {
    pub fn into_filter(self, today: NaiveDate) -> AppResult<FoodFilter> {
        let phase = match self.phase.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<LunarPhase>()?),
        };
        Ok(FoodFilter {
            start: self.start_date,
            end: self.end_date,
            phase,
        }
        .with_time_range(self.range, today))
    }
}

/// GET /api/analysis/lunar-series
#[derive(Debug, Deserialize)]
pub struct LunarSeriesQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub include_feed: bool,
    #[serde(default = "default_true")]
    pub include_entries: bool,
}

fn default_true() -> bool {
    true
}

impl From<LunarSeriesQuery> for SeriesOptions {
    fn from(query: LunarSeriesQuery) -> Self {
        SeriesOptions {
            include_feed: query.include_feed,
            include_entries: query.include_entries,
            start: query.start_date,
            end: query.end_date,
        }
    }
}

/// GET /api/analysis/cycle
#[derive(Debug, Serialize)]
pub struct CycleResponse {
    pub summary: EntrySummary,
    pub days: Vec<CycleDay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_entry_request_accepts_joined_foods() {
        let req: EntryRequest = serde_json::from_value(serde_json::json!({
            "mood": 7,
            "productivity": 8,
            "foods": "Greens, Meat, Grains",
        }))
        .unwrap();
        let entry = req.into_new_entry(today()).unwrap();

        assert_eq!(entry.date, today());
        assert_eq!(entry.foods, vec!["Greens", "Red Meat", "Grains"]);
    }

    #[test]
    fn test_entry_request_rejects_out_of_range_scores() {
        let req: EntryRequest = serde_json::from_value(serde_json::json!({
            "date": "2024-03-10",
            "mood": 11,
            "productivity": 8,
            "foods": ["Fish"],
        }))
        .unwrap();
        assert!(matches!(req.into_new_entry(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_food_query_parses_phase_slug() {
        let query = FoodAnalysisQuery {
            phase: Some("waxing-gibbous".into()),
            ..FoodAnalysisQuery::default()
        };
        let filter = query.into_filter(today()).unwrap();
        assert_eq!(filter.phase, Some(LunarPhase::WaxingGibbous));
    }

    #[test]
    fn test_food_query_all_phase_and_bad_phase() {
        let all = FoodAnalysisQuery {
            phase: Some("all".into()),
            ..FoodAnalysisQuery::default()
        };
        assert_eq!(all.into_filter(today()).unwrap().phase, None);

        let bad = FoodAnalysisQuery {
            phase: Some("harvest".into()),
            ..FoodAnalysisQuery::default()
        };
        assert!(matches!(bad.into_filter(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_food_query_range_resolves_start() {
        let query = FoodAnalysisQuery {
            range: TimeRange::Month,
            ..FoodAnalysisQuery::default()
        };
        let filter = query.into_filter(today()).unwrap();
        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 4, 1));
    }

    #[test]
    fn test_entry_response_includes_lunar_fields() {
        let entry = DailyEntry {
            id: 3,
            date: NaiveDate::from_ymd_opt(2000, 1, 7).unwrap(),
            colors: vec!["Blue".into()],
            mood: Some(6),
            productivity: Some(7),
            foods: vec!["Eggs".into()],
        };
        let json = serde_json::to_value(EntryResponse::from(entry)).unwrap();
        assert_eq!(json["lunar_day"], 1);
        assert_eq!(json["lunar_phase"], "New Moon");
        assert_eq!(json["glyph"], "🌑");
    }
}

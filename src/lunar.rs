//! Lunar calendar arithmetic.
//!
//! Everything here is anchored to a single reference new moon and the mean
//! synodic month. Two bucket tables live side by side: the moon-age table
//! used to name the phase of a date, and the lunar-day table used when
//! grouping entries for analysis. They do not agree at the edges (day 3 is
//! "New Moon" in the day table while its moon age of ~2 is already a
//! "Waxing Crescent"). Keep them separate.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Mean length of a synodic month in days.
pub const SYNODIC_PERIOD_DAYS: f64 = 29.53059;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Highest lunar day number handed out.
pub const MAX_LUNAR_DAY: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

/// Upper bounds (exclusive) on moon age for each phase, checked in order.
/// Ages at or past the last bound wrap back to [`LunarPhase::NewMoon`].
pub const MOON_AGE_THRESHOLDS: [(f64, LunarPhase); 8] = [
    (1.0, LunarPhase::NewMoon),
    (7.4, LunarPhase::WaxingCrescent),
    (8.4, LunarPhase::FirstQuarter),
    (14.8, LunarPhase::WaxingGibbous),
    (16.2, LunarPhase::FullMoon),
    (22.1, LunarPhase::WaningGibbous),
    (23.1, LunarPhase::LastQuarter),
    (29.5, LunarPhase::WaningCrescent),
];

/// Lunar-day ranges used to bucket entries by phase.
pub const PHASE_DAY_RANGES: [(LunarPhase, RangeInclusive<u8>); 8] = [
    (LunarPhase::NewMoon, 1..=3),
    (LunarPhase::WaxingCrescent, 4..=7),
    (LunarPhase::FirstQuarter, 8..=11),
    (LunarPhase::WaxingGibbous, 12..=15),
    (LunarPhase::FullMoon, 16..=18),
    (LunarPhase::WaningGibbous, 19..=22),
    (LunarPhase::LastQuarter, 23..=26),
    (LunarPhase::WaningCrescent, 27..=30),
];

impl LunarPhase {
    pub const ALL: [LunarPhase; 8] = [
        LunarPhase::NewMoon,
        LunarPhase::WaxingCrescent,
        LunarPhase::FirstQuarter,
        LunarPhase::WaxingGibbous,
        LunarPhase::FullMoon,
        LunarPhase::WaningGibbous,
        LunarPhase::LastQuarter,
        LunarPhase::WaningCrescent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::FullMoon => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// Short identifier accepted in query strings.
    pub fn slug(self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "new",
            LunarPhase::WaxingCrescent => "waxing-crescent",
            LunarPhase::FirstQuarter => "first-quarter",
            LunarPhase::WaxingGibbous => "waxing-gibbous",
            LunarPhase::FullMoon => "full",
            LunarPhase::WaningGibbous => "waning-gibbous",
            LunarPhase::LastQuarter => "last-quarter",
            LunarPhase::WaningCrescent => "waning-crescent",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "🌑",
            LunarPhase::WaxingCrescent => "🌒",
            LunarPhase::FirstQuarter => "🌓",
            LunarPhase::WaxingGibbous => "🌔",
            LunarPhase::FullMoon => "🌕",
            LunarPhase::WaningGibbous => "🌖",
            LunarPhase::LastQuarter => "🌗",
            LunarPhase::WaningCrescent => "🌘",
        }
    }

    /// Phase for a moon age, via [`MOON_AGE_THRESHOLDS`].
    pub fn from_moon_age(age: f64) -> Self {
        MOON_AGE_THRESHOLDS
            .iter()
            .find(|(bound, _)| age < *bound)
            .map(|(_, phase)| *phase)
            .unwrap_or(LunarPhase::NewMoon)
    }

    /// Analysis bucket for a lunar day, via [`PHASE_DAY_RANGES`].
    pub fn from_lunar_day(day: u8) -> Option<Self> {
        PHASE_DAY_RANGES
            .iter()
            .find(|(_, days)| days.contains(&day))
            .map(|(phase, _)| *phase)
    }

    /// Lunar days that fall into this phase's analysis bucket.
    pub fn day_range(self) -> RangeInclusive<u8> {
        PHASE_DAY_RANGES
            .iter()
            .find(|(phase, _)| *phase == self)
            .map(|(_, days)| days.clone())
            .unwrap_or(1..=0)
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown lunar phase: {0}")]
pub struct UnknownPhase(pub String);

impl FromStr for LunarPhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        LunarPhase::ALL
            .into_iter()
            .find(|p| p.slug() == needle || p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownPhase(needle.to_string()))
    }
}

/// 2000-01-06T18:14:00Z
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or_default()
}

/// Days since the last new moon, in `[0, SYNODIC_PERIOD_DAYS)`.
pub fn moon_age_at(at: DateTime<Utc>) -> f64 {
    let elapsed_ms = (at - reference_new_moon()).num_milliseconds() as f64;
    let age = (elapsed_ms / MILLIS_PER_DAY).rem_euclid(SYNODIC_PERIOD_DAYS);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if age >= SYNODIC_PERIOD_DAYS {
        0.0
    } else {
        age
    }
}

pub fn lunar_day_at(at: DateTime<Utc>) -> u8 {
    day_for_age(moon_age_at(at))
}

pub fn lunar_phase_at(at: DateTime<Utc>) -> LunarPhase {
    LunarPhase::from_moon_age(moon_age_at(at))
}

pub fn lunar_glyph_at(at: DateTime<Utc>) -> &'static str {
    lunar_phase_at(at).glyph()
}

/// Calendar dates are read as midnight UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn moon_age_of(date: NaiveDate) -> f64 {
    moon_age_at(start_of_day(date))
}

pub fn lunar_day_of(date: NaiveDate) -> u8 {
    lunar_day_at(start_of_day(date))
}

pub fn lunar_phase_of(date: NaiveDate) -> LunarPhase {
    lunar_phase_at(start_of_day(date))
}

pub fn lunar_glyph_of(date: NaiveDate) -> &'static str {
    lunar_glyph_at(start_of_day(date))
}

fn day_for_age(age: f64) -> u8 {
    // age < 29.54, so the rounded value always fits
    let rounded = age.round() as u8;
    (rounded + 1).min(MAX_LUNAR_DAY)
}

/// Everything the calendar knows about one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarInfo {
    pub date: NaiveDate,
    pub moon_age: f64,
    pub lunar_day: u8,
    pub phase: LunarPhase,
    pub glyph: &'static str,
}

impl LunarInfo {
    pub fn for_date(date: NaiveDate) -> Self {
        let moon_age = moon_age_of(date);
        let phase = LunarPhase::from_moon_age(moon_age);
        Self {
            date,
            moon_age,
            lunar_day: day_for_age(moon_age),
            phase,
            glyph: phase.glyph(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn synodic_period() -> Duration {
        Duration::milliseconds((SYNODIC_PERIOD_DAYS * MILLIS_PER_DAY) as i64)
    }

    #[test]
    fn test_reference_instant_is_day_one_new_moon() {
        let at = reference_new_moon();
        assert_eq!(moon_age_at(at), 0.0);
        assert_eq!(lunar_day_at(at), 1);
        assert_eq!(lunar_phase_at(at), LunarPhase::NewMoon);
        assert_eq!(lunar_glyph_at(at), "🌑");
    }

    #[test]
    fn test_periodicity_forward_and_back() {
        // A week past the reference: moon age 7, far from any bucket edge
        let base = reference_new_moon() + Duration::days(7);
        for cycles in [-40i32, -1, 1, 12, 250] {
            let shifted = base + synodic_period() * cycles;
            assert_eq!(lunar_day_at(shifted), lunar_day_at(base), "cycles = {cycles}");
            assert_eq!(lunar_phase_at(shifted), lunar_phase_at(base), "cycles = {cycles}");
        }
    }

    #[test]
    fn test_moon_age_stays_in_range_for_distant_dates() {
        let dates = [
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(1899, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 25).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2600, 7, 4).unwrap(),
        ];
        for date in dates {
            let age = moon_age_of(date);
            assert!((0.0..SYNODIC_PERIOD_DAYS).contains(&age), "{date}: {age}");
            let day = lunar_day_of(date);
            assert!((1..=30).contains(&day), "{date}: {day}");
            assert!(LunarPhase::ALL.contains(&lunar_phase_of(date)));
        }
    }

    #[test]
    fn test_before_reference_gives_positive_age() {
        // One day before the reference new moon is the tail of the previous cycle
        let at = reference_new_moon() - Duration::days(1);
        let age = moon_age_at(at);
        assert!((age - (SYNODIC_PERIOD_DAYS - 1.0)).abs() < 1e-9);
        assert_eq!(lunar_phase_at(at), LunarPhase::WaningCrescent);
        assert_eq!(lunar_day_at(at), 30);
    }

    #[test]
    fn test_moon_age_threshold_table() {
        assert_eq!(LunarPhase::from_moon_age(0.0), LunarPhase::NewMoon);
        assert_eq!(LunarPhase::from_moon_age(0.99), LunarPhase::NewMoon);
        assert_eq!(LunarPhase::from_moon_age(1.0), LunarPhase::WaxingCrescent);
        assert_eq!(LunarPhase::from_moon_age(7.4), LunarPhase::FirstQuarter);
        assert_eq!(LunarPhase::from_moon_age(8.4), LunarPhase::WaxingGibbous);
        assert_eq!(LunarPhase::from_moon_age(14.8), LunarPhase::FullMoon);
        assert_eq!(LunarPhase::from_moon_age(16.2), LunarPhase::WaningGibbous);
        assert_eq!(LunarPhase::from_moon_age(22.1), LunarPhase::LastQuarter);
        assert_eq!(LunarPhase::from_moon_age(23.1), LunarPhase::WaningCrescent);
        assert_eq!(LunarPhase::from_moon_age(29.5), LunarPhase::NewMoon);
    }

    #[test]
    fn test_day_range_table() {
        assert_eq!(LunarPhase::from_lunar_day(0), None);
        assert_eq!(LunarPhase::from_lunar_day(1), Some(LunarPhase::NewMoon));
        assert_eq!(LunarPhase::from_lunar_day(3), Some(LunarPhase::NewMoon));
        assert_eq!(LunarPhase::from_lunar_day(4), Some(LunarPhase::WaxingCrescent));
        assert_eq!(LunarPhase::from_lunar_day(16), Some(LunarPhase::FullMoon));
        assert_eq!(LunarPhase::from_lunar_day(30), Some(LunarPhase::WaningCrescent));
        assert_eq!(LunarPhase::from_lunar_day(31), None);
    }

    #[test]
    fn test_tables_disagree_at_day_three() {
        // Day 3 is a New Moon bucket, but its moon age names a crescent
        let age = 2.0;
        assert_eq!(day_for_age(age), 3);
        assert_eq!(LunarPhase::from_lunar_day(3), Some(LunarPhase::NewMoon));
        assert_eq!(LunarPhase::from_moon_age(age), LunarPhase::WaxingCrescent);
    }

    #[test]
    fn test_day_is_clamped_at_wrap() {
        assert_eq!(day_for_age(29.52), 30);
        assert_eq!(day_for_age(28.6), 30);
        assert_eq!(day_for_age(0.49), 1);
        assert_eq!(day_for_age(0.5), 2);
    }

    #[test]
    fn test_phase_parsing_accepts_slug_and_name() {
        assert_eq!("full".parse::<LunarPhase>(), Ok(LunarPhase::FullMoon));
        assert_eq!("Waning Gibbous".parse::<LunarPhase>(), Ok(LunarPhase::WaningGibbous));
        assert_eq!("last quarter".parse::<LunarPhase>(), Ok(LunarPhase::LastQuarter));
        assert!("blue moon".parse::<LunarPhase>().is_err());
    }

    #[test]
    fn test_phase_serializes_as_display_name() {
        let json = serde_json::to_value(LunarPhase::FirstQuarter).unwrap();
        assert_eq!(json, serde_json::json!("First Quarter"));
    }

    #[test]
    fn test_lunar_info_matches_free_functions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let info = LunarInfo::for_date(date);
        assert_eq!(info.lunar_day, lunar_day_of(date));
        assert_eq!(info.phase, lunar_phase_of(date));
        assert_eq!(info.glyph, lunar_glyph_of(date));
    }
}

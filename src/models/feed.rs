use chrono::NaiveDate;
use serde::Serialize;

/// One column of the external lunar productivity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPoint {
    /// 1-based column in the feed, i.e. day of the published cycle
    pub cycle_day: u32,
    pub label: String,
    pub date: NaiveDate,
    pub productivity: u8,
}

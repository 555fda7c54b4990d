use axum::{extract::Query, Json};
use chrono::{Days, Utc};

use crate::dto::{LunarCycleQuery, LunarQuery};
use crate::error::{AppError, AppResult};
use crate::lunar::LunarInfo;

const MAX_CYCLE_DAYS: u32 = 62;

pub async fn get_lunar_info(Query(query): Query<LunarQuery>) -> Json<LunarInfo> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(LunarInfo::for_date(date))
}

pub async fn get_lunar_cycle(Query(query): Query<LunarCycleQuery>) -> AppResult<Json<Vec<LunarInfo>>> {
    let days = query.days.unwrap_or(30);
    if !(1..=MAX_CYCLE_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {MAX_CYCLE_DAYS}"
        )));
    }
    let start = query.start_date.unwrap_or_else(|| Utc::now().date_naive());

    let calendar = (0..u64::from(days))
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .map(LunarInfo::for_date)
                .ok_or_else(|| AppError::Validation("start_date out of range".into()))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(calendar))
}

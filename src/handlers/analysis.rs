use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::analysis::{
    color::{aggregate_by_color, top_combinations, ColorAnalysis, Combination},
    cycle::{cycle_profile, summarize},
    food::{aggregate_by_food, FoodAnalysis},
    series::{merge_series, SeriesPoint},
};
use crate::dto::{CycleResponse, FoodAnalysisQuery, LunarSeriesQuery};
use crate::error::AppResult;
use crate::AppState;

pub async fn get_food_analysis(
    State(state): State<AppState>,
    Query(query): Query<FoodAnalysisQuery>,
) -> AppResult<Json<FoodAnalysis>> {
    let filter = query.into_filter(Utc::now().date_naive())?;
    // Aggregate on a snapshot so the store lock is not held while computing
    let entries = state.store.snapshot().await;
    Ok(Json(aggregate_by_food(&entries, &filter)))
}

pub async fn get_color_analysis(
    State(state): State<AppState>,
    Query(query): Query<FoodAnalysisQuery>,
) -> AppResult<Json<ColorAnalysis>> {
    let filter = query.into_filter(Utc::now().date_naive())?;
    let entries = state.store.snapshot().await;
    Ok(Json(aggregate_by_color(&entries, &filter)))
}

pub async fn get_top_combinations(
    State(state): State<AppState>,
    Query(query): Query<FoodAnalysisQuery>,
) -> AppResult<Json<Vec<Combination>>> {
    let filter = query.into_filter(Utc::now().date_naive())?;
    let entries = state.store.snapshot().await;
    Ok(Json(top_combinations(&entries, &filter)))
}

pub async fn get_lunar_series(
    State(state): State<AppState>,
    Query(query): Query<LunarSeriesQuery>,
) -> Json<Vec<SeriesPoint>> {
    let entries = state.store.snapshot().await;
    Json(merge_series(&state.feed, &entries, query.into()))
}

pub async fn get_cycle_profile(State(state): State<AppState>) -> Json<CycleResponse> {
    let entries = state.store.snapshot().await;
    Json(CycleResponse {
        summary: summarize(&entries),
        days: cycle_profile(&entries),
    })
}

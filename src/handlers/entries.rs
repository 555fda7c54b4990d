use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::dto::{DeleteResponse, EntryRequest, EntryResponse};
use crate::error::{AppError, AppResult};
use crate::store::EntryQuery;
use crate::AppState;

/// Creates the entry for the date, or overwrites the one already there.
pub async fn upsert_entry(
    State(state): State<AppState>,
    Json(body): Json<EntryRequest>,
) -> AppResult<(StatusCode, Json<EntryResponse>)> {
    let new = body.into_new_entry(Utc::now().date_naive())?;
    let (entry, created) = state.store.upsert(new).await;

    tracing::info!(entry_id = entry.id, date = %entry.date, created, "Entry saved");

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(entry.into())))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> Json<Vec<EntryResponse>> {
    let entries = state.store.list(&query).await;
    Json(entries.into_iter().map(EntryResponse::from).collect())
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<EntryResponse>> {
    let entry = state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))?;
    Ok(Json(entry.into()))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<EntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    let new = body.into_new_entry(Utc::now().date_naive())?;
    let entry = state.store.update(id, new).await?;

    tracing::info!(entry_id = id, date = %entry.date, "Entry updated");

    Ok(Json(entry.into()))
}

/// Idempotent: deleting a missing entry still answers 200.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<DeleteResponse> {
    let deleted = state.store.delete(id).await;
    if deleted {
        tracing::info!(entry_id = id, "Entry deleted");
    }
    Json(DeleteResponse { deleted, id })
}

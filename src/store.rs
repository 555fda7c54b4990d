use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::entry::{DailyEntry, NewEntry};

/// In-memory entry store: one entry per calendar date.
#[derive(Clone, Default)]
pub struct EntryStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    by_date: BTreeMap<NaiveDate, DailyEntry>,
    last_id: u64,
}

impl StoreInner {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn upsert(&mut self, new: NewEntry) -> (DailyEntry, bool) {
        let existing_id = self.by_date.get(&new.date).map(|e| e.id);
        let created = existing_id.is_none();
        let id = match existing_id {
            Some(id) => id,
            None => self.next_id(),
        };
        let entry = new.into_entry(id);
        self.by_date.insert(entry.date, entry.clone());
        (entry, created)
    }

    fn date_of(&self, id: u64) -> Option<NaiveDate> {
        self.by_date.values().find(|e| e.id == id).map(|e| e.date)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub food: Option<String>,
    pub search: Option<String>,
}

impl EntryQuery {
    fn matches(&self, entry: &DailyEntry) -> bool {
        if self.start_date.is_some_and(|start| entry.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| entry.date > end) {
            return false;
        }
        if let Some(color) = non_blank(&self.color) {
            if !entry.colors.iter().any(|c| c == color) {
                return false;
            }
        }
        if let Some(food) = non_blank(&self.food) {
            if !entry.foods.iter().any(|f| f == food) {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            if !entry.foods.iter().any(|f| f.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts, or replaces the entry already on that date while keeping its id.
    /// The flag is true when a new entry was created.
    pub async fn upsert(&self, new: NewEntry) -> (DailyEntry, bool) {
        self.inner.write().await.upsert(new)
    }

    pub async fn update(&self, id: u64, new: NewEntry) -> AppResult<DailyEntry> {
        let mut inner = self.inner.write().await;
        let current_date = inner
            .date_of(id)
            .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))?;

        if new.date != current_date {
            if inner.by_date.contains_key(&new.date) {
                return Err(AppError::Conflict(format!(
                    "An entry already exists for {}",
                    new.date
                )));
            }
            inner.by_date.remove(&current_date);
        }

        let entry = new.into_entry(id);
        inner.by_date.insert(entry.date, entry.clone());
        Ok(entry)
    }

    pub async fn get(&self, id: u64) -> Option<DailyEntry> {
        let inner = self.inner.read().await;
        inner.by_date.values().find(|e| e.id == id).cloned()
    }

    pub async fn delete(&self, id: u64) -> bool {
        let mut inner = self.inner.write().await;
        let Some(date) = inner.date_of(id) else {
            return false;
        };
        inner.by_date.remove(&date).is_some()
    }

    /// Matching entries, newest first.
    pub async fn list(&self, query: &EntryQuery) -> Vec<DailyEntry> {
        let inner = self.inner.read().await;
        inner
            .by_date
            .values()
            .rev()
            .filter(|e| query.matches(e))
            .cloned()
            .collect()
    }

    /// All entries in date order, for handing to the analysis functions.
    pub async fn snapshot(&self) -> Vec<DailyEntry> {
        self.inner.read().await.by_date.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_date.len()
    }
}

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, StorageErrorKind};
use crate::models::entry::{DailyEntry, Responses};
use crate::storage::LocalStorage;

/// Storage key the daily entries live under.
pub const DAILY_ENTRIES_KEY: &str = "pridally_daily_data";

/// One `DailyEntry` per date, written through to local storage as a whole on every submit.
pub struct DailyEntryStore {
    storage: Arc<dyn LocalStorage>,
    key: String,
    entries: Vec<DailyEntry>,
}

impl DailyEntryStore {
    /// Reads the persisted entries once. Missing, unreadable or corrupt data yields an empty
    /// store.
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        Self::load_with_key(storage, DAILY_ENTRIES_KEY)
    }

    pub fn load_with_key(storage: Arc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = read_entries(storage.as_ref(), &key);
        info!(target: "app::store", %key, entries = entries.len(), "daily entry store loaded");
        Self {
            storage,
            key,
            entries,
        }
    }

    /// Re-reads storage with the same rules as [`DailyEntryStore::load`].
    pub fn reload(&mut self) {
        self.entries = read_entries(self.storage.as_ref(), &self.key);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.entries.iter().find(|entry| entry.date == date)
    }

    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dated within `start..=end`, newest first.
    pub fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&DailyEntry> {
        let mut found: Vec<&DailyEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.date >= start && entry.date <= end)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }

    /// The last `days` days ending at `today`, newest first.
    pub fn recent(&self, today: NaiveDate, days: u32) -> Vec<&DailyEntry> {
        if days == 0 {
            return Vec::new();
        }
        let start = today - Duration::days(i64::from(days) - 1);
        self.entries_between(start, today)
    }

    /// Merges `responses` into the entry for `date` and persists the whole store.
    ///
    /// Previously recorded answers for the date survive unless `responses` overwrites them.
    /// If the write fails the in-memory store is left untouched and the storage error is
    /// returned.
    pub fn submit(&mut self, date: NaiveDate, responses: Responses) -> AppResult<DailyEntry> {
        let mut merged = self
            .get(date)
            .map(|existing| existing.responses.clone())
            .unwrap_or_default();
        let submitted = responses.len();
        merged.extend(responses);

        let entry = DailyEntry {
            date,
            responses: merged,
            completed: true,
        };

        let mut updated: Vec<DailyEntry> = self
            .entries
            .iter()
            .filter(|existing| existing.date != date)
            .cloned()
            .collect();
        updated.push(entry.clone());

        let payload = serde_json::to_string(&updated)?;
        self.storage.set_item(&self.key, &payload)?;
        self.entries = updated;

        debug!(
            target: "app::store",
            %date,
            submitted,
            answered = entry.responses.len(),
            "daily entry submitted"
        );

        Ok(entry)
    }
}

fn read_entries(storage: &dyn LocalStorage, key: &str) -> Vec<DailyEntry> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(target: "app::store", %key, error = %err, "daily entries unreadable, starting empty");
            return Vec::new();
        }
    };

    match parse_entries(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(target: "app::store", %key, error = %err, "daily entries corrupt, starting empty");
            Vec::new()
        }
    }
}

fn parse_entries(raw: &str) -> AppResult<Vec<DailyEntry>> {
    let parsed: Vec<DailyEntry> = serde_json::from_str(raw).map_err(|err| {
        AppError::storage(
            StorageErrorKind::Corrupt,
            format!("stored daily entries are not valid: {err}"),
        )
    })?;

    // a later duplicate of a date wins, keeping its position
    let mut entries: Vec<DailyEntry> = Vec::with_capacity(parsed.len());
    for entry in parsed {
        entries.retain(|existing| existing.date != entry.date);
        entries.push(entry);
    }
    Ok(entries)
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{entry_size, LocalStorage};
use crate::error::{AppError, AppResult, StorageErrorKind};

/// In-process `LocalStorage`, used by tests and embedders without a database.
///
/// It can be told to behave like an unavailable backend, and it counts successful writes so
/// callers can assert how often the store was flushed.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Pre-seeds a raw value, bypassing quota and the write counter.
    pub fn seeded(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut items) = storage.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage(
                StorageErrorKind::Unavailable,
                "local storage is unavailable",
            ));
        }
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items.lock().map_err(|_| {
            AppError::storage(StorageErrorKind::Unavailable, "local storage lock poisoned")
        })
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.ensure_available()?;
        let mut items = self.lock()?;

        if let Some(quota) = self.quota_bytes {
            let used: u64 = items
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| entry_size(existing, stored))
                .sum();
            if used + entry_size(key, value) > quota {
                return Err(AppError::storage(
                    StorageErrorKind::QuotaExceeded,
                    format!("writing {key} exceeds the {quota} byte quota"),
                ));
            }
        }

        items.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.ensure_available()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

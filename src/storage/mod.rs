//! Origin-scoped key/value storage, the durable home of everything the check-in core persists.
//!
//! Values are opaque strings; callers own their serialisation. Every failure is reported as
//! [`AppError::Storage`](crate::error::AppError::Storage) carrying a
//! [`StorageErrorKind`](crate::error::StorageErrorKind) so callers can tell a full quota from a
//! missing backend.

mod memory;
mod sqlite;

pub use memory::MemoryLocalStorage;
pub use sqlite::SqliteLocalStorage;

use crate::error::AppResult;

/// Default per-origin quota, matching what browsers grant `localStorage`.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the whole value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove_item(&self, key: &str) -> AppResult<()>;
}

pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

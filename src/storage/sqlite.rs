use rusqlite::ErrorCode;
use tracing::debug;

use super::{entry_size, LocalStorage, DEFAULT_QUOTA_BYTES};
use crate::db::repositories::local_storage_repository::LocalStorageRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult, StorageErrorKind};

/// `LocalStorage` backed by the `local_storage` table of the application database.
#[derive(Clone, Debug)]
pub struct SqliteLocalStorage {
    db: DbPool,
    quota_bytes: u64,
}

impl SqliteLocalStorage {
    pub fn new(db: DbPool) -> Self {
        Self::with_quota(db, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(db: DbPool, quota_bytes: u64) -> Self {
        Self { db, quota_bytes }
    }

    fn connection(&self) -> AppResult<rusqlite::Connection> {
        self.db.get_connection().map_err(|err| {
            AppError::storage(
                StorageErrorKind::Unavailable,
                format!("cannot open local storage: {err}"),
            )
        })
    }
}

impl LocalStorage for SqliteLocalStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.connection()?;
        let row = LocalStorageRepository::get(&conn, key).map_err(classify)?;
        Ok(row.map(|row| row.value))
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.connection()?;

        let used = LocalStorageRepository::usage_bytes_excluding(&conn, key).map_err(classify)?;
        let needed = used + entry_size(key, value);
        if needed > self.quota_bytes {
            return Err(AppError::storage(
                StorageErrorKind::QuotaExceeded,
                format!(
                    "writing {key} needs {needed} bytes, quota is {} bytes",
                    self.quota_bytes
                ),
            ));
        }

        LocalStorageRepository::upsert(&conn, key, value).map_err(classify)?;
        debug!(target: "app::storage", %key, bytes = value.len(), "local storage item written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        let conn = self.connection()?;
        LocalStorageRepository::delete(&conn, key).map_err(classify)?;
        Ok(())
    }
}

fn classify(error: rusqlite::Error) -> AppError {
    let kind = match &error {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::DiskFull => {
            StorageErrorKind::QuotaExceeded
        }
        _ => StorageErrorKind::Unavailable,
    };
    AppError::storage(kind, error.to_string())
}

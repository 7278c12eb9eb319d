pub mod checkin;
pub mod entries;
pub mod profile;
pub mod progress;
pub mod settings;

use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::check_in_session::CheckInSession;
use crate::services::entry_store::DailyEntryStore;
use crate::services::metric_catalog::MetricCatalog;
use crate::services::profile_service::ProfileService;
use crate::services::progress_service::ProgressCalculator;
use crate::services::settings_service::SettingsService;
use crate::storage::{LocalStorage, SqliteLocalStorage};

/// Everything the host shell holds on to for the lifetime of the app.
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    catalog: Arc<MetricCatalog>,
    settings_service: Arc<SettingsService>,
    profile_service: Arc<ProfileService>,
    entry_store: Arc<RwLock<DailyEntryStore>>,
    active_check_in: Arc<Mutex<Option<CheckInSession>>>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> AppResult<Self> {
        let storage: Arc<dyn LocalStorage> = Arc::new(SqliteLocalStorage::new(db_pool.clone()));
        Self::with_storage(db_pool, storage)
    }

    /// Same as [`AppState::new`] but with an explicit local storage backend.
    pub fn with_storage(db_pool: DbPool, storage: Arc<dyn LocalStorage>) -> AppResult<Self> {
        let catalog = Arc::new(MetricCatalog::default());
        let settings_service = Arc::new(SettingsService::new(db_pool.clone())?);
        let profile_service = Arc::new(ProfileService::new(Arc::clone(&storage)));
        let entry_store = Arc::new(RwLock::new(DailyEntryStore::load(storage)));

        info!(
            target: "app::command",
            sections = catalog.sections().len(),
            questions = catalog.question_count(),
            "application state ready"
        );

        Ok(Self {
            db_pool,
            catalog,
            settings_service,
            profile_service,
            entry_store,
            active_check_in: Arc::new(Mutex::new(None)),
        })
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    pub fn catalog(&self) -> Arc<MetricCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile_service)
    }

    pub fn progress(&self) -> AppResult<ProgressCalculator> {
        let settings = self.settings_service.get()?;
        Ok(ProgressCalculator::new((&settings).into()))
    }

    pub fn read_store<T>(&self, callback: impl FnOnce(&DailyEntryStore) -> T) -> AppResult<T> {
        let guard = self
            .entry_store
            .read()
            .map_err(|_| AppError::other("daily entry store lock poisoned"))?;
        Ok(callback(&guard))
    }

    pub fn write_store<T>(
        &self,
        callback: impl FnOnce(&mut DailyEntryStore) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut guard = self
            .entry_store
            .write()
            .map_err(|_| AppError::other("daily entry store lock poisoned"))?;
        callback(&mut guard)
    }

    /// Runs `callback` against the active check-in slot. The slot lock is always taken
    /// before the store lock.
    pub fn with_check_in_slot<T>(
        &self,
        callback: impl FnOnce(&mut Option<CheckInSession>) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut guard = self
            .active_check_in
            .lock()
            .map_err(|_| AppError::other("check-in session lock poisoned"))?;
        callback(&mut guard)
    }

    /// Runs `callback` against the active session, which must have id `session_id`.
    pub fn with_check_in<T>(
        &self,
        session_id: Uuid,
        callback: impl FnOnce(&mut CheckInSession) -> AppResult<T>,
    ) -> AppResult<T> {
        self.with_check_in_slot(|slot| match slot.as_mut() {
            Some(session) if session.id() == session_id => callback(session),
            _ => Err(AppError::not_found()),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation { message, details } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested resource does not exist", None)
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::Storage { kind, message } => {
                warn!(target: "app::command", %kind, %message, "storage error in command");
                CommandError::new(
                    kind.as_str(),
                    message,
                    Some(serde_json::json!({ "retryable": true })),
                )
            }
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("command task failed: {err}"), None))?
        .map_err(CommandError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;

    #[test]
    fn storage_errors_keep_their_kind_as_code() {
        let error: CommandError =
            AppError::storage(StorageErrorKind::QuotaExceeded, "full").into();
        assert_eq!(error.code, "STORAGE_QUOTA_EXCEEDED");
        assert_eq!(error.details, Some(serde_json::json!({ "retryable": true })));
    }

    #[test]
    fn validation_details_pass_through() {
        let error: CommandError = AppError::validation_with_details(
            "missing",
            serde_json::json!({ "missingQuestionIds": ["anxiety"] }),
        )
        .into();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(
            error.details,
            Some(serde_json::json!({ "missingQuestionIds": ["anxiety"] }))
        );
    }
}

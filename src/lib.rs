pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use std::path::Path;

use tracing::info;

use crate::commands::AppState;
use crate::db::DbPool;
use crate::error::AppResult;

const DATABASE_FILE: &str = "pridally.sqlite";
const LOG_DIR: &str = "logs";

/// Prepares `data_dir`, installs logging and opens the local database. The returned state
/// is what the host shell hands to every command.
pub fn bootstrap(data_dir: impl AsRef<Path>) -> AppResult<AppState> {
    let data_dir = data_dir.as_ref();
    std::fs::create_dir_all(data_dir)?;

    crate::utils::logger::init_logging(&data_dir.join(LOG_DIR))?;

    let pool = DbPool::new(data_dir.join(DATABASE_FILE))?;
    info!(target: "app::db", path = %pool.path().display(), "database ready");

    AppState::new(pool)
}

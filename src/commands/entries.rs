use crate::error::AppError;
use crate::models::entry::DailyEntry;
use crate::utils::dates;

use super::{run_blocking, AppState, CommandResult};

const RECENT_DAYS_RANGE: std::ops::RangeInclusive<u32> = 1..=366;

/// Entry for a `YYYY-MM-DD` date, if one was submitted.
pub async fn entries_get(state: &AppState, date: String) -> CommandResult<Option<DailyEntry>> {
    let app_state = state.clone();

    run_blocking(move || {
        let date = dates::parse_date(&date)?;
        app_state.read_store(|store| store.get(date).cloned())
    })
    .await
}

pub async fn entries_today(state: &AppState) -> CommandResult<Option<DailyEntry>> {
    let app_state = state.clone();

    run_blocking(move || {
        let today = dates::today();
        app_state.read_store(|store| store.get(today).cloned())
    })
    .await
}

/// Entries from the last `days` calendar days, today included, newest first.
pub async fn entries_recent(state: &AppState, days: u32) -> CommandResult<Vec<DailyEntry>> {
    let app_state = state.clone();

    run_blocking(move || {
        if !RECENT_DAYS_RANGE.contains(&days) {
            return Err(AppError::validation(format!(
                "days must be between {} and {}",
                RECENT_DAYS_RANGE.start(),
                RECENT_DAYS_RANGE.end()
            )));
        }
        let today = dates::today();
        app_state.read_store(|store| {
            store
                .recent(today, days)
                .into_iter()
                .cloned()
                .collect()
        })
    })
    .await
}

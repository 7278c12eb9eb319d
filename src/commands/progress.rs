use crate::error::AppError;
use crate::models::progress::{CheckInStats, ProgressOverview, StreakSummary};
use crate::services::progress_service::DEFAULT_STATS_WINDOW_DAYS;
use crate::utils::dates;

use super::{run_blocking, AppState, CommandResult};

const STATS_WINDOW_RANGE: std::ops::RangeInclusive<u32> = 1..=366;

pub async fn progress_overview(state: &AppState) -> CommandResult<ProgressOverview> {
    let app_state = state.clone();

    run_blocking(move || {
        let calculator = app_state.progress()?;
        let catalog = app_state.catalog();
        let today = dates::today();
        app_state.read_store(|store| calculator.overview(&catalog, store, today))
    })
    .await
}

pub async fn progress_streak(state: &AppState) -> CommandResult<StreakSummary> {
    let app_state = state.clone();

    run_blocking(move || {
        let calculator = app_state.progress()?;
        let today = dates::today();
        app_state.read_store(|store| calculator.streak_summary(store, today))
    })
    .await
}

/// Answer statistics over the last `window_days` days (30 when omitted). An empty window is
/// `NOT_FOUND`.
pub async fn progress_stats(
    state: &AppState,
    window_days: Option<u32>,
) -> CommandResult<CheckInStats> {
    let app_state = state.clone();

    run_blocking(move || {
        let window_days = window_days.unwrap_or(DEFAULT_STATS_WINDOW_DAYS);
        if !STATS_WINDOW_RANGE.contains(&window_days) {
            return Err(AppError::validation(format!(
                "window must be between {} and {} days",
                STATS_WINDOW_RANGE.start(),
                STATS_WINDOW_RANGE.end()
            )));
        }

        let calculator = app_state.progress()?;
        let catalog = app_state.catalog();
        let today = dates::today();
        app_state
            .read_store(|store| calculator.check_in_stats(&catalog, store, today, window_days))?
            .ok_or_else(AppError::not_found)
    })
    .await
}

use crate::models::settings::TrackerSettings;
use crate::services::settings_service::SettingsUpdateInput;

use super::{run_blocking, AppState, CommandResult};

pub async fn settings_get(state: &AppState) -> CommandResult<TrackerSettings> {
    let app_state = state.clone();

    run_blocking(move || app_state.settings().get()).await
}

/// Applies a partial update. Changes to `questionsPerPanel` take effect on the next
/// check-in that starts.
pub async fn settings_update(
    state: &AppState,
    input: SettingsUpdateInput,
) -> CommandResult<TrackerSettings> {
    let app_state = state.clone();

    run_blocking(move || app_state.settings().update(input)).await
}

use crate::error::AppError;
use crate::models::profile::{Pathway, Profile, ProfileFormOptions, ProfileInput};
use crate::services::profile_service::ProfileService;

use super::{run_blocking, AppState, CommandResult};

pub async fn profile_get(state: &AppState) -> CommandResult<Option<Profile>> {
    let app_state = state.clone();

    run_blocking(move || Ok(app_state.profile().load())).await
}

pub async fn profile_save(state: &AppState, input: ProfileInput) -> CommandResult<Profile> {
    let app_state = state.clone();

    run_blocking(move || app_state.profile().save(input)).await
}

pub async fn profile_options(pathway: String) -> CommandResult<ProfileFormOptions> {
    run_blocking(move || {
        let pathway = Pathway::try_from(pathway.trim()).map_err(AppError::validation)?;
        Ok(ProfileService::form_options(pathway))
    })
    .await
}

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::catalog::SectionId;
use crate::models::entry::{AnswerValue, DailyEntry};
use crate::models::session::{CheckInSnapshot, NextOutcome, SessionScope};
use crate::services::check_in_session::CheckInSession;
use crate::utils::dates;

use super::{run_blocking, AppState, CommandResult};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStepKind {
    PanelAdvanced,
    SectionAdvanced,
    Submitted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInStep {
    pub kind: CheckInStepKind,
    pub snapshot: CheckInSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<DailyEntry>,
}

/// Starts a fresh check-in, replacing any unsubmitted one. `focus` is a section id such as
/// `"mood"`; `None` walks every section.
pub async fn checkin_start(
    state: &AppState,
    focus: Option<String>,
) -> CommandResult<CheckInSnapshot> {
    let app_state = state.clone();

    run_blocking(move || {
        let focus = focus
            .as_deref()
            .map(SectionId::try_from)
            .transpose()
            .map_err(AppError::validation)?;
        let settings = app_state.settings().get()?;
        let session = CheckInSession::new(
            &app_state.catalog(),
            SessionScope::from_focus(focus),
            settings.questions_per_panel,
        );
        let snapshot = session.snapshot();

        app_state.with_check_in_slot(|slot| {
            if let Some(previous) = slot.replace(session) {
                info!(
                    target: "app::checkin",
                    session_id = %previous.id(),
                    answered = previous.responses().len(),
                    "unsubmitted check-in abandoned"
                );
            }
            Ok(())
        })?;

        Ok(snapshot)
    })
    .await
}

pub async fn checkin_answer(
    state: &AppState,
    session_id: Uuid,
    question_id: String,
    value: AnswerValue,
) -> CommandResult<CheckInSnapshot> {
    let app_state = state.clone();

    run_blocking(move || {
        app_state.with_check_in(session_id, |session| {
            session.answer(&question_id, value)?;
            Ok(session.snapshot())
        })
    })
    .await
}

/// Advances the active check-in. On the final step this submits today's entry and clears
/// the active slot.
pub async fn checkin_next(state: &AppState, session_id: Uuid) -> CommandResult<CheckInStep> {
    let app_state = state.clone();

    run_blocking(move || {
        let today = dates::today();
        app_state.with_check_in_slot(|slot| {
            let session = match slot.as_mut() {
                Some(session) if session.id() == session_id => session,
                _ => return Err(AppError::not_found()),
            };

            let outcome = app_state.write_store(|store| session.next(store, today))?;
            let snapshot = session.snapshot();

            let step = match outcome {
                NextOutcome::PanelAdvanced(_) => CheckInStep {
                    kind: CheckInStepKind::PanelAdvanced,
                    snapshot,
                    entry: None,
                },
                NextOutcome::SectionAdvanced(_) => CheckInStep {
                    kind: CheckInStepKind::SectionAdvanced,
                    snapshot,
                    entry: None,
                },
                NextOutcome::Submitted(entry) => {
                    *slot = None;
                    CheckInStep {
                        kind: CheckInStepKind::Submitted,
                        snapshot,
                        entry: Some(entry),
                    }
                }
            };

            Ok(step)
        })
    })
    .await
}

pub async fn checkin_previous(
    state: &AppState,
    session_id: Uuid,
) -> CommandResult<CheckInSnapshot> {
    let app_state = state.clone();

    run_blocking(move || {
        app_state.with_check_in(session_id, |session| {
            session.previous();
            Ok(session.snapshot())
        })
    })
    .await
}

pub async fn checkin_select_section(
    state: &AppState,
    session_id: Uuid,
    section_index: usize,
) -> CommandResult<CheckInSnapshot> {
    let app_state = state.clone();

    run_blocking(move || {
        app_state.with_check_in(session_id, |session| {
            session.select_section(section_index)?;
            Ok(session.snapshot())
        })
    })
    .await
}

pub async fn checkin_view(state: &AppState) -> CommandResult<Option<CheckInSnapshot>> {
    let app_state = state.clone();

    run_blocking(move || {
        app_state.with_check_in_slot(|slot| Ok(slot.as_ref().map(CheckInSession::snapshot)))
    })
    .await
}

/// Drops the active check-in and its unsaved answers. Returns whether one was active.
pub async fn checkin_abandon(state: &AppState) -> CommandResult<bool> {
    let app_state = state.clone();

    run_blocking(move || {
        app_state.with_check_in_slot(|slot| {
            let abandoned = slot.take();
            if let Some(session) = abandoned.as_ref() {
                info!(
                    target: "app::checkin",
                    session_id = %session.id(),
                    answered = session.responses().len(),
                    "check-in abandoned"
                );
            }
            Ok(abandoned.is_some())
        })
    })
    .await
}

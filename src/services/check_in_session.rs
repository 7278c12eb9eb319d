use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::catalog::{Question, Section};
use crate::models::entry::{AnswerValue, Responses};
use crate::models::session::{
    CheckInSnapshot, NextOutcome, SectionView, SessionPosition, SessionScope,
};
use crate::services::entry_store::DailyEntryStore;
use crate::services::metric_catalog::MetricCatalog;

pub const DEFAULT_QUESTIONS_PER_PANEL: usize = 2;

/// One pass through the check-in questions.
///
/// Sections are paged into panels of `questions_per_panel` questions. Answers accumulate in
/// memory and reach the [`DailyEntryStore`] only when `next` is called on the last panel of
/// the last section; dropping the session discards them.
#[derive(Debug, Clone)]
pub struct CheckInSession {
    id: Uuid,
    scope: SessionScope,
    sections: Vec<Section>,
    questions_per_panel: usize,
    position: SessionPosition,
    responses: Responses,
    completed_sections: BTreeSet<usize>,
    submitted: bool,
}

impl CheckInSession {
    pub fn new(catalog: &MetricCatalog, scope: SessionScope, questions_per_panel: usize) -> Self {
        let sections = catalog.session_sections(scope);
        let questions_per_panel = questions_per_panel.max(1);
        let id = Uuid::new_v4();

        info!(
            target: "app::checkin",
            session_id = %id,
            ?scope,
            sections = sections.len(),
            questions_per_panel,
            "check-in session started"
        );

        Self {
            id,
            scope,
            sections,
            questions_per_panel,
            position: SessionPosition::START,
            responses: Responses::new(),
            completed_sections: BTreeSet::new(),
            submitted: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    pub fn position(&self) -> SessionPosition {
        self.position
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn current_section(&self) -> &Section {
        &self.sections[self.position.section_index]
    }

    /// An empty section still has one (empty) panel.
    pub fn panel_count(&self, section_index: usize) -> usize {
        self.sections
            .get(section_index)
            .map(|section| {
                section
                    .questions
                    .len()
                    .div_ceil(self.questions_per_panel)
                    .max(1)
            })
            .unwrap_or(0)
    }

    pub fn current_questions(&self) -> &[Question] {
        let questions = &self.current_section().questions;
        let start = (self.position.panel_index * self.questions_per_panel).min(questions.len());
        let end = (start + self.questions_per_panel).min(questions.len());
        &questions[start..end]
    }

    pub fn is_panel_complete(&self) -> bool {
        self.current_questions()
            .iter()
            .all(|question| self.responses.contains_key(&question.id))
    }

    pub fn is_section_complete(&self, section_index: usize) -> bool {
        self.sections
            .get(section_index)
            .map(|section| {
                section
                    .questions
                    .iter()
                    .all(|question| self.responses.contains_key(&question.id))
            })
            .unwrap_or(false)
    }

    pub fn is_section_marked_complete(&self, section_index: usize) -> bool {
        self.completed_sections.contains(&section_index)
    }

    pub fn completed_section_count(&self) -> usize {
        self.completed_sections.len()
    }

    pub fn can_advance(&self) -> bool {
        !self.submitted && self.is_panel_complete()
    }

    pub fn can_go_back(&self) -> bool {
        !self.submitted && self.position != SessionPosition::START
    }

    /// Whether the next `next` submits.
    pub fn is_final_step(&self) -> bool {
        self.position.section_index + 1 == self.sections.len()
            && self.position.panel_index + 1 == self.panel_count(self.position.section_index)
    }

    /// Percentage of the section's questions answered in this session so far.
    pub fn section_progress(&self, section_index: usize) -> u8 {
        let Some(section) = self.sections.get(section_index) else {
            return 0;
        };
        let answered = section
            .questions
            .iter()
            .filter(|question| self.responses.contains_key(&question.id))
            .count();
        percent(answered, section.questions.len())
    }

    /// Records an answer without moving. Answering again replaces the earlier value.
    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> AppResult<()> {
        self.ensure_open()?;

        let question = self
            .sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .find(|question| question.id == question_id)
            .ok_or_else(|| {
                AppError::validation_with_details(
                    format!("{question_id} is not part of this check-in"),
                    json!({ "questionId": question_id }),
                )
            })?;

        question.check_answer(&value).map_err(|message| {
            AppError::validation_with_details(message, json!({ "questionId": question_id }))
        })?;

        debug!(target: "app::checkin", session_id = %self.id, %question_id, %value, "answer recorded");
        self.responses.insert(question_id.to_string(), value);
        Ok(())
    }

    /// Moves forward one panel, one section, or submits on the final step.
    ///
    /// Refused with a validation error while the current panel has unanswered questions. A
    /// failed submit leaves the session on the final panel so the call can be retried.
    pub fn next(&mut self, store: &mut DailyEntryStore, today: NaiveDate) -> AppResult<NextOutcome> {
        self.ensure_open()?;

        if !self.is_panel_complete() {
            let missing: Vec<&str> = self
                .current_questions()
                .iter()
                .filter(|question| !self.responses.contains_key(&question.id))
                .map(|question| question.id.as_str())
                .collect();
            return Err(AppError::validation_with_details(
                "answer every question on this panel before continuing",
                json!({ "missingQuestionIds": missing }),
            ));
        }

        let SessionPosition {
            section_index,
            panel_index,
        } = self.position;

        if panel_index + 1 < self.panel_count(section_index) {
            self.position.panel_index += 1;
            return Ok(NextOutcome::PanelAdvanced(self.position));
        }

        if self.is_section_complete(section_index) {
            self.completed_sections.insert(section_index);
        }

        if section_index + 1 < self.sections.len() {
            self.position = SessionPosition {
                section_index: section_index + 1,
                panel_index: 0,
            };
            return Ok(NextOutcome::SectionAdvanced(self.position));
        }

        let entry = match store.submit(today, self.responses.clone()) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    target: "app::checkin",
                    session_id = %self.id,
                    error = %err,
                    "check-in submit failed, answers kept for retry"
                );
                return Err(err);
            }
        };

        self.submitted = true;
        info!(
            target: "app::checkin",
            session_id = %self.id,
            date = %today,
            answered = self.responses.len(),
            "check-in submitted"
        );
        Ok(NextOutcome::Submitted(entry))
    }

    /// Steps back one panel, crossing into the previous section's last panel. Returns
    /// `false` when already at the start.
    pub fn previous(&mut self) -> bool {
        if self.submitted {
            return false;
        }

        if self.position.panel_index > 0 {
            self.position.panel_index -= 1;
            return true;
        }

        if self.position.section_index > 0 {
            let section_index = self.position.section_index - 1;
            self.position = SessionPosition {
                section_index,
                panel_index: self.panel_count(section_index) - 1,
            };
            return true;
        }

        false
    }

    /// Jumps to the first panel of `section_index`.
    pub fn select_section(&mut self, section_index: usize) -> AppResult<()> {
        self.ensure_open()?;

        if section_index >= self.sections.len() {
            return Err(AppError::validation_with_details(
                format!("section index {section_index} is out of range"),
                json!({ "sectionIndex": section_index, "sectionCount": self.sections.len() }),
            ));
        }

        self.position = SessionPosition {
            section_index,
            panel_index: 0,
        };
        Ok(())
    }

    pub fn snapshot(&self) -> CheckInSnapshot {
        let sections = self
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| SectionView {
                section_id: section.id,
                name: section.name.clone(),
                question_count: section.questions.len(),
                panel_count: self.panel_count(index),
                progress_percent: self.section_progress(index),
                completed: self.is_section_marked_complete(index),
            })
            .collect();

        CheckInSnapshot {
            session_id: self.id,
            scope: self.scope,
            position: self.position,
            panel_count: self.panel_count(self.position.section_index),
            current_questions: self.current_questions().to_vec(),
            sections,
            completed_sections: self.completed_section_count(),
            can_advance: self.can_advance(),
            can_go_back: self.can_go_back(),
            is_final_step: self.is_final_step(),
            submitted: self.submitted,
        }
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.submitted {
            return Err(AppError::conflict("check-in has already been submitted"));
        }
        Ok(())
    }
}

pub(crate) fn percent(answered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((answered as f64 / total as f64) * 100.0).round() as u8
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{Question, SectionId};
use super::entry::DailyEntry;

/// Which sections a check-in walks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", content = "section", rename_all = "snake_case")]
pub enum SessionScope {
    #[default]
    Full,
    Focus(SectionId),
}

impl SessionScope {
    pub fn from_focus(focus: Option<SectionId>) -> Self {
        match focus {
            Some(section) => SessionScope::Focus(section),
            None => SessionScope::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionPosition {
    pub section_index: usize,
    pub panel_index: usize,
}

impl SessionPosition {
    pub const START: SessionPosition = SessionPosition {
        section_index: 0,
        panel_index: 0,
    };
}

/// What a successful `next` did.
#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    PanelAdvanced(SessionPosition),
    SectionAdvanced(SessionPosition),
    Submitted(DailyEntry),
}

impl NextOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, NextOutcome::Submitted(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section_id: SectionId,
    pub name: String,
    pub question_count: usize,
    pub panel_count: usize,
    pub progress_percent: u8,
    pub completed: bool,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSnapshot {
    pub session_id: Uuid,
    pub scope: SessionScope,
    pub position: SessionPosition,
    pub panel_count: usize,
    pub current_questions: Vec<Question>,
    pub sections: Vec<SectionView>,
    pub completed_sections: usize,
    pub can_advance: bool,
    pub can_go_back: bool,
    pub is_final_step: bool,
    pub submitted: bool,
}

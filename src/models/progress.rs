use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{QuestionKind, SectionId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section_id: SectionId,
    pub name: String,
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<NaiveDate>,
}

/// Dashboard numbers for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub date: NaiveDate,
    pub overall_percent: u8,
    pub sections: Vec<SectionProgress>,
    pub current_streak: u32,
    pub has_progress_today: bool,
    pub completed_all_today: bool,
}

/// Aggregate of one question's answers over a stats window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub section_id: SectionId,
    pub kind: QuestionKind,
    pub answered: usize,
    /// Mean of numeric answers, two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Most frequent integer answer; the smaller value wins a tie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common: Option<i64>,
    /// Share of `true` answers for yes/no questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_percent: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_check_ins: usize,
    pub total_exercise_minutes: i64,
    pub questions: Vec<QuestionStats>,
}

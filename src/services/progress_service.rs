use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::catalog::{Question, QuestionKind, SectionId};
use crate::models::entry::{AnswerValue, DailyEntry};
use crate::models::progress::{
    CheckInStats, ProgressOverview, QuestionStats, SectionProgress, StreakSummary,
};
use crate::models::settings::{EmptySectionPolicy, TrackerSettings};
use crate::services::check_in_session::percent;
use crate::services::entry_store::DailyEntryStore;
use crate::services::metric_catalog::MetricCatalog;

pub const DEFAULT_STREAK_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 30;

const EXERCISE_DURATION_ID: &str = "exercise_duration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Upper bound on how many days `current_streak` walks back.
    pub streak_lookback_days: u32,
    pub empty_section_policy: EmptySectionPolicy,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            streak_lookback_days: DEFAULT_STREAK_LOOKBACK_DAYS,
            empty_section_policy: EmptySectionPolicy::ZeroPercent,
        }
    }
}

impl From<&TrackerSettings> for ProgressOptions {
    fn from(settings: &TrackerSettings) -> Self {
        Self {
            streak_lookback_days: settings.streak_lookback_days,
            empty_section_policy: settings.empty_section_policy,
        }
    }
}

/// Derived, read-only views over the store. Holds no state beyond its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressCalculator {
    options: ProgressOptions,
}

impl ProgressCalculator {
    pub fn new(options: ProgressOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ProgressOptions {
        self.options
    }

    pub fn section_progress(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        section: SectionId,
        today: NaiveDate,
    ) -> u8 {
        let questions = catalog.questions_for(section);
        let answered = answered_count(store.get(today), questions.iter());
        percent(answered, questions.len())
    }

    pub fn overall_progress(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        today: NaiveDate,
    ) -> u8 {
        let answered = answered_count(store.get(today), catalog.all_questions());
        percent(answered, catalog.question_count())
    }

    /// Consecutive calendar days ending today with a completed entry.
    pub fn current_streak(&self, store: &DailyEntryStore, today: NaiveDate) -> u32 {
        let mut streak = 0;
        for offset in 0..self.options.streak_lookback_days {
            let day = today - Duration::days(i64::from(offset));
            match store.get(day) {
                Some(entry) if entry.completed => streak += 1,
                _ => break,
            }
        }
        streak
    }

    /// Streak statistics over the whole store, unbounded by the lookback window.
    pub fn streak_summary(&self, store: &DailyEntryStore, today: NaiveDate) -> StreakSummary {
        let mut days: Vec<NaiveDate> = store
            .entries()
            .iter()
            .filter(|entry| entry.completed && entry.date <= today)
            .map(|entry| entry.date)
            .collect();
        days.sort_unstable();
        days.dedup();

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for day in &days {
            run = match previous {
                Some(prev) if *day - prev == Duration::days(1) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(*day);
        }

        StreakSummary {
            current_streak: self.current_streak(store, today),
            longest_streak: longest,
            total_completed_days: days.len() as u32,
            last_completed_date: days.last().copied(),
        }
    }

    /// At least one catalog question has an answer today.
    pub fn has_progress_today(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        today: NaiveDate,
    ) -> bool {
        answered_count(store.get(today), catalog.all_questions()) > 0
    }

    /// Every catalog question has an answer today.
    pub fn has_completed_all_today(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        today: NaiveDate,
    ) -> bool {
        match store.get(today) {
            Some(entry) => catalog
                .all_questions()
                .all(|question| entry.has_answer(&question.id)),
            None => false,
        }
    }

    pub fn overview(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        today: NaiveDate,
    ) -> ProgressOverview {
        let entry = store.get(today);
        let sections: Vec<SectionProgress> = catalog
            .sections()
            .iter()
            .filter(|section| {
                !(section.questions.is_empty()
                    && self.options.empty_section_policy == EmptySectionPolicy::Exclude)
            })
            .map(|section| {
                let answered = answered_count(entry, section.questions.iter());
                SectionProgress {
                    section_id: section.id,
                    name: section.name.clone(),
                    answered,
                    total: section.questions.len(),
                    percent: percent(answered, section.questions.len()),
                }
            })
            .collect();

        let overview = ProgressOverview {
            date: today,
            overall_percent: self.overall_progress(catalog, store, today),
            sections,
            current_streak: self.current_streak(store, today),
            has_progress_today: self.has_progress_today(catalog, store, today),
            completed_all_today: self.has_completed_all_today(catalog, store, today),
        };

        debug!(
            target: "app::progress",
            date = %today,
            overall = overview.overall_percent,
            streak = overview.current_streak,
            "progress overview computed"
        );

        overview
    }

    /// Per-question aggregates over the entries of the last `window_days` days ending at
    /// `today`. `None` when the window holds no entries.
    pub fn check_in_stats(
        &self,
        catalog: &MetricCatalog,
        store: &DailyEntryStore,
        today: NaiveDate,
        window_days: u32,
    ) -> Option<CheckInStats> {
        let entries = store.recent(today, window_days);
        if entries.is_empty() {
            return None;
        }
        let window = entries.as_slice();

        let questions: Vec<QuestionStats> = catalog
            .sections()
            .iter()
            .flat_map(|section| {
                section
                    .questions
                    .iter()
                    .map(move |question| question_stats(section.id, question, window))
            })
            .collect();

        let total_exercise_minutes: i64 = entries
            .iter()
            .filter_map(|entry| match entry.responses.get(EXERCISE_DURATION_ID) {
                Some(AnswerValue::Integer(minutes)) => Some(*minutes),
                Some(AnswerValue::Decimal(minutes)) => Some(minutes.round() as i64),
                _ => None,
            })
            .sum();

        let stats = CheckInStats {
            start_date: today - Duration::days(i64::from(window_days) - 1),
            end_date: today,
            total_check_ins: entries.len(),
            total_exercise_minutes,
            questions,
        };

        debug!(
            target: "app::progress",
            window_days,
            check_ins = stats.total_check_ins,
            "check-in stats computed"
        );

        Some(stats)
    }
}

fn question_stats(
    section_id: SectionId,
    question: &Question,
    entries: &[&DailyEntry],
) -> QuestionStats {
    let answers: Vec<&AnswerValue> = entries
        .iter()
        .filter_map(|entry| entry.responses.get(&question.id))
        .collect();

    let mut stats = QuestionStats {
        question_id: question.id.clone(),
        section_id,
        kind: question.kind,
        answered: answers.len(),
        average: None,
        most_common: None,
        yes_percent: None,
    };

    match question.kind {
        QuestionKind::Scale => {
            let numbers: Vec<f64> = answers
                .iter()
                .filter_map(|answer| match answer {
                    AnswerValue::Integer(value) => Some(*value as f64),
                    AnswerValue::Decimal(value) => Some(*value),
                    _ => None,
                })
                .collect();
            if !numbers.is_empty() {
                let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
                stats.average = Some((mean * 100.0).round() / 100.0);
            }

            let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
            for answer in &answers {
                if let AnswerValue::Integer(value) = answer {
                    *counts.entry(*value).or_default() += 1;
                }
            }
            // keys ascend, so a tie keeps the smaller value
            stats.most_common = counts
                .into_iter()
                .fold(None, |best: Option<(i64, usize)>, (value, count)| match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((value, count)),
                })
                .map(|(value, _)| value);
        }
        QuestionKind::Boolean => {
            let flags: Vec<bool> = answers
                .iter()
                .filter_map(|answer| match answer {
                    AnswerValue::Boolean(flag) => Some(*flag),
                    _ => None,
                })
                .collect();
            if !flags.is_empty() {
                let yes = flags.iter().filter(|flag| **flag).count();
                stats.yes_percent = Some(percent(yes, flags.len()));
            }
        }
        QuestionKind::Text => {}
    }

    stats
}

fn answered_count<'a>(
    entry: Option<&DailyEntry>,
    questions: impl Iterator<Item = &'a Question>,
) -> usize {
    match entry {
        Some(entry) => questions
            .filter(|question| entry.has_answer(&question.id))
            .count(),
        None => 0,
    }
}

use std::sync::Arc;

use chrono::NaiveDate;
use pridally_checkin_lib::models::catalog::{QuestionKind, Section, SectionId};
use pridally_checkin_lib::models::entry::{AnswerValue, Responses};
use pridally_checkin_lib::models::session::SessionScope;
use pridally_checkin_lib::models::settings::EmptySectionPolicy;
use pridally_checkin_lib::services::check_in_session::CheckInSession;
use pridally_checkin_lib::services::entry_store::DailyEntryStore;
use pridally_checkin_lib::services::metric_catalog::MetricCatalog;
use pridally_checkin_lib::services::progress_service::{ProgressCalculator, ProgressOptions};
use pridally_checkin_lib::storage::MemoryLocalStorage;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

fn store_with(days: &[u32]) -> DailyEntryStore {
    let mut store = DailyEntryStore::load(Arc::new(MemoryLocalStorage::new()));
    for d in days {
        store.submit(day(*d), Responses::new()).unwrap();
    }
    store
}

#[test]
fn streak_counts_back_from_today_until_a_gap() {
    let calculator = ProgressCalculator::default();

    let store = store_with(&[10, 12, 13, 14]);
    assert_eq!(calculator.current_streak(&store, day(14)), 3);

    let store = store_with(&[11, 12, 13]);
    assert_eq!(calculator.current_streak(&store, day(14)), 0);
}

#[test]
fn streak_summary_tracks_longest_run() {
    let store = store_with(&[1, 2, 3, 4, 8, 9]);
    let summary = ProgressCalculator::default().streak_summary(&store, day(9));

    assert_eq!(summary.current_streak, 2);
    assert_eq!(summary.longest_streak, 4);
    assert_eq!(summary.total_completed_days, 6);
    assert_eq!(summary.last_completed_date, Some(day(9)));
}

#[test]
fn section_and_overall_percentages_round() {
    let catalog = MetricCatalog::default();
    let mut store = store_with(&[]);
    let answers: Responses = [
        ("mood_rating", AnswerValue::Integer(6)),
        ("stress_level", AnswerValue::Integer(3)),
        ("loneliness", AnswerValue::Boolean(false)),
    ]
    .into_iter()
    .map(|(id, value)| (id.to_string(), value))
    .collect();
    store.submit(day(14), answers).unwrap();

    let calculator = ProgressCalculator::default();
    assert_eq!(
        calculator.section_progress(&catalog, &store, SectionId::Mood, day(14)),
        67
    );
    assert_eq!(
        calculator.section_progress(&catalog, &store, SectionId::Social, day(14)),
        33
    );
    assert_eq!(
        calculator.section_progress(&catalog, &store, SectionId::Exercise, day(14)),
        0
    );
    // 3 of 15
    assert_eq!(calculator.overall_progress(&catalog, &store, day(14)), 20);
    assert!(calculator.has_progress_today(&catalog, &store, day(14)));
    assert!(!calculator.has_completed_all_today(&catalog, &store, day(14)));
    assert!(!calculator.has_progress_today(&catalog, &store, day(13)));
}

#[test]
fn answers_outside_the_catalog_do_not_count() {
    let catalog = MetricCatalog::default();
    let mut store = store_with(&[]);
    let answers: Responses = [("retired_question".to_string(), AnswerValue::Boolean(true))]
        .into_iter()
        .collect();
    store.submit(day(14), answers).unwrap();

    let calculator = ProgressCalculator::default();
    assert_eq!(calculator.overall_progress(&catalog, &store, day(14)), 0);
    assert!(!calculator.has_progress_today(&catalog, &store, day(14)));
}

#[test]
fn empty_sections_follow_the_policy() {
    let mut sections = MetricCatalog::default().sections().to_vec();
    sections.retain(|section| section.id != SectionId::Social);
    sections.push(Section::empty(SectionId::Social));
    let catalog = MetricCatalog::new(sections);
    let store = store_with(&[14]);

    let zero = ProgressCalculator::default().overview(&catalog, &store, day(14));
    assert_eq!(zero.sections.len(), 5);
    let social = zero
        .sections
        .iter()
        .find(|section| section.section_id == SectionId::Social)
        .unwrap();
    assert_eq!(social.percent, 0);
    assert_eq!(social.total, 0);

    let excluded = ProgressCalculator::new(ProgressOptions {
        empty_section_policy: EmptySectionPolicy::Exclude,
        ..ProgressOptions::default()
    })
    .overview(&catalog, &store, day(14));
    assert_eq!(excluded.sections.len(), 4);
    assert_eq!(excluded.current_streak, 1);
}

fn answers(pairs: &[(&str, AnswerValue)]) -> Responses {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

fn expected_percent(answered: usize, total: usize) -> u8 {
    ((answered as f64 / total as f64) * 100.0).round() as u8
}

#[test]
fn stats_aggregate_answers_over_the_window() {
    let catalog = MetricCatalog::default();
    let mut store = store_with(&[]);
    // outside a 7 day window ending on the 14th
    store
        .submit(
            day(1),
            answers(&[
                ("mood_rating", AnswerValue::Integer(1)),
                ("exercise_duration", AnswerValue::Integer(90)),
            ]),
        )
        .unwrap();
    store
        .submit(
            day(12),
            answers(&[
                ("mood_rating", AnswerValue::Integer(7)),
                ("energy_level", AnswerValue::Integer(4)),
                ("exercise_duration", AnswerValue::Integer(30)),
                ("anxiety", AnswerValue::Boolean(true)),
            ]),
        )
        .unwrap();
    store
        .submit(
            day(13),
            answers(&[
                ("mood_rating", AnswerValue::Integer(8)),
                ("exercise_duration", AnswerValue::Integer(45)),
                ("anxiety", AnswerValue::Boolean(false)),
            ]),
        )
        .unwrap();
    store
        .submit(
            day(14),
            answers(&[
                ("mood_rating", AnswerValue::Integer(7)),
                ("anxiety", AnswerValue::Boolean(false)),
            ]),
        )
        .unwrap();

    let stats = ProgressCalculator::default()
        .check_in_stats(&catalog, &store, day(14), 7)
        .unwrap();

    assert_eq!(stats.start_date, day(8));
    assert_eq!(stats.end_date, day(14));
    assert_eq!(stats.total_check_ins, 3);
    assert_eq!(stats.total_exercise_minutes, 75);
    assert_eq!(stats.questions.len(), catalog.question_count());

    let find = |id: &str| {
        stats
            .questions
            .iter()
            .find(|question| question.question_id == id)
            .unwrap()
    };

    let mood = find("mood_rating");
    assert_eq!(mood.section_id, SectionId::Mood);
    assert_eq!(mood.average, Some(7.33));
    assert_eq!(mood.most_common, Some(7));

    let energy = find("energy_level");
    assert_eq!(energy.answered, 1);
    assert_eq!(energy.average, Some(4.0));

    let anxiety = find("anxiety");
    assert_eq!(anxiety.kind, QuestionKind::Boolean);
    assert_eq!(anxiety.yes_percent, Some(33));
    assert_eq!(anxiety.average, None);

    let loneliness = find("loneliness");
    assert_eq!(loneliness.answered, 0);
    assert_eq!(loneliness.yes_percent, None);
}

#[test]
fn stats_are_absent_for_an_empty_window() {
    let catalog = MetricCatalog::default();
    let store = store_with(&[1, 2]);
    let calculator = ProgressCalculator::default();

    assert!(calculator
        .check_in_stats(&catalog, &store, day(14), 7)
        .is_none());
    assert!(calculator
        .check_in_stats(&catalog, &store, day(14), 30)
        .is_some());
}

#[test]
fn percentages_match_answered_share_for_every_answer_subset() {
    let catalog = MetricCatalog::default();
    let total = catalog.question_count();

    for section in catalog.sections() {
        let questions = &section.questions;
        for mask in 0u32..(1 << questions.len()) {
            let chosen: Responses = questions
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, question)| {
                    let value = match question.kind {
                        QuestionKind::Boolean => AnswerValue::Boolean(false),
                        QuestionKind::Scale => AnswerValue::Integer(
                            question.scale.as_ref().unwrap().default_value(),
                        ),
                        QuestionKind::Text => AnswerValue::Text(String::new()),
                    };
                    (question.id.clone(), value)
                })
                .collect();
            let answered = chosen.len();

            let mut session =
                CheckInSession::new(&catalog, SessionScope::Focus(section.id), 2);
            for (id, value) in &chosen {
                session.answer(id, value.clone()).unwrap();
            }
            assert_eq!(
                session.section_progress(0),
                expected_percent(answered, questions.len())
            );

            let mut store = store_with(&[]);
            store.submit(day(14), chosen).unwrap();
            let calculator = ProgressCalculator::default();

            let section_percent =
                calculator.section_progress(&catalog, &store, section.id, day(14));
            let overall = calculator.overall_progress(&catalog, &store, day(14));
            assert_eq!(section_percent, expected_percent(answered, questions.len()));
            assert_eq!(overall, expected_percent(answered, total));
            assert!(section_percent <= 100 && overall <= 100);
        }
    }
}

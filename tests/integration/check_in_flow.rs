use std::sync::Arc;

use chrono::NaiveDate;
use pridally_checkin_lib::error::{AppError, StorageErrorKind};
use pridally_checkin_lib::models::catalog::{QuestionKind, SectionId};
use pridally_checkin_lib::models::entry::AnswerValue;
use pridally_checkin_lib::models::session::{NextOutcome, SessionPosition, SessionScope};
use pridally_checkin_lib::services::check_in_session::CheckInSession;
use pridally_checkin_lib::services::entry_store::DailyEntryStore;
use pridally_checkin_lib::services::metric_catalog::MetricCatalog;
use pridally_checkin_lib::storage::MemoryLocalStorage;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
}

fn answer_current_panel(session: &mut CheckInSession) {
    let questions = session.current_questions().to_vec();
    for question in questions {
        let value = match question.kind {
            QuestionKind::Boolean => AnswerValue::Boolean(true),
            QuestionKind::Scale => {
                AnswerValue::Integer(question.scale.as_ref().unwrap().default_value())
            }
            QuestionKind::Text => AnswerValue::Text("fine".to_string()),
        };
        session.answer(&question.id, value).unwrap();
    }
}

#[test]
fn mood_focus_walkthrough() {
    let catalog = MetricCatalog::default();
    let storage = Arc::new(MemoryLocalStorage::new());
    let mut store = DailyEntryStore::load(storage.clone());
    let mut session = CheckInSession::new(&catalog, SessionScope::Focus(SectionId::Mood), 2);

    assert_eq!(session.sections().len(), 1);
    assert_eq!(session.panel_count(0), 2);
    let first_panel: Vec<&str> = session
        .current_questions()
        .iter()
        .map(|question| question.id.as_str())
        .collect();
    assert_eq!(first_panel, vec!["mood_rating", "stress_level"]);
    assert!(!session.can_advance());

    session.answer("mood_rating", AnswerValue::Integer(7)).unwrap();
    session.answer("stress_level", AnswerValue::Integer(4)).unwrap();
    assert_eq!(session.section_progress(0), 67);
    assert!(session.can_advance());

    let outcome = session.next(&mut store, today()).unwrap();
    assert_eq!(
        outcome,
        NextOutcome::PanelAdvanced(SessionPosition {
            section_index: 0,
            panel_index: 1
        })
    );
    assert!(session.is_final_step());

    let err = session.next(&mut store, today()).unwrap_err();
    match err {
        AppError::Validation { details, .. } => {
            assert_eq!(
                details,
                Some(serde_json::json!({ "missingQuestionIds": ["anxiety"] }))
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(storage.write_count(), 0);

    session.answer("anxiety", AnswerValue::Boolean(false)).unwrap();
    let outcome = session.next(&mut store, today()).unwrap();
    let NextOutcome::Submitted(entry) = outcome else {
        panic!("expected submission");
    };

    assert!(entry.completed);
    assert_eq!(entry.responses.len(), 3);
    assert_eq!(
        entry.responses.get("mood_rating"),
        Some(&AnswerValue::Integer(7))
    );
    assert!(session.is_submitted());
    assert_eq!(storage.write_count(), 1);
    assert_eq!(store.get(today()), Some(&entry));
}

#[test]
fn full_check_in_writes_once() {
    let catalog = MetricCatalog::default();
    let storage = Arc::new(MemoryLocalStorage::new());
    let mut store = DailyEntryStore::load(storage.clone());
    let mut session = CheckInSession::new(&catalog, SessionScope::Full, 2);

    let order: Vec<SectionId> = session.sections().iter().map(|s| s.id).collect();
    assert_eq!(
        order,
        vec![
            SectionId::SexualHealth,
            SectionId::Mood,
            SectionId::ReproductiveHealth,
            SectionId::Social,
            SectionId::Exercise,
        ]
    );

    let mut steps = 0;
    let entry = loop {
        answer_current_panel(&mut session);
        steps += 1;
        match session.next(&mut store, today()).unwrap() {
            NextOutcome::Submitted(entry) => break entry,
            _ => assert_eq!(storage.write_count(), 0),
        }
    };

    // five sections of three questions at two per panel
    assert_eq!(steps, 10);
    assert_eq!(session.completed_section_count(), 5);
    assert_eq!(entry.responses.len(), catalog.question_count());
    assert_eq!(storage.write_count(), 1);
}

#[test]
fn previous_crosses_section_boundaries() {
    let catalog = MetricCatalog::default();
    let mut store = DailyEntryStore::load(Arc::new(MemoryLocalStorage::new()));
    let mut session = CheckInSession::new(&catalog, SessionScope::Full, 2);

    assert!(!session.previous());

    answer_current_panel(&mut session);
    session.next(&mut store, today()).unwrap();
    answer_current_panel(&mut session);
    session.next(&mut store, today()).unwrap();
    assert_eq!(
        session.position(),
        SessionPosition {
            section_index: 1,
            panel_index: 0
        }
    );

    assert!(session.previous());
    assert_eq!(
        session.position(),
        SessionPosition {
            section_index: 0,
            panel_index: 1
        }
    );
    assert!(session.is_panel_complete());
}

#[test]
fn failed_submit_can_be_retried() {
    let catalog = MetricCatalog::default();
    let storage = Arc::new(MemoryLocalStorage::new());
    let mut store = DailyEntryStore::load(storage.clone());
    let mut session = CheckInSession::new(&catalog, SessionScope::Focus(SectionId::Social), 3);

    answer_current_panel(&mut session);
    storage.set_unavailable(true);

    let err = session.next(&mut store, today()).unwrap_err();
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::Unavailable));
    assert!(!session.is_submitted());
    assert!(session.is_final_step());
    assert!(store.get(today()).is_none());

    storage.set_unavailable(false);
    let outcome = session.next(&mut store, today()).unwrap();
    assert!(outcome.is_submitted());
    assert_eq!(storage.write_count(), 1);
}

#[test]
fn submitted_session_rejects_further_changes() {
    let catalog = MetricCatalog::default();
    let mut store = DailyEntryStore::load(Arc::new(MemoryLocalStorage::new()));
    let mut session = CheckInSession::new(&catalog, SessionScope::Focus(SectionId::Exercise), 5);

    answer_current_panel(&mut session);
    session.next(&mut store, today()).unwrap();

    let err = session
        .answer("energy_level", AnswerValue::Integer(3))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
    assert!(!session.previous());
    assert!(session.next(&mut store, today()).is_err());
}

use std::sync::Arc;

use chrono::NaiveDate;
use pridally_checkin_lib::db::DbPool;
use pridally_checkin_lib::error::StorageErrorKind;
use pridally_checkin_lib::models::entry::{AnswerValue, Responses};
use pridally_checkin_lib::services::entry_store::{DailyEntryStore, DAILY_ENTRIES_KEY};
use pridally_checkin_lib::storage::{LocalStorage, MemoryLocalStorage, SqliteLocalStorage};
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

fn responses(pairs: &[(&str, AnswerValue)]) -> Responses {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

fn sqlite_storage(dir: &TempDir) -> Arc<SqliteLocalStorage> {
    let pool = DbPool::new(dir.path().join("entries.sqlite")).unwrap();
    Arc::new(SqliteLocalStorage::new(pool))
}

#[test]
fn entries_survive_a_restart() {
    let dir = TempDir::new().unwrap();

    let mut store = DailyEntryStore::load(sqlite_storage(&dir));
    store
        .submit(day(13), responses(&[("loneliness", AnswerValue::Boolean(true))]))
        .unwrap();
    let submitted = store
        .submit(day(14), responses(&[("mood_rating", AnswerValue::Integer(8))]))
        .unwrap();

    let reopened = DailyEntryStore::load(sqlite_storage(&dir));
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(day(14)), Some(&submitted));
}

#[test]
fn resubmitting_a_day_merges_answers() {
    let mut store = DailyEntryStore::load(Arc::new(MemoryLocalStorage::new()));
    store
        .submit(
            day(14),
            responses(&[
                ("mood_rating", AnswerValue::Integer(7)),
                ("anxiety", AnswerValue::Boolean(true)),
            ]),
        )
        .unwrap();
    let merged = store
        .submit(
            day(14),
            responses(&[
                ("anxiety", AnswerValue::Boolean(false)),
                ("energy_level", AnswerValue::Integer(5)),
            ]),
        )
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(merged.responses.len(), 3);
    assert_eq!(
        merged.responses.get("mood_rating"),
        Some(&AnswerValue::Integer(7))
    );
    assert_eq!(
        merged.responses.get("anxiety"),
        Some(&AnswerValue::Boolean(false))
    );
}

#[test]
fn corrupt_data_loads_as_empty_and_is_replaced_on_submit() {
    let storage = Arc::new(MemoryLocalStorage::seeded(DAILY_ENTRIES_KEY, "[{\"date\":"));
    let mut store = DailyEntryStore::load(storage.clone());
    assert!(store.is_empty());

    store.submit(day(14), Responses::new()).unwrap();
    let raw = storage.get_item(DAILY_ENTRIES_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn quota_failure_leaves_store_unchanged() {
    let storage = Arc::new(MemoryLocalStorage::with_quota(64));
    let mut store = DailyEntryStore::load(storage);

    let err = store
        .submit(
            day(14),
            responses(&[("mood_rating", AnswerValue::Integer(7))]),
        )
        .unwrap_err();

    assert_eq!(err.storage_kind(), Some(StorageErrorKind::QuotaExceeded));
    assert!(store.get(day(14)).is_none());
}

#[test]
fn history_views_are_newest_first() {
    let mut store = DailyEntryStore::load(Arc::new(MemoryLocalStorage::new()));
    for d in [2, 9, 12, 14] {
        store.submit(day(d), Responses::new()).unwrap();
    }

    let week: Vec<NaiveDate> = store.recent(day(14), 7).iter().map(|e| e.date).collect();
    assert_eq!(week, vec![day(14), day(12), day(9)]);

    let between: Vec<NaiveDate> = store
        .entries_between(day(1), day(9))
        .iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(between, vec![day(9), day(2)]);
    assert!(store.recent(day(14), 0).is_empty());
}

#[test]
fn reload_picks_up_writes_from_another_store() {
    let storage = Arc::new(MemoryLocalStorage::new());
    let mut reader = DailyEntryStore::load(storage.clone());
    let mut writer = DailyEntryStore::load(storage);

    writer.submit(day(14), Responses::new()).unwrap();
    assert!(reader.get(day(14)).is_none());

    reader.reload();
    assert_eq!(reader.len(), 1);
}

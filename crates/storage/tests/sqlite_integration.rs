use std::collections::BTreeMap;

use quiz_core::model::{GradeResult, GradingEvent};
use quiz_core::stats::StatsAccumulator;
use storage::json::{read_json, write_json};
use storage::keys::{CHAPTER_STATS, quiz_key};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_set_replaces_previous_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get("dailyStats").await.unwrap().is_none());

    repo.set("dailyStats", "{}".into()).await.unwrap();
    repo.set("dailyStats", r#"{"2024-01-01":{"total":1}}"#.into())
        .await
        .unwrap();

    let value = repo.get("dailyStats").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"2024-01-01":{"total":1}}"#));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set(&quiz_key("Math", "Algebra"), "{}".into())
        .await
        .unwrap();
    repo.migrate().await.expect("second migrate");

    let value = repo.get("quiz_math_algebra").await.unwrap();
    assert_eq!(value.as_deref(), Some("{}"));
}

#[tokio::test]
async fn storage_persists_chapter_stats_as_json() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut acc = StatsAccumulator::new();
    acc.apply(&GradingEvent::new("Math", "Algebra", 0, GradeResult::Correct).with_time_spent(30));
    let mut chapters = BTreeMap::new();
    chapters.insert("math_algebra".to_owned(), acc.clone());

    write_json(storage.kv.as_ref(), CHAPTER_STATS, &chapters)
        .await
        .unwrap();

    let raw = storage.kv.get(CHAPTER_STATS).await.unwrap().unwrap();
    assert!(raw.contains(r#""totalTime":30"#));
    assert!(raw.contains(r#""bySubject""#));

    let back: BTreeMap<String, StatsAccumulator> =
        read_json(storage.kv.as_ref(), CHAPTER_STATS).await.unwrap().unwrap();
    assert_eq!(back.get("math_algebra"), Some(&acc));
}

//! Unit tests for the in-memory timer store.

use super::{MemoryTimerStore, TimerStore};
use crate::record::{NotificationConfig, TimerRecord};
use tokio::time::Duration;

fn record(id: u64, name: &str, recipe: Option<u64>, step: Option<u64>) -> TimerRecord {
    TimerRecord::new(
        id,
        name.to_string(),
        Duration::from_secs(60),
        recipe,
        step,
        NotificationConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_insert_and_lookup() {
    let store = MemoryTimerStore::new();
    store.insert(record(1, "eggs", None, None)).await.unwrap();

    let found = store.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(found.name, "eggs");
    assert!(store.get_by_id(2).await.unwrap().is_none());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_get_all_is_newest_first() {
    tokio::time::pause();
    let store = MemoryTimerStore::new();
    for (id, name) in [(1, "first"), (2, "second"), (3, "third")] {
        store.insert(record(id, name, None, None)).await.unwrap();
        // Separate the creation instants so the ordering is observable.
        tokio::time::advance(Duration::from_millis(10)).await;
    }

    let all = store.get_all().await.unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_update_replaces_record_state() {
    tokio::time::pause();
    let store = MemoryTimerStore::new();
    store.insert(record(1, "rice", None, None)).await.unwrap();

    let mut updated = store.get_by_id(1).await.unwrap().unwrap();
    updated.start(tokio::time::Instant::now());
    store.update(updated).await.unwrap();

    let found = store.get_by_id(1).await.unwrap().unwrap();
    assert!(found.is_running);
    assert!(found.anchor_start.is_some());
}

#[tokio::test]
async fn test_delete_is_a_no_op_for_unknown_ids() {
    let store = MemoryTimerStore::new();
    store.insert(record(1, "soup", None, None)).await.unwrap();

    store.delete(99).await.unwrap();
    assert_eq!(store.len(), 1);

    store.delete(1).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_recipe_and_step_filters() {
    let store = MemoryTimerStore::new();
    store.insert(record(1, "sear", Some(7), Some(70))).await.unwrap();
    store.insert(record(2, "rest", Some(7), Some(71))).await.unwrap();
    store.insert(record(3, "boil", Some(8), None)).await.unwrap();
    store.insert(record(4, "free", None, None)).await.unwrap();

    let for_recipe = store.get_for_recipe(7).await.unwrap();
    assert_eq!(for_recipe.len(), 2);

    let for_step = store.get_for_step(71).await.unwrap();
    assert_eq!(for_step.len(), 1);
    assert_eq!(for_step[0].name, "rest");

    store.delete_for_recipe(7).await.unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get_by_id(1).await.unwrap().is_none());
    assert!(store.get_by_id(4).await.unwrap().is_some());
}

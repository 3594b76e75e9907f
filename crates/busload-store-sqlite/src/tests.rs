//! Integration tests for `SqliteStore`.

use busload_core::{NewReading, store::ReadingStore};
use chrono::Utc;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Append ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_returns_stored_reading() {
  let s = store().await;

  let before = Utc::now().timestamp();
  let reading = s.append(NewReading::new(5, 40)).await.unwrap();
  let after = Utc::now().timestamp();

  assert_eq!(reading.count, 5);
  assert_eq!(reading.capacity, 40);
  assert!(reading.id > 0);
  assert!(
    (before..=after).contains(&reading.timestamp),
    "timestamp {} outside [{before}, {after}]",
    reading.timestamp
  );
}

#[tokio::test]
async fn ids_strictly_increase() {
  let s = store().await;

  let mut last = 0;
  for n in 0..10 {
    let r = s.append(NewReading::new(n, 40)).await.unwrap();
    assert!(r.id > last, "id {} not greater than {last}", r.id);
    last = r.id;
  }
}

#[tokio::test]
async fn concurrent_appends_get_unique_ordered_rows() {
  let s = store().await;

  let handles: Vec<_> = (0..20)
    .map(|n| {
      let s = s.clone();
      tokio::spawn(async move { s.append(NewReading::new(n, 40)).await })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap().unwrap().id);
  }
  ids.sort_unstable();
  ids.dedup();
  assert_eq!(ids.len(), 20);

  let all = s.recent(None).await.unwrap();
  assert_eq!(all.len(), 20);
  for pair in all.windows(2) {
    assert!(pair[0].timestamp >= pair[1].timestamp);
    assert!(pair[0].id > pair[1].id);
  }
}

// ─── Recent ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_on_empty_store_is_empty() {
  let s = store().await;
  assert!(s.recent(None).await.unwrap().is_empty());
  assert!(s.recent(Some(5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_lists_newest_first() {
  let s = store().await;
  let a = s.append(NewReading::new(1, 40)).await.unwrap();
  let b = s.append(NewReading::new(2, 40)).await.unwrap();

  let recent = s.recent(None).await.unwrap();
  assert_eq!(recent, vec![b, a]);
}

#[tokio::test]
async fn recent_respects_limit() {
  let s = store().await;
  for n in 0..5 {
    s.append(NewReading::new(n, 40)).await.unwrap();
  }

  let two = s.recent(Some(2)).await.unwrap();
  assert_eq!(two.len(), 2);
  assert_eq!(two[0].count, 4);
  assert_eq!(two[1].count, 3);

  assert_eq!(s.recent(Some(50)).await.unwrap().len(), 5);
  assert!(s.recent(Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_defaults_to_one_hundred() {
  let s = store().await;
  for n in 0..105 {
    s.append(NewReading::new(n, 200)).await.unwrap();
  }

  let recent = s.recent(None).await.unwrap();
  assert_eq!(recent.len(), 100);
  assert_eq!(recent[0].count, 104);
  assert_eq!(recent[99].count, 5);
}

// ─── Durability ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_keeps_prior_rows() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bus_attendance.db");

  let first = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.append(NewReading::new(3, 40)).await.unwrap()
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let second = s.append(NewReading::new(4, 40)).await.unwrap();
  assert!(second.id > first.id);

  let recent = s.recent(None).await.unwrap();
  assert_eq!(recent, vec![second, first]);
}

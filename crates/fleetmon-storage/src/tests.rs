use crate::memory::MemoryStateStore;
use crate::sqlite::SqliteStateStore;
use crate::StateStore;
use fleetmon_common::types::{AlertState, BreachEntry, MetricKind};

fn sample_state(node_id: i64) -> AlertState {
    AlertState {
        node_id,
        entries: vec![BreachEntry {
            metric: MetricKind::Cpu,
            breach_started_at: 1_700_000_000,
            confirmed: true,
        }],
    }
}

#[tokio::test]
async fn memory_round_trip_and_delete() {
    let store = MemoryStateStore::new();
    let state = sample_state(1);

    store.put(&state, 3600).await.unwrap();
    assert_eq!(store.get(1).await.unwrap(), Some(state));

    store.delete(1).await.unwrap();
    assert_eq!(store.get(1).await.unwrap(), None);

    // Deleting an absent record is fine
    store.delete(1).await.unwrap();
}

#[tokio::test]
async fn memory_expired_record_is_absent() {
    let store = MemoryStateStore::new();
    store.put(&sample_state(2), 0).await.unwrap();
    assert_eq!(store.get(2).await.unwrap(), None);
}

#[tokio::test]
async fn memory_corrupt_record_is_absent() {
    let store = MemoryStateStore::new();
    store.put_raw(3, "{not json", 3600).await;
    assert_eq!(store.get(3).await.unwrap(), None);
    // The corrupt value is dropped, not returned again
    assert_eq!(store.get(3).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_round_trip_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStateStore::new(&dir.path().join("state.db")).unwrap();
    let state = sample_state(7);

    store.put(&state, 3600).await.unwrap();
    assert_eq!(store.get(7).await.unwrap(), Some(state.clone()));

    // Replacing overwrites in place
    let mut updated = state;
    updated.entries[0].confirmed = false;
    store.put(&updated, 3600).await.unwrap();
    assert_eq!(store.get(7).await.unwrap(), Some(updated));

    store.delete(7).await.unwrap();
    assert_eq!(store.get(7).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_expired_record_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStateStore::new(&dir.path().join("state.db")).unwrap();
    store.put(&sample_state(8), 0).await.unwrap();
    assert_eq!(store.get(8).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_corrupt_record_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");
    let store = SqliteStateStore::new(&path).unwrap();

    // Inject a bad row through a second connection
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO node_state (node_id, state, expires_at) VALUES (9, 'garbage', ?1)",
        rusqlite::params![chrono::Utc::now().timestamp() + 3600],
    )
    .unwrap();

    assert_eq!(store.get(9).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_purge_expired_counts_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStateStore::new(&dir.path().join("state.db")).unwrap();
    store.put(&sample_state(10), 0).await.unwrap();
    store.put(&sample_state(11), 3600).await.unwrap();

    let removed = store.purge_expired().unwrap();
    assert_eq!(removed, 1);
    assert!(store.get(11).await.unwrap().is_some());
}

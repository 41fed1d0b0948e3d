use std::sync::Arc;
use std::time::Duration;

use nobocon_core::time::{fixed_clock, fixed_now};
use nobocon_core::{Action, Snapshot, reduce};
use services::{PersistenceStatus, ProgressService, SaveScheduler};
use storage::{MemoryStore, SnapshotStore};

fn service_with(store: Arc<MemoryStore>) -> ProgressService {
    ProgressService::new(fixed_clock(), store)
}

#[tokio::test]
async fn startup_restores_a_fresh_slot() {
    let store = Arc::new(MemoryStore::new());
    let mut saved = Snapshot::initial();
    saved.counts.insert("3Q".to_string(), 2);
    store.save(&saved, fixed_now()).await.unwrap();

    let service = service_with(Arc::clone(&store));
    let restored = service.startup().await.expect("slot should restore");

    assert_eq!(restored, saved.stamped(fixed_now()));
    assert_eq!(service.status(), PersistenceStatus::Enabled);
}

#[tokio::test]
async fn startup_with_empty_slot_restores_nothing() {
    let service = service_with(Arc::new(MemoryStore::new()));
    assert!(service.startup().await.is_none());
    assert!(service.status().is_enabled());
}

#[tokio::test]
async fn failed_probe_disables_persistence_for_the_session() {
    let store = Arc::new(MemoryStore::failing("disk full"));
    let service = service_with(Arc::clone(&store));

    assert!(service.startup().await.is_none());
    assert_eq!(service.status().reason(), Some("disk full"));

    // Saves and wipes become silent no-ops.
    service.save(&Snapshot::initial()).await.unwrap();
    service.wipe().await.unwrap();
    assert_eq!(store.write_count(), 0);

    // No re-probe: a second startup leaves the status untouched.
    assert!(service.startup().await.is_none());
    assert_eq!(service.status().reason(), Some("disk full"));
}

#[tokio::test]
async fn save_stamps_and_wipe_clears() {
    let store = Arc::new(MemoryStore::new());
    let service = service_with(Arc::clone(&store));
    service.startup().await;

    let snapshot = reduce(&Snapshot::initial(), &Action::Increment("2D".to_string()));
    service.save(&snapshot).await.unwrap();
    assert_eq!(
        store.load(fixed_now()).await,
        Some(snapshot.stamped(fixed_now()))
    );

    service.wipe().await.unwrap();
    assert!(store.load(fixed_now()).await.is_none());
}

#[tokio::test]
async fn debounce_writes_only_the_latest_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(service_with(Arc::clone(&store)));
    service.startup().await;

    let scheduler = SaveScheduler::with_delay(Arc::clone(&service), Duration::from_millis(20));

    let mut snapshot = Snapshot::initial();
    for _ in 0..3 {
        snapshot = reduce(&snapshot, &Action::Increment("8Q".to_string()));
        scheduler.schedule(snapshot.clone());
    }

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(store.write_count(), 1);
    let persisted = store.load(fixed_now()).await.expect("slot written");
    assert_eq!(persisted.count("8Q"), 3);
}

#[tokio::test]
async fn cancel_drops_the_pending_save() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(service_with(Arc::clone(&store)));
    service.startup().await;

    let scheduler = SaveScheduler::with_delay(Arc::clone(&service), Duration::from_millis(20));
    scheduler.schedule(Snapshot::initial());
    scheduler.cancel();

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(store.write_count(), 0);
}

use super::{MemoryStore, RateLimitRecord, Store};
use std::time::{Duration, SystemTime};

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

#[test]
fn insert_if_absent_only_wins_once() {
    let mut store = MemoryStore::new();
    let record = RateLimitRecord::first(at(100));

    assert!(store.insert_if_absent("key", record.clone()).unwrap());
    assert!(!store.insert_if_absent("key", RateLimitRecord::first(at(200))).unwrap());

    // The loser did not overwrite the original
    assert_eq!(store.get("key").unwrap(), Some(record));
}

#[test]
fn compare_and_swap_rejects_stale_snapshots() {
    let mut store = MemoryStore::new();
    let original = RateLimitRecord::first(at(100));
    store.insert_if_absent("key", original.clone()).unwrap();

    // Writer A commits an increment
    let incremented = original.admitted(at(101));
    assert!(store.compare_and_swap("key", &original, incremented.clone()).unwrap());

    // Writer B still holds the pre-increment snapshot and must lose
    let conflicting = original.admitted(at(102));
    assert!(!store.compare_and_swap("key", &original, conflicting).unwrap());
    assert_eq!(store.get("key").unwrap(), Some(incremented));
}

#[test]
fn compare_and_swap_misses_absent_key() {
    let mut store = MemoryStore::new();
    let record = RateLimitRecord::first(at(100));

    assert!(!store.compare_and_swap("ghost", &record, record.admitted(at(101))).unwrap());
}

#[test]
fn get_returns_none_for_unknown_key() {
    let store = MemoryStore::new();
    assert_eq!(store.get("unknown").unwrap(), None);
}

#[test]
fn remove_older_than_is_strict_and_batched() {
    let mut store = MemoryStore::new();
    for i in 0..5u64 {
        store
            .insert_if_absent(&format!("stale-{i}"), RateLimitRecord::first(at(100)))
            .unwrap();
    }
    store.insert_if_absent("fresh", RateLimitRecord::first(at(500))).unwrap();
    store.insert_if_absent("boundary", RateLimitRecord::first(at(300))).unwrap();

    // Cutoff equal to last_request does not qualify (strictly older only)
    let removed = store.remove_older_than(at(300), 2).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.len(), 5);

    let removed = store.remove_older_than(at(300), 100).unwrap();
    assert_eq!(removed, 3);

    assert!(store.get("fresh").unwrap().is_some());
    assert!(store.get("boundary").unwrap().is_some());
    assert_eq!(store.len(), 2);
}

#[test]
fn remove_older_than_on_empty_store() {
    let mut store = MemoryStore::new();
    assert_eq!(store.remove_older_than(at(1_000), 500).unwrap(), 0);
    assert!(store.is_empty());
}

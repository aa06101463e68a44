//! Store behaviour against instrumented and failing mirrors.

use hashkv_core::{Key, Manager, Outcome, RemoteMirror, SyncPolicy};
use hashkv_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn strict_store_reports_unavailable_and_recovers() {
    let mirror = Arc::new(FlakyMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Strict, mirror.clone());

    assert!(store.insert(1, "a").succeeded);

    mirror.set_push_failing(true);
    let failed = store.insert(2, "b");
    assert_eq!(failed.outcome, Outcome::StorageUnavailable);
    assert!(failed.message.starts_with("Storage unavailable for bucket 2: mirror push failed"));

    mirror.set_push_failing(false);
    assert_eq!(store.search(2).outcome, Outcome::NotFound);
    assert!(store.insert(2, "b").succeeded);
}

#[test]
fn strict_range_query_aborts_on_pull_failure() {
    let mirror = Arc::new(FlakyMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Strict, mirror.clone());
    store.insert(3, "c");

    mirror.set_pull_failing(true);
    assert!(store.range_query(0, 10).is_err());
    assert!(store.list_all_entries().is_err());
}

#[test]
fn lenient_store_serves_stale_data() {
    let mirror = Arc::new(FlakyMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Lenient, mirror.clone());
    store.insert(3, "c");

    mirror.set_offline(true);
    assert_eq!(store.search(3).outcome, Outcome::Found);
    assert!(store.insert(7, "d").succeeded);
    assert!(mirror.injected_failures() > 0);
}

#[test]
fn reads_never_push() {
    let mirror = Arc::new(CountingMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Strict, mirror.clone());
    store.insert(1, "a");
    mirror.reset();

    store.search(1);
    store.search(2);
    store.list_all_entries().unwrap();
    assert_eq!(mirror.pushes(), 0);
    assert_eq!(mirror.pulls(), 2 + 4);
}

#[test]
fn refused_mutations_never_push() {
    let mirror = Arc::new(CountingMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Strict, mirror.clone());
    store.insert(1, "a");
    mirror.reset();

    assert!(!store.insert(1, "again").succeeded);
    assert!(!store.delete(9).succeeded);
    assert_eq!(mirror.pushes(), 0);
}

#[test]
fn every_operation_pulls_once_and_mutations_push_once() {
    let mirror = Arc::new(CountingMirror::new());
    let store = TestStore::with_mirror(4, SyncPolicy::Strict, mirror.clone());

    store.insert(1, "a");
    store.delete(1);
    assert_eq!(mirror.pulls(), 2);
    assert_eq!(mirror.pushes(), 2);
}

#[test]
fn same_bucket_calls_never_overlap() {
    let mirror = Arc::new(RecordingMirror::with_delay(Duration::from_millis(1)));
    let manager = Arc::new(
        Manager::open_with_mirror(hashkv_core::Config::default(), mirror.clone()).unwrap(),
    );

    let config = StressConfig {
        ops_per_thread: 10,
        threads: 4,
        value_size: 4,
    };
    let result = stress_same_bucket(Arc::clone(&manager), &config);
    assert_eq!(result.failed_ops, 0);
    assert_eq!(mirror.same_name_overlaps(), 0);
}

#[test]
fn distinct_buckets_run_in_parallel() {
    let mirror = Arc::new(RecordingMirror::with_delay(Duration::from_millis(5)));
    let manager = Arc::new(
        Manager::open_with_mirror(hashkv_core::Config::default(), mirror.clone()).unwrap(),
    );

    let config = StressConfig {
        ops_per_thread: 10,
        threads: 4,
        value_size: 4,
    };
    let result = stress_cross_bucket(Arc::clone(&manager), &config);
    assert_eq!(result.failed_ops, 0);
    assert_eq!(mirror.same_name_overlaps(), 0);
    assert!(mirror.parallel_calls() > 0);
}

#[test]
fn file_store_survives_reopen() {
    with_file_store(|manager, mirror_dir| {
        manager.insert(5, "x");
        assert!(mirror_dir.join("bucket1.txt").exists());

        let other: Arc<dyn RemoteMirror> = shared_directory_mirror(mirror_dir);
        let reader = TestStore::with_mirror(4, SyncPolicy::Strict, other);
        assert_eq!(reader.search(5).outcome, Outcome::Found);
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn routing_is_deterministic(key in key_strategy(), buckets in 1usize..12) {
        let first = key.bucket_index(buckets);
        prop_assert!(first < buckets);
        prop_assert_eq!(first, key.clone().bucket_index(buckets));
    }

    #[test]
    fn manager_matches_model(ops in operation_sequence_strategy(40)) {
        let store = TestStore::memory(4);
        let mut model: BTreeMap<Key, String> = BTreeMap::new();

        for op in ops {
            match op {
                Operation::Insert(key, value) => {
                    let expected = !model.contains_key(&key);
                    if expected {
                        model.insert(key.clone(), value.clone());
                    }
                    prop_assert_eq!(store.insert(key, value).succeeded, expected);
                }
                Operation::Delete(key) => {
                    let expected = model.remove(&key).is_some();
                    prop_assert_eq!(store.delete(key).succeeded, expected);
                }
                Operation::Search(key) => {
                    let expected = model.contains_key(&key);
                    prop_assert_eq!(store.search(key).succeeded, expected);
                }
            }
        }

        let expected: Vec<String> = model.iter().map(|(k, v)| format!("{k} : {v}")).collect();
        prop_assert_eq!(store.range_query(-16, 16).unwrap(), expected);
    }

    #[test]
    fn any_record_round_trips(record in record_strategy()) {
        let store = TestStore::memory(3);
        let (key, value) = record.into_parts();
        prop_assert!(store.insert(key.clone(), value.clone()).succeeded);
        let found = store.search(key);
        prop_assert!(found.succeeded);
        let expected_prefix = format!("Data: {value} with key: ");
        prop_assert!(found.message.starts_with(&expected_prefix));
    }
}

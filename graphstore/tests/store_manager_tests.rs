//! Integration tests for the distributed store manager
//!
//! Covers deployment classification, local key partitions for LOCAL and
//! ring deployments, construction failures against unreachable backends and
//! the closed-manager contract.

mod testutils;

use graphstore::storage::{
    CallContext, CancellationToken, Deployment, DistributedStoreManager, Entry, HostDescriptor,
    KeyRange, KeySliceQuery, ManagerState, RangeConvention, SliceQuery, StaticRingTopology,
    StorageError, StoreManagerConfig,
};
use std::sync::Arc;
use std::time::Duration;
use testutils::{hosts, ManagerFixture};

fn ring_manager(
    members: &[&str],
    local: &str,
    replication_factor: u32,
) -> (DistributedStoreManager, Arc<StaticRingTopology>) {
    testutils::init_logging();
    let ring = Arc::new(
        StaticRingTopology::new(hosts(members), local, replication_factor)
            .expect("valid ring"),
    );
    let config = StoreManagerConfig::cluster(hosts(members), local, replication_factor);
    let manager = DistributedStoreManager::open_with_topology(config, ring.clone())
        .expect("ring manager opens");
    (manager, ring)
}

#[test]
fn test_local_manager_reports_single_full_partition() {
    let fixture = ManagerFixture::sled().expect("Failed to create fixture");
    let manager = &fixture.manager;

    assert_eq!(manager.deployment().unwrap(), Deployment::Local);
    let store = manager.open_store("edgestore").unwrap();
    let ranges = store.get_local_key_partition().unwrap();

    assert_eq!(ranges.len(), 1);
    let range = &ranges[0];
    assert_eq!(range.convention(), RangeConvention::Ordered);
    assert!(range.is_full());
    assert!(range.contains(b""));
    assert!(range.contains(&[0xff; 16]));
}

#[test]
fn test_deployment_is_stable() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let first = fixture.manager.deployment().unwrap();
    for _ in 0..10 {
        assert_eq!(fixture.manager.deployment().unwrap(), first);
    }
}

#[test]
fn test_loopback_aliases_are_local() {
    testutils::init_logging();
    for host in ["localhost", "127.0.0.1", "::1"] {
        let config = StoreManagerConfig {
            hostnames: hosts(&[host]),
            ..StoreManagerConfig::in_memory()
        };
        let manager = DistributedStoreManager::open(config).unwrap();
        assert_eq!(manager.deployment().unwrap(), Deployment::Local, "{}", host);
        assert_eq!(manager.local_hosts().unwrap(), vec![HostDescriptor::new(host)]);
        assert_eq!(manager.cluster_members().unwrap(), vec![HostDescriptor::new(host)]);
    }
}

#[test]
fn test_single_remote_host_is_remote() {
    let (manager, _ring) = ring_manager(&["db-1.internal"], "db-1.internal", 1);
    assert_eq!(manager.deployment().unwrap(), Deployment::Remote);

    let store = manager.open_store("edgestore").unwrap();
    let ranges = store.get_local_key_partition().unwrap();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].convention(), RangeConvention::Ring);
    assert!(ranges[0].is_full());
}

#[test]
fn test_ring_partition_follows_replication_factor() {
    let members = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"];

    let (manager, _ring) = ring_manager(&members, "10.0.0.2", 1);
    let ranges = manager
        .open_store("graphindex")
        .unwrap()
        .get_local_key_partition()
        .unwrap();
    assert_eq!(
        ranges,
        vec![KeyRange::ring(
            vec![0x40, 0, 0, 0, 0, 0, 0, 0],
            vec![0x80, 0, 0, 0, 0, 0, 0, 0]
        )]
    );

    let (manager, _ring) = ring_manager(&members, "10.0.0.1", 2);
    let ranges = manager
        .open_store("graphindex")
        .unwrap()
        .get_local_key_partition()
        .unwrap();
    assert_eq!(ranges.len(), 2);
    // The replica range is the last one on the ring and wraps to token zero
    assert!(ranges.iter().any(|r| r.wraps()));
    assert!(ranges.iter().all(|r| !r.start().is_empty()));
}

#[test]
fn test_unreachable_topology_fails_construction() {
    testutils::init_logging();
    let ring = Arc::new(StaticRingTopology::new(hosts(&["a", "b", "c"]), "b", 2).unwrap());
    ring.set_reachable(false);

    let config = StoreManagerConfig::cluster(hosts(&["a", "b", "c"]), "b", 2);
    let err = DistributedStoreManager::open_with_topology(config, ring)
        .err()
        .expect("construction must fail");
    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_unreachable_sled_path_fails_construction() {
    testutils::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not_a_directory");
    std::fs::write(&file, b"occupied").unwrap();

    let result = DistributedStoreManager::open(StoreManagerConfig::local(&file));
    assert!(result.is_err());
}

#[test]
fn test_invalid_configuration_fails_construction() {
    testutils::init_logging();
    let config = StoreManagerConfig::cluster(hosts(&["a", "b"]), "c", 1);
    assert!(matches!(
        DistributedStoreManager::open(config),
        Err(StorageError::Configuration(_))
    ));

    let config = StoreManagerConfig {
        replication_factor: 3,
        ..StoreManagerConfig::cluster(hosts(&["a", "b"]), "a", 1)
    };
    assert!(matches!(
        DistributedStoreManager::open(config),
        Err(StorageError::Configuration(_))
    ));

    for names in [&["localhost", "localhost"][..], &["a", "b", "a"][..]] {
        let config = StoreManagerConfig::cluster(hosts(names), names[0], 1);
        assert!(matches!(
            DistributedStoreManager::open(config),
            Err(StorageError::Configuration(_))
        ));
    }
}

#[test]
fn test_partition_query_when_topology_goes_away() {
    let (manager, ring) = ring_manager(&["a", "b"], "a", 1);
    let store = manager.open_store("edgestore").unwrap();
    assert!(store.get_local_key_partition().is_ok());

    ring.set_reachable(false);
    let err = store.get_local_key_partition().unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));

    // The deployment was cached at construction and does not change
    assert_eq!(manager.deployment().unwrap(), Deployment::Remote);

    ring.set_reachable(true);
    assert!(store.get_local_key_partition().is_ok());
}

#[test]
fn test_cancelled_partition_query() {
    let (manager, _ring) = ring_manager(&["a", "b"], "b", 1);
    let store = manager.open_store("edgestore").unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let ctx = CallContext::background().with_token(token);
    assert!(matches!(
        store.get_local_key_partition_with(&ctx),
        Err(StorageError::Cancelled(_))
    ));

    let expired = CallContext::with_timeout(Duration::ZERO);
    std::thread::sleep(Duration::from_millis(2));
    assert!(matches!(
        store.get_local_key_partition_with(&expired),
        Err(StorageError::Cancelled(_))
    ));
}

#[test]
fn test_closed_manager_store_is_illegal_state() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let store = fixture.manager.open_store("system_properties").unwrap();
    store
        .mutate(b"k", &[Entry::new(&b"c"[..], &b"v"[..])], &[])
        .unwrap();

    fixture.manager.close().unwrap();
    assert_eq!(fixture.manager.state(), ManagerState::Closed);

    let is_closed = |e: &StorageError| {
        matches!(
            e,
            StorageError::IllegalState {
                state: ManagerState::Closed
            }
        )
    };
    assert!(is_closed(&store.get_local_key_partition().unwrap_err()));
    assert!(is_closed(
        &store
            .get_slice(&KeySliceQuery::new(&b"k"[..], SliceQuery::all()))
            .unwrap_err()
    ));
    assert!(is_closed(&store.mutate(b"k", &[], &[]).unwrap_err()));
    assert!(is_closed(&fixture.manager.deployment().unwrap_err()));
}

#[test]
fn test_close_releases_handles_still_held() {
    testutils::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db");

    let manager = DistributedStoreManager::open(StoreManagerConfig::local(&path)).unwrap();
    let store = manager.open_store("edgestore").unwrap();
    store
        .mutate(b"vertex-7", &[Entry::new(&b"name"[..], &b"bob"[..])], &[])
        .unwrap();
    manager.close().unwrap();

    // `store` and `manager` are both still alive here
    let reopened = DistributedStoreManager::open(StoreManagerConfig::local(&path))
        .expect("closed manager must not keep the database locked");
    let entries = reopened
        .open_store("edgestore")
        .unwrap()
        .get_slice(&KeySliceQuery::new(&b"vertex-7"[..], SliceQuery::all()))
        .unwrap();
    assert_eq!(entries, vec![Entry::new(&b"name"[..], &b"bob"[..])]);

    assert!(matches!(
        store.get_keys(&KeyRange::whole_keyspace(), &SliceQuery::all()),
        Err(StorageError::IllegalState {
            state: ManagerState::Closed
        })
    ));
    drop(manager);
}

#[test]
fn test_store_slices_and_key_scans() {
    let fixture = ManagerFixture::sled().expect("Failed to create fixture");
    let store = fixture.manager.open_store("edgestore").unwrap();

    for key in [&b"a"[..], &b"b"[..], &b"c"[..], &b"d"[..]] {
        let entries = [
            Entry::new(&b"c1"[..], key.to_vec()),
            Entry::new(&b"c2"[..], key.to_vec()),
            Entry::new(&b"c3"[..], key.to_vec()),
        ];
        store.mutate(key, &entries, &[]).unwrap();
    }

    let slice = store
        .get_slice(&KeySliceQuery::new(&b"b"[..], SliceQuery::between(&b"c2"[..], &b""[..])))
        .unwrap();
    let columns: Vec<_> = slice.iter().map(|e| e.column.clone()).collect();
    assert_eq!(columns, vec![b"c2".to_vec(), b"c3".to_vec()]);

    store.mutate(b"b", &[], &[b"c2".to_vec()]).unwrap();
    let slice = store
        .get_slice(&KeySliceQuery::new(&b"b"[..], SliceQuery::all().with_limit(5)))
        .unwrap();
    assert_eq!(slice.len(), 2);

    let keys = store
        .get_keys(&KeyRange::ordered(&b"b"[..], &b"d"[..]), &SliceQuery::all())
        .unwrap();
    let names: Vec<_> = keys.iter().map(|k| k.key.clone()).collect();
    assert_eq!(names, vec![b"b".to_vec(), b"c".to_vec()]);

    let wrapped = store
        .get_keys(
            &KeyRange::ring(&b"c"[..], &b"b"[..]),
            &SliceQuery::all().with_limit(1),
        )
        .unwrap();
    let names: Vec<_> = wrapped.iter().map(|k| k.key.clone()).collect();
    assert_eq!(names, vec![b"c".to_vec(), b"d".to_vec(), b"a".to_vec()]);
    assert!(wrapped.iter().all(|k| k.entries.len() == 1));

    assert!(store
        .get_keys(&KeyRange::ordered(&b"c"[..], &b"c"[..]), &SliceQuery::all())
        .unwrap()
        .is_empty());
}

#[test]
fn test_data_survives_reopen() {
    testutils::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db");

    {
        let manager = DistributedStoreManager::open(StoreManagerConfig::local(&path)).unwrap();
        let store = manager.open_store("edgestore").unwrap();
        store
            .mutate(b"vertex-1", &[Entry::new(&b"name"[..], &b"alice"[..])], &[])
            .unwrap();
        manager.close().unwrap();
    }

    let manager = DistributedStoreManager::open(StoreManagerConfig::local(&path)).unwrap();
    let store = manager.open_store("edgestore").unwrap();
    let entries = store
        .get_slice(&KeySliceQuery::new(&b"vertex-1"[..], SliceQuery::all()))
        .unwrap();
    assert_eq!(entries, vec![Entry::new(&b"name"[..], &b"alice"[..])]);
}

#[test]
fn test_config_from_json() {
    let config = StoreManagerConfig::from_json_str(
        r#"{ "storage_type": "memory", "hostnames": ["127.0.0.1"], "operation_timeout_ms": 500 }"#,
    )
    .unwrap();
    assert_eq!(config.operation_timeout(), Duration::from_millis(500));

    let manager = DistributedStoreManager::open(config).unwrap();
    assert_eq!(manager.deployment().unwrap(), Deployment::Local);
}

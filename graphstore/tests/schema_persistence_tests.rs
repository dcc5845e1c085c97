//! Integration tests for committing and reloading definition maps

mod testutils;

use graphstore::schema::{
    Cardinality, DataType, Direction, ElementCategory, Multiplicity, Order, OwnerKind, SchemaError,
    SchemaStore, SchemaStatus, TypeDefinitionCategory, TypeDefinitionMap,
};
use graphstore::storage::{
    DistributedStoreManager, Entry, KeySliceQuery, SliceQuery, StorageError, StoreManagerConfig,
};
use testutils::ManagerFixture;

use TypeDefinitionCategory as C;

fn schema_store(fixture: &ManagerFixture) -> SchemaStore {
    SchemaStore::new(fixture.manager.open_store("system_properties").unwrap())
}

#[test]
fn test_commit_and_reload_round_trip() {
    let fixture = ManagerFixture::sled().expect("Failed to create fixture");
    let schema = schema_store(&fixture);

    let mut edge_label = TypeDefinitionMap::new(OwnerKind::EdgeLabel);
    edge_label
        .set(C::Multiplicity, Multiplicity::ManyToOne)
        .unwrap()
        .set(C::Unidirectional, Direction::Out)
        .unwrap()
        .set(C::SortKey, vec![11i64, 12])
        .unwrap()
        .set(C::SortOrder, Order::Desc)
        .unwrap();

    schema.commit(1001, &mut edge_label).unwrap();
    assert!(edge_label.is_frozen());

    let loaded = schema.load(1001, OwnerKind::EdgeLabel).unwrap();
    assert!(loaded.is_frozen());
    assert_eq!(loaded.owner(), OwnerKind::EdgeLabel);
    assert_eq!(loaded.len(), edge_label.len());
    for (category, value) in edge_label.iter() {
        assert_eq!(&loaded.get(category).unwrap(), value, "{}", category);
    }
}

#[test]
fn test_reload_keeps_defaults_unset() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);

    let mut index = TypeDefinitionMap::new(OwnerKind::Index);
    index
        .set(C::ElementCategory, ElementCategory::Edge)
        .unwrap()
        .set(C::IndexCardinality, Cardinality::List)
        .unwrap();
    schema.commit(7, &mut index).unwrap();

    let loaded = schema.load(7, OwnerKind::Index).unwrap();
    assert!(!loaded.contains(C::Status));
    assert_eq!(
        loaded.get_as::<SchemaStatus>(C::Status).unwrap(),
        SchemaStatus::Enabled
    );
}

#[test]
fn test_recommit_replaces_previous_definition() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);

    let mut first = TypeDefinitionMap::new(OwnerKind::PropertyKey);
    first
        .set(C::DataType, DataType::String)
        .unwrap()
        .set(C::Ttl, 30i32)
        .unwrap();
    schema.commit(5, &mut first).unwrap();

    let mut second = TypeDefinitionMap::new(OwnerKind::PropertyKey);
    second.set(C::DataType, DataType::Long).unwrap();
    schema.commit(5, &mut second).unwrap();

    let loaded = schema.load(5, OwnerKind::PropertyKey).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get_as::<DataType>(C::DataType).unwrap(), DataType::Long);
    assert!(!loaded.contains(C::Ttl));
}

#[test]
fn test_frozen_map_cannot_be_committed_twice() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);

    let mut map = TypeDefinitionMap::new(OwnerKind::ConsistencyModifier);
    map.set(
        C::ConsistencyLevel,
        graphstore::schema::ConsistencyModifier::Fork,
    )
    .unwrap();
    schema.commit(9, &mut map).unwrap();
    assert!(matches!(
        schema.commit(9, &mut map),
        Err(SchemaError::Frozen(OwnerKind::ConsistencyModifier))
    ));
}

#[test]
fn test_failed_commit_leaves_map_writable() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);
    fixture.manager.close().unwrap();

    let mut map = TypeDefinitionMap::new(OwnerKind::PropertyKey);
    map.set(C::Hidden, true).unwrap();
    assert!(matches!(
        schema.commit(3, &mut map),
        Err(SchemaError::Storage(StorageError::IllegalState { .. }))
    ));
    assert!(!map.is_frozen());
    map.set(C::Hidden, false).unwrap();
}

#[test]
fn test_load_missing_element() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);
    assert!(matches!(
        schema.load(404, OwnerKind::EdgeLabel),
        Err(SchemaError::ElementNotFound(404))
    ));
}

#[test]
fn test_load_with_wrong_owner_is_rejected() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let schema = schema_store(&fixture);

    let mut map = TypeDefinitionMap::new(OwnerKind::EdgeLabel);
    map.set(C::Unidirectional, Direction::Both).unwrap();
    schema.commit(12, &mut map).unwrap();

    assert!(matches!(
        schema.load(12, OwnerKind::PropertyKey),
        Err(SchemaError::Validation { .. })
    ));
}

#[test]
fn test_corrupt_columns_are_serialization_errors() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let store = fixture.manager.open_store("system_properties").unwrap();
    let schema = SchemaStore::new(store.clone());

    let key = 77u64.to_be_bytes();
    store
        .mutate(&key, &[Entry::new(vec![200u8], vec![0u8])], &[])
        .unwrap();
    assert!(matches!(
        schema.load(77, OwnerKind::PropertyKey),
        Err(SchemaError::Serialization(_))
    ));

    store
        .mutate(
            &key,
            &[Entry::new(vec![C::Ttl.id()], vec![0xff; 3])],
            &[vec![200u8]],
        )
        .unwrap();
    assert!(matches!(
        schema.load(77, OwnerKind::PropertyKey),
        Err(SchemaError::Serialization(_))
    ));
}

#[test]
fn test_drop_element() {
    let fixture = ManagerFixture::in_memory().expect("Failed to create fixture");
    let store = fixture.manager.open_store("system_properties").unwrap();
    let schema = SchemaStore::new(store.clone());

    let mut map = TypeDefinitionMap::new(OwnerKind::PropertyKey);
    map.set(C::Hidden, false)
        .unwrap()
        .set(C::DataType, DataType::Boolean)
        .unwrap();
    schema.commit(2, &mut map).unwrap();

    assert_eq!(schema.drop_element(2).unwrap(), 2);
    assert!(store
        .get_slice(&KeySliceQuery::new(2u64.to_be_bytes().to_vec(), SliceQuery::all()))
        .unwrap()
        .is_empty());
    assert_eq!(schema.drop_element(2).unwrap(), 0);
}

#[test]
fn test_definitions_survive_manager_restart() {
    testutils::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema_db");

    let mut map = TypeDefinitionMap::new(OwnerKind::PropertyKey);
    map.set(C::DataType, DataType::Date).unwrap();
    {
        let manager = DistributedStoreManager::open(StoreManagerConfig::local(&path)).unwrap();
        let schema = SchemaStore::new(manager.open_store("system_properties").unwrap());
        schema.commit(100, &mut map).unwrap();
    }

    let manager = DistributedStoreManager::open(StoreManagerConfig::local(&path)).unwrap();
    let schema = SchemaStore::new(manager.open_store("system_properties").unwrap());
    let loaded = schema.load(100, OwnerKind::PropertyKey).unwrap();
    assert_eq!(loaded.get_as::<DataType>(C::DataType).unwrap(), DataType::Date);
}

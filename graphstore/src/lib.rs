// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphStore - schema definitions and distributed key-column-value storage
//!
//! GraphStore is the storage foundation of a graph database: typed schema
//! metadata for property keys, edge labels and indexes, persisted through
//! key-column-value stores issued by a store manager that knows whether it
//! runs against a single local node or a replicated cluster.
//!
//! # Features
//!
//! - **Schema categories**: A closed registry of definition categories with
//!   typed values and per-element legality rules
//! - **Definition maps**: Validated, freezable category maps per schema element
//! - **Key-column-value stores**: Ordered column slices and key range scans
//! - **Partition awareness**: Local key ranges for single-node and ring
//!   deployments
//! - **Embedded storage**: Sled or in-memory drivers
//!
//! # Usage
//!
//! ```no_run
//! use graphstore::schema::{Multiplicity, OwnerKind, SchemaStore, TypeDefinitionCategory, TypeDefinitionMap};
//! use graphstore::storage::{DistributedStoreManager, StoreManagerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = DistributedStoreManager::open(StoreManagerConfig::local("./mydb"))?;
//! let schema = SchemaStore::new(manager.open_store("system_properties")?);
//!
//! let mut map = TypeDefinitionMap::new(OwnerKind::EdgeLabel);
//! map.set(TypeDefinitionCategory::Multiplicity, Multiplicity::Simple)?;
//! schema.commit(42, &mut map)?;
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod storage;

pub use schema::{
    DefinitionValue, OwnerKind, SchemaError, SchemaStore, TypeDefinitionCategory,
    TypeDefinitionMap,
};
pub use storage::{
    Deployment, DistributedStoreManager, KeyColumnValueStore, KeyRange, StorageError,
    StoreManagerConfig,
};

/// GraphStore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphStore crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

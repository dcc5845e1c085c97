// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Distributed key-column-value storage
//!
//! This module provides:
//! - Physical drivers (memory, sled) behind the `StorageDriver` trait
//! - Key-column-value stores built on driver trees
//! - Key ranges describing partition ownership
//! - Cluster topology drivers
//! - The distributed store manager that ties them together

pub mod config;
pub mod context;
pub mod error;
pub mod kcv;
pub mod key_range;
pub mod manager;
pub mod persistent;
pub mod topology;
pub mod tree_store;

pub use config::StoreManagerConfig;
pub use context::{CallContext, CancellationToken};
pub use error::{StorageError, StorageResult};
pub use kcv::{Entry, KeyColumnValueStore, KeyEntries, KeySliceQuery, SliceQuery};
pub use key_range::{KeyRange, RangeConvention};
pub use manager::{Deployment, DistributedStoreManager, ManagerState};
pub use persistent::StorageType;
pub use topology::{
    ClusterTopology, ClusterView, HostDescriptor, SingleNodeTopology, StaticRingTopology,
};
pub use tree_store::TreeStore;

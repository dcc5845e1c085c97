// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Distributed Store Manager - single source of truth for a backend's topology
//!
//! The manager owns the physical driver and the topology driver, issues
//! key-column-value stores and reports whether the backend runs as a single
//! local node or as a partitioned cluster.
//!
//! Lifecycle:
//! - UNINITIALIZED: driver created, topology being resolved
//! - READY: deployment classified and cached; stores can be opened
//! - CLOSED: driver shut down, every issued store refuses further calls
//!
//! The deployment is resolved once at construction and never re-derived.
//! Topology changes after that point are invisible to this manager; callers
//! that need them must build a new one.

use super::config::StoreManagerConfig;
use super::context::CallContext;
use super::error::{StorageError, StorageResult};
use super::kcv::KeyColumnValueStore;
use super::persistent::{create_storage_driver, SharedDriver, StorageType};
use super::topology::{topology_for, ClusterTopology, ClusterView, HostDescriptor};
use super::tree_store::TreeStore;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Deployment shape of a storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deployment {
    /// Single process/node; one implicit range covers the whole key-space
    Local,
    /// Multi-node cluster; key-space partitioned across nodes
    Remote,
}

impl Deployment {
    /// LOCAL iff the cluster is exactly one loopback member
    pub fn classify(view: &ClusterView) -> Self {
        match view.members.as_slice() {
            [only] if only.is_loopback() => Deployment::Local,
            _ => Deployment::Remote,
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Local => write!(f, "LOCAL"),
            Deployment::Remote => write!(f, "REMOTE"),
        }
    }
}

/// Manager lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerState {
    Uninitialized,
    Ready,
    Closed,
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManagerState::Uninitialized => "UNINITIALIZED",
            ManagerState::Ready => "READY",
            ManagerState::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}

/// State shared between a manager and every store it issues
pub(crate) struct ManagerShared {
    state: RwLock<ManagerState>,
    deployment: Deployment,
    view: ClusterView,
    topology: Arc<dyn ClusterTopology>,
    operation_timeout: Duration,
}

impl ManagerShared {
    pub(crate) fn state(&self) -> ManagerState {
        *self.state.read()
    }

    pub(crate) fn ensure_ready(&self) -> StorageResult<()> {
        match self.state() {
            ManagerState::Ready => Ok(()),
            state => Err(StorageError::IllegalState { state }),
        }
    }

    pub(crate) fn deployment(&self) -> Deployment {
        self.deployment
    }

    pub(crate) fn local_host(&self) -> &HostDescriptor {
        &self.view.local
    }

    pub(crate) fn topology(&self) -> &dyn ClusterTopology {
        self.topology.as_ref()
    }

    pub(crate) fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}

/// Coordinator for one backend: reports topology and issues stores
pub struct DistributedStoreManager {
    config: StoreManagerConfig,
    shared: Arc<ManagerShared>,
    /// Taken on close so the driver can be shut down through `&mut`
    driver: Mutex<Option<SharedDriver>>,
    stores: Mutex<HashMap<String, Arc<TreeStore>>>,
}

impl DistributedStoreManager {
    /// Open a manager using the topology driver implied by the configuration
    pub fn open(config: StoreManagerConfig) -> StorageResult<Self> {
        config.validate()?;
        let topology = topology_for(&config)?;
        Self::open_with_topology(config, topology)
    }

    /// Open a manager against an explicit topology driver
    ///
    /// Fails the whole construction with `Configuration`, `Unavailable` or
    /// `Cancelled` if the backend cannot be reached or its topology cannot
    /// be resolved; no half-initialized manager is ever returned.
    pub fn open_with_topology(
        config: StoreManagerConfig,
        topology: Arc<dyn ClusterTopology>,
    ) -> StorageResult<Self> {
        info!(
            "Opening store manager with {} driver at {:?} for {} host(s)",
            config.storage_type,
            config.path,
            config.hostnames.len()
        );
        config.validate()?;

        let mut driver = create_storage_driver(config.storage_type, &config.path)?;
        if let Err(e) = driver.health_check() {
            warn!("Storage driver failed its health check: {}", e);
            let _ = driver.shutdown();
            return Err(e);
        }

        let ctx = CallContext::with_timeout(config.operation_timeout());
        let view = match Self::resolve_topology(topology.as_ref(), &ctx) {
            Ok(view) => view,
            Err(e) => {
                warn!("Cluster topology could not be resolved: {}", e);
                let _ = driver.shutdown();
                return Err(e);
            }
        };

        let deployment = Deployment::classify(&view);
        info!(
            "Resolved {} deployment: {} member(s), local host '{}', replication factor {}",
            deployment,
            view.members.len(),
            view.local.hostname,
            view.replication_factor
        );

        let shared = Arc::new(ManagerShared {
            state: RwLock::new(ManagerState::Uninitialized),
            deployment,
            view,
            topology,
            operation_timeout: config.operation_timeout(),
        });

        let manager = Self {
            config,
            shared,
            driver: Mutex::new(Some(driver)),
            stores: Mutex::new(HashMap::new()),
        };

        *manager.shared.state.write() = ManagerState::Ready;

        for name in manager.config.pre_created_stores.clone() {
            if let Err(e) = manager.open_store(&name) {
                warn!("Failed to pre-create store '{}': {}", name, e);
                let _ = manager.close();
                return Err(e);
            }
        }

        info!(
            "Store manager ready with {} pre-created store(s)",
            manager.config.pre_created_stores.len()
        );
        Ok(manager)
    }

    fn resolve_topology(
        topology: &dyn ClusterTopology,
        ctx: &CallContext,
    ) -> StorageResult<ClusterView> {
        let view = topology.resolve(ctx)?;
        ctx.check("topology resolution")?;

        if view.members.is_empty() {
            return Err(StorageError::config("topology reported no cluster members"));
        }
        if !view.members.contains(&view.local) {
            return Err(StorageError::config(format!(
                "local host '{}' is not among the reported cluster members",
                view.local.hostname
            )));
        }
        if view.replication_factor == 0 || view.replication_factor as usize > view.members.len() {
            return Err(StorageError::config(format!(
                "topology reported replication factor {} for {} member(s)",
                view.replication_factor,
                view.members.len()
            )));
        }
        Ok(view)
    }

    /// Deployment classification cached at construction
    pub fn deployment(&self) -> StorageResult<Deployment> {
        self.shared.ensure_ready()?;
        Ok(self.shared.deployment())
    }

    /// Open (or return the already open) store with the given name
    ///
    /// Repeated calls with the same name return the same handle.
    pub fn open_store(&self, name: &str) -> StorageResult<Arc<dyn KeyColumnValueStore>> {
        self.shared.ensure_ready()?;
        if name.trim().is_empty() {
            return Err(StorageError::config("store name must not be empty"));
        }

        let mut stores = self.stores.lock();
        if let Some(store) = stores.get(name) {
            return Ok(store.clone() as Arc<dyn KeyColumnValueStore>);
        }

        let driver = self.driver.lock();
        let driver = driver.as_ref().ok_or(StorageError::IllegalState {
            state: ManagerState::Closed,
        })?;
        let tree = driver.open_tree(name)?;
        let store = Arc::new(TreeStore::new(name, tree, self.shared.clone()));
        stores.insert(name.to_string(), store.clone());
        debug!("Opened store '{}'", name);
        Ok(store as Arc<dyn KeyColumnValueStore>)
    }

    /// Names of the stores opened through this manager
    pub fn store_names(&self) -> StorageResult<Vec<String>> {
        self.shared.ensure_ready()?;
        let mut names: Vec<String> = self.stores.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Replication factor reported by the cluster topology
    pub fn replication_factor(&self) -> StorageResult<u32> {
        self.shared.ensure_ready()?;
        Ok(self.shared.view.replication_factor)
    }

    /// Descriptors of the hosts this process runs as
    pub fn local_hosts(&self) -> StorageResult<Vec<HostDescriptor>> {
        self.shared.ensure_ready()?;
        Ok(vec![self.shared.local_host().clone()])
    }

    /// Every member of the cluster as resolved at construction
    pub fn cluster_members(&self) -> StorageResult<Vec<HostDescriptor>> {
        self.shared.ensure_ready()?;
        Ok(self.shared.view.members.clone())
    }

    pub fn state(&self) -> ManagerState {
        self.shared.state()
    }

    pub fn storage_type(&self) -> StorageType {
        self.config.storage_type
    }

    pub fn config(&self) -> &StoreManagerConfig {
        &self.config
    }

    /// Move to CLOSED and release the driver
    ///
    /// Every store handle issued so far drops its tree, including handles
    /// callers still hold. Closing is one-way; closing an already closed
    /// manager is a no-op.
    pub fn close(&self) -> StorageResult<()> {
        {
            let mut state = self.shared.state.write();
            if *state == ManagerState::Closed {
                return Ok(());
            }
            *state = ManagerState::Closed;
        }

        // Issued handles drop their trees before the driver goes away
        let released = {
            let mut stores = self.stores.lock();
            for store in stores.values() {
                store.release();
            }
            let count = stores.len();
            stores.clear();
            count
        };

        let result = match self.driver.lock().take() {
            Some(mut driver) => driver.flush().and_then(|_| driver.shutdown()),
            None => Ok(()),
        };

        match &result {
            Ok(()) => info!("Store manager closed, released {} store(s)", released),
            Err(e) => warn!("Store manager closed with a driver error: {}", e),
        }
        result
    }
}

impl Drop for DistributedStoreManager {
    fn drop(&mut self) {
        if self.shared.state() != ManagerState::Closed {
            if let Err(e) = self.close() {
                warn!("Error while closing store manager on drop: {}", e);
            }
        }
    }
}

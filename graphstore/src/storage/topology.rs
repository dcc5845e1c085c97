// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cluster topology drivers
//!
//! The topology driver supplies node membership and token-range assignment.
//! The manager resolves it once to classify its deployment; stores ask it for
//! the ranges their node owns.

use super::config::{first_duplicate, StoreManagerConfig, LOOPBACK_HOSTS};
use super::context::CallContext;
use super::error::{StorageError, StorageResult};
use super::key_range::KeyRange;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cluster member as seen by the topology driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostDescriptor {
    pub hostname: String,
}

impl HostDescriptor {
    pub fn new<S: Into<String>>(hostname: S) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    pub fn is_loopback(&self) -> bool {
        LOOPBACK_HOSTS.contains(&self.hostname.as_str())
    }
}

/// Snapshot of cluster membership taken when a manager starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterView {
    pub members: Vec<HostDescriptor>,
    pub local: HostDescriptor,
    pub replication_factor: u32,
}

/// Source of node membership and token-range assignment
pub trait ClusterTopology: Send + Sync {
    /// Resolve current membership; fails with `Unavailable` when unreachable
    fn resolve(&self, ctx: &CallContext) -> StorageResult<ClusterView>;

    /// Ranges stored on `host`, including replicas it holds for other nodes
    fn token_ranges(
        &self,
        host: &HostDescriptor,
        ctx: &CallContext,
    ) -> StorageResult<Vec<KeyRange>>;
}

/// Topology of a single process owning the whole key-space
#[derive(Debug, Clone)]
pub struct SingleNodeTopology {
    host: HostDescriptor,
}

impl SingleNodeTopology {
    pub fn new() -> Self {
        Self::for_host("localhost")
    }

    /// Single node known under the configured `hostname`
    pub fn for_host<S: Into<String>>(hostname: S) -> Self {
        Self {
            host: HostDescriptor::new(hostname),
        }
    }
}

impl Default for SingleNodeTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterTopology for SingleNodeTopology {
    fn resolve(&self, ctx: &CallContext) -> StorageResult<ClusterView> {
        ctx.check("topology resolution")?;
        Ok(ClusterView {
            members: vec![self.host.clone()],
            local: self.host.clone(),
            replication_factor: 1,
        })
    }

    fn token_ranges(
        &self,
        host: &HostDescriptor,
        ctx: &CallContext,
    ) -> StorageResult<Vec<KeyRange>> {
        ctx.check("token range lookup")?;
        if host != &self.host {
            return Err(StorageError::config(format!(
                "host '{}' is not part of this single-node topology",
                host.hostname
            )));
        }
        Ok(vec![KeyRange::whole_keyspace()])
    }
}

/// Statically configured token ring
///
/// Members are spread evenly over a 64-bit token space (8-byte big-endian
/// tokens). Member `i` is the primary owner of `[token(i), token(i + 1))`
/// and holds replicas of the `replication_factor - 1` ranges preceding it.
#[derive(Debug)]
pub struct StaticRingTopology {
    members: Vec<HostDescriptor>,
    local: HostDescriptor,
    replication_factor: u32,
    reachable: AtomicBool,
}

impl StaticRingTopology {
    pub fn new(
        hostnames: Vec<String>,
        local_host: &str,
        replication_factor: u32,
    ) -> StorageResult<Self> {
        if hostnames.is_empty() {
            return Err(StorageError::config("token ring needs at least one member"));
        }
        if replication_factor == 0 || replication_factor as usize > hostnames.len() {
            return Err(StorageError::config(format!(
                "replication factor {} is invalid for {} members",
                replication_factor,
                hostnames.len()
            )));
        }
        if let Some(duplicate) = first_duplicate(&hostnames) {
            return Err(StorageError::config(format!(
                "host '{}' appears more than once in the ring",
                duplicate
            )));
        }
        if !hostnames.iter().any(|h| h == local_host) {
            return Err(StorageError::config(format!(
                "local host '{}' is not a ring member",
                local_host
            )));
        }
        Ok(Self {
            members: hostnames.into_iter().map(HostDescriptor::new).collect(),
            local: HostDescriptor::new(local_host),
            replication_factor,
            reachable: AtomicBool::new(true),
        })
    }

    pub fn from_config(config: &StoreManagerConfig) -> StorageResult<Self> {
        let local = config
            .effective_local_host()
            .ok_or_else(|| StorageError::config("no local host configured"))?;
        Self::new(config.hostnames.clone(), local, config.replication_factor)
    }

    /// Simulate the topology service becoming (un)reachable
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Ring token of the member at `index`
    pub fn token(&self, index: usize) -> [u8; 8] {
        let n = self.members.len() as u128;
        let token = ((index as u128) << 64) / n;
        (token as u64).to_be_bytes()
    }

    fn primary_range(&self, index: usize) -> KeyRange {
        let next = (index + 1) % self.members.len();
        KeyRange::ring(self.token(index).to_vec(), self.token(next).to_vec())
    }

    fn ensure_reachable(&self) -> StorageResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable("token ring is unreachable"))
        }
    }
}

impl ClusterTopology for StaticRingTopology {
    fn resolve(&self, ctx: &CallContext) -> StorageResult<ClusterView> {
        ctx.check("topology resolution")?;
        self.ensure_reachable()?;
        Ok(ClusterView {
            members: self.members.clone(),
            local: self.local.clone(),
            replication_factor: self.replication_factor,
        })
    }

    fn token_ranges(
        &self,
        host: &HostDescriptor,
        ctx: &CallContext,
    ) -> StorageResult<Vec<KeyRange>> {
        ctx.check("token range lookup")?;
        self.ensure_reachable()?;

        let n = self.members.len();
        let index = self
            .members
            .iter()
            .position(|m| m == host)
            .ok_or_else(|| {
                StorageError::config(format!("host '{}' is not a ring member", host.hostname))
            })?;

        let mut ranges: Vec<KeyRange> = (0..self.replication_factor as usize)
            .map(|offset| self.primary_range((index + n - offset) % n))
            .collect();
        ranges.sort();
        ranges.dedup();

        debug!(
            "Host '{}' holds {} token range(s) at replication factor {}",
            host.hostname,
            ranges.len(),
            self.replication_factor
        );
        Ok(ranges)
    }
}

/// Pick the topology driver implied by a manager configuration
pub fn topology_for(config: &StoreManagerConfig) -> StorageResult<Arc<dyn ClusterTopology>> {
    if config.is_loopback_only() {
        let host = config.effective_local_host().unwrap_or("localhost");
        Ok(Arc::new(SingleNodeTopology::for_host(host)))
    } else {
        Ok(Arc::new(StaticRingTopology::from_config(config)?))
    }
}

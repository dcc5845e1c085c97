// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store manager configuration

use super::error::{StorageError, StorageResult};
use super::persistent::StorageType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hostnames that classify a single-member cluster as a local deployment
pub const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// Configuration for a distributed store manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreManagerConfig {
    /// Physical driver beneath every store
    pub storage_type: StorageType,

    /// Data directory for on-disk drivers
    pub path: PathBuf,

    /// Cluster members; a single loopback entry means a local deployment
    pub hostnames: Vec<String>,

    /// This node's entry in `hostnames` (defaults to the first one)
    pub local_host: Option<String>,

    /// Number of nodes holding a copy of each token range
    pub replication_factor: u32,

    /// Upper bound for topology resolution and partition queries
    pub operation_timeout_ms: u64,

    /// Stores opened eagerly when the manager starts
    pub pre_created_stores: Vec<String>,
}

impl Default for StoreManagerConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::default(),
            path: PathBuf::from("./data"),
            hostnames: vec!["localhost".to_string()],
            local_host: None,
            replication_factor: 1,
            operation_timeout_ms: 10_000,
            pre_created_stores: vec![
                "edgestore".to_string(),
                "graphindex".to_string(),
                "system_properties".to_string(),
            ],
        }
    }
}

impl StoreManagerConfig {
    /// Single-node sled deployment rooted at `path`
    pub fn local<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage_type: StorageType::Sled,
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Single-node in-memory deployment
    pub fn in_memory() -> Self {
        Self {
            storage_type: StorageType::Memory,
            ..Self::default()
        }
    }

    /// Multi-node deployment; `local_host` must be one of `hostnames`
    pub fn cluster(hostnames: Vec<String>, local_host: &str, replication_factor: u32) -> Self {
        Self {
            storage_type: StorageType::Memory,
            hostnames,
            local_host: Some(local_host.to_string()),
            replication_factor,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StorageError::config(format!("invalid manager config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StorageError::config(format!("cannot read {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// The host this node runs as
    pub fn effective_local_host(&self) -> Option<&str> {
        self.local_host
            .as_deref()
            .or_else(|| self.hostnames.first().map(String::as_str))
    }

    /// Whether the configured cluster is a single loopback node
    pub fn is_loopback_only(&self) -> bool {
        self.hostnames.len() == 1 && LOOPBACK_HOSTS.contains(&self.hostnames[0].as_str())
    }

    /// Reject configurations that can never reach a consistent topology
    pub fn validate(&self) -> StorageResult<()> {
        if self.hostnames.is_empty() {
            return Err(StorageError::config("at least one hostname is required"));
        }
        if self.hostnames.iter().any(|h| h.trim().is_empty()) {
            return Err(StorageError::config("hostnames must not be blank"));
        }
        if let Some(duplicate) = first_duplicate(&self.hostnames) {
            return Err(StorageError::config(format!(
                "hostname '{}' is listed more than once",
                duplicate
            )));
        }
        if self.replication_factor == 0 {
            return Err(StorageError::config("replication factor must be at least 1"));
        }
        if self.replication_factor as usize > self.hostnames.len() {
            return Err(StorageError::config(format!(
                "replication factor {} exceeds cluster size {}",
                self.replication_factor,
                self.hostnames.len()
            )));
        }
        if let Some(local) = &self.local_host {
            if !self.hostnames.contains(local) {
                return Err(StorageError::config(format!(
                    "local host '{}' is not a cluster member",
                    local
                )));
            }
        }
        if self.operation_timeout_ms == 0 {
            return Err(StorageError::config("operation timeout must be positive"));
        }
        Ok(())
    }
}

/// First hostname that occurs twice, in list order
pub(crate) fn first_duplicate(hostnames: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(hostnames.len());
    hostnames
        .iter()
        .find(|h| !seen.insert(h.as_str()))
        .map(String::as_str)
}

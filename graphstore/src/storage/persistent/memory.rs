// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation
//!
//! Trees are `BTreeMap`s so iteration follows raw key byte order, matching
//! the on-disk drivers.

use super::traits::{StorageDriver, StorageTree};
use super::types::{BatchOp, StorageType, TreeIter};
use crate::storage::error::StorageResult;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

type TreeData = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

/// In-memory storage driver
pub struct MemoryStorageDriver {
    trees: Arc<RwLock<HashMap<String, TreeData>>>,
}

/// In-memory tree implementation
pub struct MemoryTree {
    data: TreeData,
}

impl MemoryStorageDriver {
    /// Create a new memory storage driver
    pub fn new() -> Self {
        Self {
            trees: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStorageDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    // Snapshot the matching entries so no lock is held while the caller iterates
    fn collect<'a, I>(entries: I) -> TreeIter<'static>
    where
        I: Iterator<Item = (&'a Vec<u8>, &'a Vec<u8>)>,
    {
        let items: Vec<_> = entries.map(|(k, v)| Ok((k.clone(), v.clone()))).collect();
        Box::new(items.into_iter())
    }
}

impl StorageTree for MemoryTree {
    fn iter(&self) -> StorageResult<TreeIter<'_>> {
        let data = self.data.read();
        Ok(Self::collect(data.iter()))
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> StorageResult<TreeIter<'_>> {
        if let Some(end) = end {
            if end <= start {
                return Ok(Box::new(std::iter::empty()));
            }
        }
        let upper = match end {
            Some(end) => Bound::Excluded(end.to_vec()),
            None => Bound::Unbounded,
        };
        let data = self.data.read();
        Ok(Self::collect(
            data.range((Bound::Included(start.to_vec()), upper)),
        ))
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        // One write guard for the whole batch keeps it atomic for readers
        let mut data = self.data.write();
        for op in ops {
            match op {
                BatchOp::Insert { key, value } => {
                    data.insert(key.clone(), value.clone());
                }
                BatchOp::Remove { key } => {
                    data.remove(key);
                }
            }
        }
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        // No-op for memory storage
        Ok(())
    }
}

impl StorageDriver for MemoryStorageDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(_path: P) -> StorageResult<Self> {
        Ok(Self::new())
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let mut trees = self.trees.write();
        let data = trees
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(BTreeMap::new())))
            .clone();
        Ok(Box::new(MemoryTree { data }) as Box<dyn StorageTree>)
    }

    fn flush(&self) -> StorageResult<()> {
        // No-op for memory storage
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }

    fn health_check(&self) -> StorageResult<()> {
        // An in-process map is always reachable
        Ok(())
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        self.trees.write().clear();
        Ok(())
    }
}

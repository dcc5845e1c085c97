// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! This module defines the core traits for physical storage drivers and trees.
//! Key-column-value stores are built on top of these traits, so every driver
//! must keep its trees ordered by raw key bytes.

use super::types::{BatchOp, StorageType, TreeIter};
use crate::storage::error::StorageResult;
use std::path::Path;

/// Trait for a tree/column family in the storage driver
///
/// Represents a named, byte-ordered collection of key-value pairs within a
/// storage driver. Each key-column-value store owns exactly one tree.
pub trait StorageTree: Send + Sync {
    /// Iterate over all key-value pairs in key order
    fn iter(&self) -> StorageResult<TreeIter<'_>>;

    /// Iterate over `[start, end)` in key order; `None` leaves the range unbounded above
    fn range(&self, start: &[u8], end: Option<&[u8]>) -> StorageResult<TreeIter<'_>>;

    /// Apply all operations atomically: either every write is visible or none is
    fn apply_batch(&self, ops: &[BatchOp]) -> StorageResult<()>;

    /// Flush any pending writes to disk
    fn flush(&self) -> StorageResult<()>;
}

/// Main storage driver trait
///
/// Defines the interface that all storage drivers must implement.
/// Provides methods for opening databases, managing trees, and basic operations.
pub trait StorageDriver: Send + Sync {
    /// Type of tree/column family used by this driver
    type Tree: StorageTree;

    /// Open or create a storage driver at the given path
    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self>
    where
        Self: Sized;

    /// Open or create a named tree/column family
    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree>;

    /// Flush all pending writes to disk
    fn flush(&self) -> StorageResult<()>;

    /// Get storage type
    fn storage_type(&self) -> StorageType;

    /// Reachability check used before a manager declares itself ready
    fn health_check(&self) -> StorageResult<()>;

    /// Explicitly close the storage driver and release any file locks
    /// This is called before dropping to ensure clean shutdown
    fn shutdown(&mut self) -> StorageResult<()> {
        // Default implementation just flushes
        self.flush()
    }
}

// Helper implementation for Box<dyn StorageTree>
// This allows us to use boxed trait objects seamlessly
impl StorageTree for Box<dyn StorageTree> {
    fn iter(&self) -> StorageResult<TreeIter<'_>> {
        (**self).iter()
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> StorageResult<TreeIter<'_>> {
        (**self).range(start, end)
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        (**self).apply_batch(ops)
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}

/// Driver handle shared by a manager and every store it issues
pub type SharedDriver = Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>;

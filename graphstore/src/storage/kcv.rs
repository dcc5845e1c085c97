// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Key-column-value store contract
//!
//! A store keeps, under each top-level key, an ordered set of
//! column → value entries. Keys and columns are opaque bytes compared
//! lexicographically.

use super::context::CallContext;
use super::error::StorageResult;
use super::key_range::KeyRange;
use serde::{Deserialize, Serialize};

/// One column → value entry under a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub column: Vec<u8>,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(column: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Column interval `[start, end)` with an optional entry limit
///
/// An empty `end` leaves the slice unbounded above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceQuery {
    pub start: Vec<u8>,
    pub end: Vec<u8>,
    pub limit: Option<usize>,
}

impl SliceQuery {
    /// Every column of a key
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn contains(&self, column: &[u8]) -> bool {
        column >= self.start.as_slice() && (self.end.is_empty() || column < self.end.as_slice())
    }
}

/// A slice of one key's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySliceQuery {
    pub key: Vec<u8>,
    pub slice: SliceQuery,
}

impl KeySliceQuery {
    pub fn new(key: impl Into<Vec<u8>>, slice: SliceQuery) -> Self {
        Self {
            key: key.into(),
            slice,
        }
    }
}

/// A key together with the entries a range scan selected for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntries {
    pub key: Vec<u8>,
    pub entries: Vec<Entry>,
}

/// Per-table storage contract implemented by every backend adapter
///
/// Every operation fails with `IllegalState` once the manager that issued the
/// store has been closed.
pub trait KeyColumnValueStore: Send + Sync {
    /// Name the store was opened under
    fn name(&self) -> &str;

    /// Entries of one key whose columns fall in the slice, in column order
    fn get_slice(&self, query: &KeySliceQuery) -> StorageResult<Vec<Entry>>;

    /// Delete `deletions` then write `additions` under `key`, atomically
    fn mutate(&self, key: &[u8], additions: &[Entry], deletions: &[Vec<u8>]) -> StorageResult<()>;

    /// Scan every key inside `range`, returning the sliced entries of each
    ///
    /// Keys with no entry inside the slice are omitted. Results follow the
    /// range's own order, so a wrapping ring range yields the keys from
    /// `start` upwards first and then the keys below `end`.
    fn get_keys(&self, range: &KeyRange, slice: &SliceQuery) -> StorageResult<Vec<KeyEntries>>;

    /// Key ranges this store owns on the local node
    ///
    /// Never empty on success. Fails with `Unavailable` or `Cancelled` when
    /// the backend cannot answer right now; callers should retry those.
    fn get_local_key_partition(&self) -> StorageResult<Vec<KeyRange>> {
        self.get_local_key_partition_with(&CallContext::background())
    }

    /// Same as [`get_local_key_partition`](Self::get_local_key_partition)
    /// under the caller's deadline and cancellation signal
    fn get_local_key_partition_with(&self, ctx: &CallContext) -> StorageResult<Vec<KeyRange>>;
}

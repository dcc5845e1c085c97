// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Key-column-value store backed by a single driver tree
//!
//! Each `(key, column)` pair becomes one tree key:
//!
//! ```text
//! escape(key) 0x00 0x01 column
//! ```
//!
//! where `escape` rewrites every `0x00` byte of the key as `0x00 0xFF`.
//! The terminator sorts below any escaped byte, so tree order equals
//! (key, column) order and a key's columns are contiguous.

use super::context::CallContext;
use super::error::{StorageError, StorageResult};
use super::kcv::{Entry, KeyColumnValueStore, KeyEntries, KeySliceQuery, SliceQuery};
use super::key_range::{KeyRange, RangeConvention};
use super::manager::{Deployment, ManagerShared};
use super::persistent::{BatchOp, StorageTree, TreeIter};
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;

const ESCAPE: u8 = 0x00;
const ESCAPED_ZERO: u8 = 0xFF;
const TERMINATOR: u8 = 0x01;

/// Tree prefix shared by every column of `key`
pub(crate) fn key_prefix(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + 2);
    for &b in key {
        if b == ESCAPE {
            out.push(ESCAPE);
            out.push(ESCAPED_ZERO);
        } else {
            out.push(b);
        }
    }
    out.push(ESCAPE);
    out.push(TERMINATOR);
    out
}

/// Smallest tree key greater than every composite under `prefix`
fn prefix_upper_bound(prefix: &[u8]) -> Vec<u8> {
    let mut upper = prefix.to_vec();
    if let Some(last) = upper.last_mut() {
        // prefix always ends in TERMINATOR, so this cannot overflow
        *last += 1;
    }
    upper
}

pub(crate) fn encode_composite(key: &[u8], column: &[u8]) -> Vec<u8> {
    let mut out = key_prefix(key);
    out.extend_from_slice(column);
    out
}

/// Split a tree key back into `(key, column)`
pub(crate) fn decode_composite(raw: &[u8]) -> StorageResult<(Vec<u8>, Vec<u8>)> {
    let mut key = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == ESCAPE {
            match raw.get(i + 1) {
                Some(&ESCAPED_ZERO) => {
                    key.push(ESCAPE);
                    i += 2;
                }
                Some(&TERMINATOR) => return Ok((key, raw[i + 2..].to_vec())),
                _ => break,
            }
        } else {
            key.push(raw[i]);
            i += 1;
        }
    }
    Err(StorageError::Serialization(format!(
        "malformed composite key of {} bytes",
        raw.len()
    )))
}

/// Store handle issued by a `DistributedStoreManager`
///
/// The tree is taken out when the manager closes, so a handle that outlives
/// its manager no longer pins the backend.
pub struct TreeStore {
    name: String,
    tree: RwLock<Option<Box<dyn StorageTree>>>,
    shared: Arc<ManagerShared>,
}

impl TreeStore {
    pub(crate) fn new(name: &str, tree: Box<dyn StorageTree>, shared: Arc<ManagerShared>) -> Self {
        Self {
            name: name.to_string(),
            tree: RwLock::new(Some(tree)),
            shared,
        }
    }

    /// Drop the underlying tree; every later call fails with `IllegalState`
    pub(crate) fn release(&self) {
        if self.tree.write().take().is_some() {
            debug!("Released tree of store '{}'", self.name);
        }
    }

    /// Run `f` against the tree while holding it open
    fn with_tree<R>(
        &self,
        f: impl FnOnce(&dyn StorageTree) -> StorageResult<R>,
    ) -> StorageResult<R> {
        self.shared.ensure_ready()?;
        let guard = self.tree.read();
        match guard.as_deref() {
            Some(tree) => f(tree),
            None => Err(StorageError::IllegalState {
                state: self.shared.state(),
            }),
        }
    }

    /// Group consecutive composites by key, applying `slice` per key
    fn collect_keys(
        iter: TreeIter<'_>,
        range: &KeyRange,
        slice: &SliceQuery,
        out: &mut Vec<KeyEntries>,
    ) -> StorageResult<()> {
        for item in iter {
            let (raw, value) = item?;
            let (key, column) = decode_composite(&raw)?;
            if !range.contains(&key) || !slice.contains(&column) {
                continue;
            }
            let is_new_key = out.last().map_or(true, |last| last.key != key);
            if is_new_key {
                out.push(KeyEntries {
                    key,
                    entries: Vec::new(),
                });
            }
            if let Some(current) = out.last_mut() {
                if slice.limit.map_or(true, |limit| current.entries.len() < limit) {
                    current.entries.push(Entry { column, value });
                }
            }
        }
        Ok(())
    }

    fn scan<'a>(
        tree: &'a dyn StorageTree,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> StorageResult<TreeIter<'a>> {
        let lower = key_prefix(start);
        let upper = end.map(key_prefix);
        tree.range(&lower, upper.as_deref())
    }
}

impl KeyColumnValueStore for TreeStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_slice(&self, query: &KeySliceQuery) -> StorageResult<Vec<Entry>> {
        let prefix = key_prefix(&query.key);
        let lower = encode_composite(&query.key, &query.slice.start);
        let upper = if query.slice.end.is_empty() {
            prefix_upper_bound(&prefix)
        } else {
            encode_composite(&query.key, &query.slice.end)
        };

        self.with_tree(|tree| {
            let mut entries = Vec::new();
            for item in tree.range(&lower, Some(upper.as_slice()))? {
                if query.slice.limit.map_or(false, |limit| entries.len() >= limit) {
                    break;
                }
                let (raw, value) = item?;
                entries.push(Entry {
                    column: raw[prefix.len()..].to_vec(),
                    value,
                });
            }
            Ok(entries)
        })
    }

    fn mutate(&self, key: &[u8], additions: &[Entry], deletions: &[Vec<u8>]) -> StorageResult<()> {
        let mut ops = Vec::with_capacity(additions.len() + deletions.len());
        for column in deletions {
            ops.push(BatchOp::Remove {
                key: encode_composite(key, column),
            });
        }
        for entry in additions {
            ops.push(BatchOp::Insert {
                key: encode_composite(key, &entry.column),
                value: entry.value.clone(),
            });
        }
        self.with_tree(|tree| tree.apply_batch(&ops))
    }

    fn get_keys(&self, range: &KeyRange, slice: &SliceQuery) -> StorageResult<Vec<KeyEntries>> {
        self.with_tree(|tree| {
            let mut out = Vec::new();
            match range.convention() {
                RangeConvention::Ordered => {
                    if range.is_empty_range() {
                        return Ok(out);
                    }
                    let end = (!range.end().is_empty()).then(|| range.end());
                    let iter = Self::scan(tree, range.start(), end)?;
                    Self::collect_keys(iter, range, slice, &mut out)?;
                }
                RangeConvention::Ring if range.is_full() => {
                    Self::collect_keys(tree.iter()?, range, slice, &mut out)?;
                }
                RangeConvention::Ring if range.wraps() => {
                    let upper = Self::scan(tree, range.start(), None)?;
                    Self::collect_keys(upper, range, slice, &mut out)?;
                    let lower = Self::scan(tree, &[], Some(range.end()))?;
                    Self::collect_keys(lower, range, slice, &mut out)?;
                }
                RangeConvention::Ring => {
                    let iter = Self::scan(tree, range.start(), Some(range.end()))?;
                    Self::collect_keys(iter, range, slice, &mut out)?;
                }
            }
            Ok(out)
        })
    }

    fn get_local_key_partition_with(&self, ctx: &CallContext) -> StorageResult<Vec<KeyRange>> {
        self.shared.ensure_ready()?;
        let ctx = ctx.clone().bounded_by(self.shared.operation_timeout());
        ctx.check("local key partition query")?;

        let ranges = match self.shared.deployment() {
            Deployment::Local => vec![KeyRange::whole_keyspace()],
            Deployment::Remote => self
                .shared
                .topology()
                .token_ranges(self.shared.local_host(), &ctx)
                .map_err(|e| {
                    warn!("Partition query for store '{}' failed: {}", self.name, e);
                    e
                })?,
        };
        ctx.check("local key partition query")?;

        // The manager may have closed while the topology call was in flight
        self.shared.ensure_ready()?;

        if ranges.is_empty() {
            return Err(StorageError::InvalidPartition(format!(
                "reachable backend reported no local ranges for store '{}'",
                self.name
            )));
        }
        debug!(
            "Store '{}' owns {} local key range(s)",
            self.name,
            ranges.len()
        );
        Ok(ranges)
    }
}

// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation

use super::traits::{StorageDriver, StorageTree};
use super::types::{BatchOp, StorageType, TreeIter};
use crate::storage::error::{StorageError, StorageResult};
use std::path::Path;

/// Sled driver implementation
pub struct SledDriver {
    db: sled::Db,
}

/// Sled tree wrapper that implements StorageTree trait
pub struct SledTree {
    tree: sled::Tree,
}

fn map_entries<I>(iter: I) -> TreeIter<'static>
where
    I: Iterator<Item = sled::Result<(sled::IVec, sled::IVec)>> + 'static,
{
    Box::new(iter.map(|result| {
        result
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .map_err(StorageError::backend)
    }))
}

impl StorageTree for SledTree {
    fn iter(&self) -> StorageResult<TreeIter<'_>> {
        Ok(map_entries(self.tree.iter()))
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> StorageResult<TreeIter<'_>> {
        match end {
            // sled panics on inverted ranges
            Some(end) if end <= start => Ok(Box::new(std::iter::empty())),
            Some(end) => Ok(map_entries(self.tree.range(start.to_vec()..end.to_vec()))),
            None => Ok(map_entries(self.tree.range(start.to_vec()..))),
        }
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        let mut batch = sled::Batch::default();
        for op in ops {
            match op {
                BatchOp::Insert { key, value } => batch.insert(key.as_slice(), value.as_slice()),
                BatchOp::Remove { key } => batch.remove(key.as_slice()),
            }
        }
        self.tree.apply_batch(batch).map_err(StorageError::backend)
    }

    fn flush(&self) -> StorageResult<()> {
        self.tree.flush().map_err(StorageError::backend)?;
        Ok(())
    }
}

impl StorageDriver for SledDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::unavailable(format!(
                "cannot open sled database at {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Ok(SledDriver { db })
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let tree = self.db.open_tree(name).map_err(StorageError::backend)?;
        Ok(Box::new(SledTree { tree }) as Box<dyn StorageTree>)
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush().map_err(StorageError::backend)?;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sled
    }

    fn health_check(&self) -> StorageResult<()> {
        self.db
            .size_on_disk()
            .map(|_| ())
            .map_err(|e| StorageError::unavailable(e.to_string()))
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        // The file lock goes away once the driver and every tree are dropped
        self.db.flush().map_err(StorageError::backend)?;
        Ok(())
    }
}

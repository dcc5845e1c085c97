// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persists definition maps as column-value entries
//!
//! Layout: row key is the element id as 8 big-endian bytes, one column per
//! set category (the category id byte), value is the bincode-encoded
//! `DefinitionValue`.

use super::category::TypeDefinitionCategory;
use super::definition::{OwnerKind, TypeDefinitionMap};
use super::error::{SchemaError, SchemaResult};
use super::value::DefinitionValue;
use crate::storage::kcv::{Entry, KeyColumnValueStore, KeySliceQuery, SliceQuery};
use log::{debug, info};
use std::sync::Arc;

fn element_key(element_id: u64) -> [u8; 8] {
    element_id.to_be_bytes()
}

/// Reads and writes definition maps through a key-column-value store
pub struct SchemaStore {
    store: Arc<dyn KeyColumnValueStore>,
}

impl SchemaStore {
    pub fn new(store: Arc<dyn KeyColumnValueStore>) -> Self {
        Self { store }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Write every set category of `map` in one mutation, then freeze it
    ///
    /// Columns previously stored for this element but absent from `map` are
    /// removed in the same mutation. On failure the map stays writable.
    pub fn commit(&self, element_id: u64, map: &mut TypeDefinitionMap) -> SchemaResult<()> {
        if map.is_frozen() {
            return Err(SchemaError::Frozen(map.owner()));
        }
        let key = element_key(element_id);

        let mut additions = Vec::with_capacity(map.len());
        for (category, value) in map.iter() {
            additions.push(Entry::new(vec![category.id()], bincode::serialize(value)?));
        }

        let stale: Vec<Vec<u8>> = self
            .store
            .get_slice(&KeySliceQuery::new(key.to_vec(), SliceQuery::all()))?
            .into_iter()
            .map(|entry| entry.column)
            .filter(|column| !additions.iter().any(|added| &added.column == column))
            .collect();

        self.store.mutate(&key, &additions, &stale)?;
        map.freeze();

        info!(
            "Committed {} definition for element {} ({} categories)",
            map.owner(),
            element_id,
            additions.len()
        );
        Ok(())
    }

    /// Rebuild the map of `element_id` through the validating write path
    pub fn load(&self, element_id: u64, owner: OwnerKind) -> SchemaResult<TypeDefinitionMap> {
        let entries = self.store.get_slice(&KeySliceQuery::new(
            element_key(element_id).to_vec(),
            SliceQuery::all(),
        ))?;
        if entries.is_empty() {
            return Err(SchemaError::ElementNotFound(element_id));
        }

        let mut map = TypeDefinitionMap::new(owner);
        for entry in entries {
            let category = match entry.column.as_slice() {
                [id] => TypeDefinitionCategory::from_id(*id),
                _ => None,
            }
            .ok_or_else(|| {
                SchemaError::Serialization(format!(
                    "element {} has an unknown category column {:?}",
                    element_id, entry.column
                ))
            })?;
            let value: DefinitionValue = bincode::deserialize(&entry.value)?;
            map.set(category, value)?;
        }
        map.freeze();

        debug!(
            "Loaded {} definition for element {} ({} categories)",
            owner,
            element_id,
            map.len()
        );
        Ok(map)
    }

    /// Delete every stored column of `element_id`; returns how many existed
    pub fn drop_element(&self, element_id: u64) -> SchemaResult<usize> {
        let key = element_key(element_id);
        let columns: Vec<Vec<u8>> = self
            .store
            .get_slice(&KeySliceQuery::new(key.to_vec(), SliceQuery::all()))?
            .into_iter()
            .map(|entry| entry.column)
            .collect();
        if !columns.is_empty() {
            self.store.mutate(&key, &[], &columns)?;
        }
        debug!("Dropped {} columns of element {}", columns.len(), element_id);
        Ok(columns.len())
    }
}

// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Type definition maps
//!
//! A `TypeDefinitionMap` holds the schema metadata of one schema element.
//! Writes are validated against the owner's legal category set and the
//! category's value kind; reads fall back to the category default.

use super::category::{
    TypeDefinitionCategory, CONSISTENCY_MODIFIER_DEFINITION_CATEGORIES,
    EDGE_LABEL_DEFINITION_CATEGORIES, INDEX_DEFINITION_CATEGORIES,
    PROPERTY_KEY_DEFINITION_CATEGORIES,
};
use super::error::{SchemaError, SchemaResult, ValidationFailure};
use super::value::DefinitionValue;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Kind of schema element owning a definition map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    PropertyKey,
    EdgeLabel,
    Index,
    ConsistencyModifier,
}

impl OwnerKind {
    pub const ALL: [OwnerKind; 4] = [
        OwnerKind::PropertyKey,
        OwnerKind::EdgeLabel,
        OwnerKind::Index,
        OwnerKind::ConsistencyModifier,
    ];

    pub fn legal_categories(self) -> &'static HashSet<TypeDefinitionCategory> {
        match self {
            OwnerKind::PropertyKey => &*PROPERTY_KEY_DEFINITION_CATEGORIES,
            OwnerKind::EdgeLabel => &*EDGE_LABEL_DEFINITION_CATEGORIES,
            OwnerKind::Index => &*INDEX_DEFINITION_CATEGORIES,
            OwnerKind::ConsistencyModifier => &*CONSISTENCY_MODIFIER_DEFINITION_CATEGORIES,
        }
    }

    pub fn allows(self, category: TypeDefinitionCategory) -> bool {
        self.legal_categories().contains(&category)
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OwnerKind::PropertyKey => "property key",
            OwnerKind::EdgeLabel => "edge label",
            OwnerKind::Index => "index",
            OwnerKind::ConsistencyModifier => "consistency modifier",
        };
        write!(f, "{}", name)
    }
}

/// Category to value map for one schema element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinitionMap {
    owner: OwnerKind,
    entries: BTreeMap<TypeDefinitionCategory, DefinitionValue>,
    frozen: bool,
}

impl TypeDefinitionMap {
    pub fn new(owner: OwnerKind) -> Self {
        Self {
            owner,
            entries: BTreeMap::new(),
            frozen: false,
        }
    }

    pub fn owner(&self) -> OwnerKind {
        self.owner
    }

    /// Store `value` under `category`, replacing any previous value
    ///
    /// Rejects categories outside the owner's legal set, values of the wrong
    /// kind and any write after [`freeze`](Self::freeze).
    pub fn set<V: Into<DefinitionValue>>(
        &mut self,
        category: TypeDefinitionCategory,
        value: V,
    ) -> SchemaResult<&mut Self> {
        if self.frozen {
            return Err(SchemaError::Frozen(self.owner));
        }
        if !self.owner.allows(category) {
            return Err(SchemaError::validation(
                category,
                ValidationFailure::IllegalForOwner { owner: self.owner },
            ));
        }

        let value = value.into();
        if !category.verify_value(Some(&value))? {
            return Err(SchemaError::validation(
                category,
                ValidationFailure::KindMismatch {
                    expected: category.value_kind()?,
                    found: Some(value.kind()),
                },
            ));
        }

        trace!("{} definition: {} = {:?}", self.owner, category, value);
        self.entries.insert(category, value);
        Ok(self)
    }

    /// Stored value, else the category default
    pub fn get(&self, category: TypeDefinitionCategory) -> SchemaResult<DefinitionValue> {
        match self.entries.get(&category) {
            Some(value) => Ok(value.clone()),
            None => category
                .default_value(self)
                .ok_or(SchemaError::NotFound(category)),
        }
    }

    /// Typed variant of [`get`](Self::get)
    pub fn get_as<T>(&self, category: TypeDefinitionCategory) -> SchemaResult<T>
    where
        T: TryFrom<DefinitionValue, Error = super::value::ValueKind>,
    {
        let value = self.get(category)?;
        T::try_from(value).map_err(|found| {
            SchemaError::InvalidState(format!(
                "{} holds a {} value, not the requested type",
                category, found
            ))
        })
    }

    /// Whether a value was explicitly set; defaults do not count
    pub fn contains(&self, category: TypeDefinitionCategory) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicitly set entries in category id order
    pub fn iter(&self) -> impl Iterator<Item = (TypeDefinitionCategory, &DefinitionValue)> {
        self.entries.iter().map(|(c, v)| (*c, v))
    }

    /// Legal categories that are neither set nor defaulted, in id order
    pub fn missing_categories(&self) -> Vec<TypeDefinitionCategory> {
        let mut missing: Vec<_> = self
            .owner
            .legal_categories()
            .iter()
            .copied()
            .filter(|c| !self.contains(*c) && c.default_value(self).is_none())
            .collect();
        missing.sort();
        missing
    }

    pub fn validate_complete(&self) -> SchemaResult<()> {
        let missing = self.missing_categories();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Incomplete {
                owner: self.owner,
                missing,
            })
        }
    }

    /// Make the map read-only; there is no way back
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

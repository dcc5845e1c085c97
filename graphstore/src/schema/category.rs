// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Category registry for schema type definitions
//!
//! The set of categories is closed and fixed at compile time. Each category
//! has a static record carrying its relation kind and (optional) value kind;
//! the legal category sets per owner kind are computed once on first use and
//! never change afterwards.

use super::definition::{OwnerKind, TypeDefinitionMap};
use super::error::{SchemaError, SchemaResult};
use super::value::{DefinitionValue, Order, SchemaStatus, ValueKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Whether a category is stored as a property (scalar payload) or an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Property,
    Edge,
}

/// One named kind of schema metadata attachable to a graph type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeDefinitionCategory {
    // Relation types
    Hidden = 0,
    SortKey = 1,
    SortOrder = 2,
    Ttl = 3,
    Signature = 4,
    Multiplicity = 5,
    DataType = 6,
    Unidirectional = 7,

    // General admin
    Status = 8,

    // Index types
    ElementCategory = 9,
    IndexCardinality = 10,
    InternalIndex = 11,
    BackingIndex = 12,
    IndexStoreName = 13,

    // Consistency types
    ConsistencyLevel = 14,

    // Schema edges
    RelationTypeIndex = 15,
    ConsistencyModifier = 16,
    IndexField = 17,
}

/// Static description of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRecord {
    pub name: &'static str,
    pub relation_kind: RelationKind,
    pub value_kind: Option<ValueKind>,
}

const fn property(name: &'static str, kind: ValueKind) -> CategoryRecord {
    CategoryRecord {
        name,
        relation_kind: RelationKind::Property,
        value_kind: Some(kind),
    }
}

const fn edge(name: &'static str, kind: Option<ValueKind>) -> CategoryRecord {
    CategoryRecord {
        name,
        relation_kind: RelationKind::Edge,
        value_kind: kind,
    }
}

/// Records indexed by category id
static CATEGORY_TABLE: [CategoryRecord; 18] = [
    property("HIDDEN", ValueKind::Boolean),
    property("SORT_KEY", ValueKind::LongArray),
    property("SORT_ORDER", ValueKind::Order),
    property("TTL", ValueKind::Integer),
    property("SIGNATURE", ValueKind::LongArray),
    property("MULTIPLICITY", ValueKind::Multiplicity),
    property("DATATYPE", ValueKind::DataType),
    property("UNIDIRECTIONAL", ValueKind::Direction),
    property("STATUS", ValueKind::SchemaStatus),
    property("ELEMENT_CATEGORY", ValueKind::ElementCategory),
    property("INDEX_CARDINALITY", ValueKind::Cardinality),
    property("INTERNAL_INDEX", ValueKind::Boolean),
    property("BACKING_INDEX", ValueKind::String),
    property("INDEXSTORE_NAME", ValueKind::String),
    property("CONSISTENCY_LEVEL", ValueKind::ConsistencyModifier),
    edge("RELATIONTYPE_INDEX", None),
    edge("CONSISTENCY_MODIFIER", None),
    edge("INDEX_FIELD", Some(ValueKind::ParameterArray)),
];

use TypeDefinitionCategory as C;

pub static PROPERTY_KEY_DEFINITION_CATEGORIES: Lazy<HashSet<TypeDefinitionCategory>> =
    Lazy::new(|| {
        [
            C::Hidden,
            C::SortKey,
            C::SortOrder,
            C::Ttl,
            C::Signature,
            C::Multiplicity,
            C::DataType,
        ]
        .into_iter()
        .collect()
    });

pub static EDGE_LABEL_DEFINITION_CATEGORIES: Lazy<HashSet<TypeDefinitionCategory>> =
    Lazy::new(|| {
        [
            C::Hidden,
            C::SortKey,
            C::SortOrder,
            C::Ttl,
            C::Signature,
            C::Multiplicity,
            C::Unidirectional,
        ]
        .into_iter()
        .collect()
    });

pub static INDEX_DEFINITION_CATEGORIES: Lazy<HashSet<TypeDefinitionCategory>> =
    Lazy::new(|| {
        [
            C::Status,
            C::ElementCategory,
            C::IndexCardinality,
            C::InternalIndex,
            C::BackingIndex,
            C::IndexStoreName,
        ]
        .into_iter()
        .collect()
    });

pub static CONSISTENCY_MODIFIER_DEFINITION_CATEGORIES: Lazy<HashSet<TypeDefinitionCategory>> =
    Lazy::new(|| [C::ConsistencyLevel].into_iter().collect());

impl TypeDefinitionCategory {
    /// Every category in id order
    pub const ALL: [TypeDefinitionCategory; 18] = [
        C::Hidden,
        C::SortKey,
        C::SortOrder,
        C::Ttl,
        C::Signature,
        C::Multiplicity,
        C::DataType,
        C::Unidirectional,
        C::Status,
        C::ElementCategory,
        C::IndexCardinality,
        C::InternalIndex,
        C::BackingIndex,
        C::IndexStoreName,
        C::ConsistencyLevel,
        C::RelationTypeIndex,
        C::ConsistencyModifier,
        C::IndexField,
    ];

    pub fn record(self) -> &'static CategoryRecord {
        &CATEGORY_TABLE[self as usize]
    }

    /// Stable numeric identity, used as the persisted column
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        self.record().name
    }

    pub fn relation_kind(self) -> RelationKind {
        self.record().relation_kind
    }

    pub fn has_value_kind(self) -> bool {
        self.record().value_kind.is_some()
    }

    /// Kind of value this category carries
    ///
    /// Fails with `InvalidState` for pure edge categories; check
    /// [`has_value_kind`](Self::has_value_kind) first.
    pub fn value_kind(self) -> SchemaResult<ValueKind> {
        self.record().value_kind.ok_or_else(|| {
            SchemaError::InvalidState(format!("category {} carries no value kind", self))
        })
    }

    pub fn is_property(self) -> bool {
        self.relation_kind() == RelationKind::Property
    }

    pub fn is_edge(self) -> bool {
        self.relation_kind() == RelationKind::Edge
    }

    /// Whether `value` is present and of exactly this category's value kind
    ///
    /// Verifying against a category without a value kind is a programming
    /// error and fails with `InvalidState` instead of answering.
    pub fn verify_value(self, value: Option<&DefinitionValue>) -> SchemaResult<bool> {
        let expected = self.record().value_kind.ok_or_else(|| {
            SchemaError::InvalidState(format!("cannot verify a value against {}", self))
        })?;
        Ok(value.map_or(false, |v| v.kind() == expected))
    }

    /// Default for an unset category of the map under construction
    ///
    /// Only the sort order and the status carry a default; the map's
    /// contents never influence the answer.
    pub fn default_value(self, _map: &TypeDefinitionMap) -> Option<DefinitionValue> {
        match self {
            C::SortOrder => Some(DefinitionValue::Order(Order::Asc)),
            C::Status => Some(DefinitionValue::SchemaStatus(SchemaStatus::Enabled)),
            C::Hidden
            | C::SortKey
            | C::Ttl
            | C::Signature
            | C::Multiplicity
            | C::DataType
            | C::Unidirectional
            | C::ElementCategory
            | C::IndexCardinality
            | C::InternalIndex
            | C::BackingIndex
            | C::IndexStoreName
            | C::ConsistencyLevel
            | C::RelationTypeIndex
            | C::ConsistencyModifier
            | C::IndexField => None,
        }
    }

    /// Owner kinds whose definitions may carry this category
    pub fn legal_owners(self) -> Vec<OwnerKind> {
        OwnerKind::ALL
            .into_iter()
            .filter(|owner| owner.allows(self))
            .collect()
    }
}

impl fmt::Display for TypeDefinitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TypeDefinitionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| format!("Unknown definition category: {}", s))
    }
}

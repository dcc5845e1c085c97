// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for schema definitions

use super::category::TypeDefinitionCategory;
use super::definition::OwnerKind;
use super::value::ValueKind;
use crate::storage::error::StorageError;
use thiserror::Error;

/// Why a category/value pair was rejected by a definition map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("category is not legal for {owner} definitions")]
    IllegalForOwner { owner: OwnerKind },

    #[error("expected a {expected} value, found {}", .found.map_or("none".to_string(), |k| k.to_string()))]
    KindMismatch {
        expected: ValueKind,
        found: Option<ValueKind>,
    },
}

/// Schema definition errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid value for category {category}: {reason}")]
    Validation {
        category: TypeDefinitionCategory,
        reason: ValidationFailure,
    },

    #[error("Definition category not found: {0}")]
    NotFound(TypeDefinitionCategory),

    #[error("Schema element {0} has no persisted definition")]
    ElementNotFound(u64),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Definition map for {0} is frozen")]
    Frozen(OwnerKind),

    #[error("Incomplete {owner} definition, missing: {}", .missing.iter().map(|c| c.name()).collect::<Vec<_>>().join(", "))]
    Incomplete {
        owner: OwnerKind,
        missing: Vec<TypeDefinitionCategory>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SchemaError {
    pub fn validation(category: TypeDefinitionCategory, reason: ValidationFailure) -> Self {
        SchemaError::Validation { category, reason }
    }
}

impl From<bincode::Error> for SchemaError {
    fn from(err: bincode::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;

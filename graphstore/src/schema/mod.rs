// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Typed schema definitions
//!
//! This module provides:
//! - The closed registry of definition categories and their value kinds
//! - Legal category sets per schema element kind
//! - Validated definition maps for individual schema elements
//! - Persistence of definition maps into a key-column-value store

pub mod category;
pub mod definition;
pub mod error;
pub mod persistence;
pub mod value;

pub use category::{RelationKind, TypeDefinitionCategory};
pub use definition::{OwnerKind, TypeDefinitionMap};
pub use error::{SchemaError, SchemaResult, ValidationFailure};
pub use persistence::SchemaStore;
pub use value::{
    Cardinality, ConsistencyModifier, DataType, DefinitionValue, Direction, ElementCategory,
    Multiplicity, Order, Parameter, SchemaStatus, ValueKind,
};

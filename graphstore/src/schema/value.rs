// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Typed values attachable to schema definition categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction of a relation type's sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

/// How many relations of a type may connect a pair of vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    Multi,
    Simple,
    ManyToOne,
    OneToMany,
    OneToOne,
}

/// Attribute data type of a property key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Character,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Date,
    Uuid,
    Geoshape,
    Object,
}

/// Edge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Out,
    In,
    Both,
}

/// Lifecycle status of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaStatus {
    Installed,
    Registered,
    Enabled,
    Disabled,
}

/// Graph element kind an index applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCategory {
    Vertex,
    Edge,
    Property,
}

/// Value cardinality of an indexed key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    Single,
    List,
    Set,
}

/// Consistency guarantee requested for a schema element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyModifier {
    Default,
    Lock,
    Fork,
}

/// Key/value option passed to a backing index for one indexed field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Runtime kind of a definition value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Boolean,
    Integer,
    LongArray,
    String,
    Order,
    Multiplicity,
    DataType,
    Direction,
    SchemaStatus,
    ElementCategory,
    Cardinality,
    ConsistencyModifier,
    ParameterArray,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A value stored under a definition category
///
/// The variant is the value's runtime kind; a category accepts exactly one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionValue {
    Boolean(bool),
    Integer(i32),
    LongArray(Vec<i64>),
    String(String),
    Order(Order),
    Multiplicity(Multiplicity),
    DataType(DataType),
    Direction(Direction),
    SchemaStatus(SchemaStatus),
    ElementCategory(ElementCategory),
    Cardinality(Cardinality),
    ConsistencyModifier(ConsistencyModifier),
    ParameterArray(Vec<Parameter>),
}

impl DefinitionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DefinitionValue::Boolean(_) => ValueKind::Boolean,
            DefinitionValue::Integer(_) => ValueKind::Integer,
            DefinitionValue::LongArray(_) => ValueKind::LongArray,
            DefinitionValue::String(_) => ValueKind::String,
            DefinitionValue::Order(_) => ValueKind::Order,
            DefinitionValue::Multiplicity(_) => ValueKind::Multiplicity,
            DefinitionValue::DataType(_) => ValueKind::DataType,
            DefinitionValue::Direction(_) => ValueKind::Direction,
            DefinitionValue::SchemaStatus(_) => ValueKind::SchemaStatus,
            DefinitionValue::ElementCategory(_) => ValueKind::ElementCategory,
            DefinitionValue::Cardinality(_) => ValueKind::Cardinality,
            DefinitionValue::ConsistencyModifier(_) => ValueKind::ConsistencyModifier,
            DefinitionValue::ParameterArray(_) => ValueKind::ParameterArray,
        }
    }
}

// Conversions in both directions between a payload type and its variant
macro_rules! definition_value_conversions {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for DefinitionValue {
                fn from(value: $ty) -> Self {
                    DefinitionValue::$variant(value)
                }
            }

            impl TryFrom<DefinitionValue> for $ty {
                type Error = ValueKind;

                fn try_from(value: DefinitionValue) -> Result<Self, Self::Error> {
                    match value {
                        DefinitionValue::$variant(inner) => Ok(inner),
                        other => Err(other.kind()),
                    }
                }
            }
        )*
    };
}

definition_value_conversions!(
    Boolean(bool),
    Integer(i32),
    LongArray(Vec<i64>),
    String(String),
    Order(Order),
    Multiplicity(Multiplicity),
    DataType(DataType),
    Direction(Direction),
    SchemaStatus(SchemaStatus),
    ElementCategory(ElementCategory),
    Cardinality(Cardinality),
    ConsistencyModifier(ConsistencyModifier),
    ParameterArray(Vec<Parameter>),
);

impl From<&str> for DefinitionValue {
    fn from(value: &str) -> Self {
        DefinitionValue::String(value.to_string())
    }
}

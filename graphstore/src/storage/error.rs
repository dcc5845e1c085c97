// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the storage layer
//!
//! Covers the physical drivers, the key-column-value stores built on top of
//! them and the distributed store manager that issues those stores.

use super::manager::ManagerState;
use thiserror::Error;

/// Errors raised by storage drivers, stores and the store manager
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend cannot currently answer (network partition, driver down)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The caller's deadline expired or the call was cancelled
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Manager or store used outside the READY state
    #[error("Illegal state: operation requires a ready manager, current state is {state}")]
    IllegalState { state: ManagerState },

    /// The manager configuration cannot be used to reach a backend
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A reachable backend reported an unusable partition layout
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    /// Driver-specific error (Sled, etc.)
    #[error("Storage driver error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Whether the caller may retry the operation with backoff.
    ///
    /// Only transient backend failures qualify; the storage layer itself
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Cancelled(_))
    }

    /// Create an unavailable error
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a backend error
    pub fn backend<S: ToString>(err: S) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

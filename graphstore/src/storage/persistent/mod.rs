// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Physical storage drivers
//!
//! This module provides trait-based abstractions for ordered key-value storage,
//! allowing different backends to sit beneath the key-column-value stores.
//!
//! # Architecture
//!
//! ```text
//! DistributedStoreManager / KeyColumnValueStore
//!     ↓
//! StorageDriver (ordered key-value abstraction)
//!     ↓
//! Concrete Implementations (Sled, Memory)
//! ```

// Core modules
pub mod factory;
pub mod traits;
pub mod types;

// Driver implementations
pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;

// Public API re-exports
pub use factory::create_storage_driver;
pub use traits::{SharedDriver, StorageDriver, StorageTree};
pub use types::{BatchOp, StorageType, TreeIter};

//! Test utilities for GraphStore integration tests
//!
//! Provides a fixture owning a store manager together with the temporary
//! directory its sled driver lives in.

#![allow(dead_code)]

use graphstore::storage::{DistributedStoreManager, StoreManagerConfig};
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route `log` output through the test harness; safe to call repeatedly
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Store manager with an isolated on-disk backend
pub struct ManagerFixture {
    pub manager: DistributedStoreManager,
    _temp_dir: tempfile::TempDir,
}

impl ManagerFixture {
    /// LOCAL deployment backed by sled in a fresh temporary directory
    pub fn sled() -> Result<Self, Box<dyn std::error::Error>> {
        init_logging();
        let temp_dir = tempfile::tempdir()?;
        let config = StoreManagerConfig::local(temp_dir.path().join("graphstore_test"));
        let manager = DistributedStoreManager::open(config)?;
        Ok(Self {
            manager,
            _temp_dir: temp_dir,
        })
    }

    /// LOCAL deployment backed by the in-memory driver
    pub fn in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        init_logging();
        let temp_dir = tempfile::tempdir()?;
        let manager = DistributedStoreManager::open(StoreManagerConfig::in_memory())?;
        Ok(Self {
            manager,
            _temp_dir: temp_dir,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        self._temp_dir.path()
    }
}

pub fn hosts(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

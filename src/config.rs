//! Store configuration
//!
//! ```yaml
//! default_store_id: default
//! backend:
//!   kind: rocksdb
//!   path: ./quadstore_data
//! ```

use crate::persistence::{MemoryStorage, StorageBackend, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Backend failed to open
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend not compiled into this build
    #[error("Unsupported backend: {0}")]
    UnsupportedBackend(String),
}

/// Which storage backend to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Process-local, nothing persisted
    #[default]
    Memory,
    /// RocksDB database directory
    RocksDb {
        path: PathBuf,
    },
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage backend
    pub backend: BackendConfig,
    /// Store id used when a caller names none
    pub default_store_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Memory,
            default_store_id: crate::store::DEFAULT_STORE_ID.to_string(),
        }
    }
}

impl StoreConfig {
    /// Persistent configuration rooted at a data directory
    pub fn rocksdb(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::RocksDb { path: path.into() },
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Open the configured backend
    pub fn open_backend(&self) -> Result<Arc<dyn StorageBackend>, ConfigError> {
        match &self.backend {
            BackendConfig::Memory => Ok(Arc::new(MemoryStorage::new())),
            #[cfg(feature = "rocksdb")]
            BackendConfig::RocksDb { path } => {
                std::fs::create_dir_all(path)?;
                Ok(Arc::new(crate::persistence::PersistentStorage::open(path)?))
            }
            #[cfg(not(feature = "rocksdb"))]
            BackendConfig::RocksDb { path } => Err(ConfigError::UnsupportedBackend(format!(
                "rocksdb at {} (built without the `rocksdb` feature)",
                path.display()
            ))),
        }
    }
}

//! Configuration for the store
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Process-level configuration shared by every repository
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all collection files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── datasources.yaml
    ///     ├── datasources.yaml.tmp   (staging, only during a flush)
    ///     └── namespaces.yaml
    pub data_dir: PathBuf,

    /// Which repository implementation to construct
    pub driver: Driver,

    /// File name of the data source collection
    pub datasource_file: String,

    /// File name of the namespace collection
    pub namespace_file: String,

    // -------------------------------------------------------------------------
    // Flush Configuration
    // -------------------------------------------------------------------------
    /// How often the background flusher checks the dirty flag
    pub flush_interval: Duration,

    // -------------------------------------------------------------------------
    // Identifier Configuration
    // -------------------------------------------------------------------------
    /// Node identity mixed into generated identifiers (0..=1023)
    pub node_id: u16,
}

/// Repository implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    /// YAML file per collection, flushed in the background
    File,

    /// Process memory only; nothing survives a restart
    Memory,
}

impl FromStr for Driver {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Driver::File),
            "memory" => Ok(Driver::Memory),
            other => Err(StoreError::UnknownDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::File => f.write_str("file"),
            Driver::Memory => f.write_str("memory"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./sovereign_data"),
            driver: Driver::File,
            datasource_file: "datasources.yaml".to_string(),
            namespace_file: "namespaces.yaml".to_string(),
            flush_interval: Duration::from_secs(5),
            node_id: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Per-collection settings for the given file name
    pub fn store_config(&self, file_name: &str) -> StoreConfig {
        StoreConfig {
            data_dir: self.data_dir.clone(),
            file_name: file_name.to_string(),
            flush_interval: self.flush_interval,
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all collection files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the repository driver
    pub fn driver(mut self, driver: Driver) -> Self {
        self.config.driver = driver;
        self
    }

    /// Set the data source collection file name
    pub fn datasource_file(mut self, name: impl Into<String>) -> Self {
        self.config.datasource_file = name.into();
        self
    }

    /// Set the namespace collection file name
    pub fn namespace_file(mut self, name: impl Into<String>) -> Self {
        self.config.namespace_file = name.into();
        self
    }

    /// Set the background flush interval
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Set the node id used by the identifier generator
    pub fn node_id(mut self, node_id: u16) -> Self {
        self.config.node_id = node_id;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Settings for a single file-backed collection
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the collection file (created on open)
    pub data_dir: PathBuf,

    /// Canonical file name; the staging file is `{file_name}.tmp`
    pub file_name: String,

    /// Tick period of the background flusher
    pub flush_interval: Duration,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>, file_name: impl Into<String>, flush_interval: Duration) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: file_name.into(),
            flush_interval,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(StoreError::Config("file name must not be empty".to_string()));
        }
        if self.flush_interval.is_zero() {
            return Err(StoreError::Config("flush interval must be positive".to_string()));
        }
        Ok(())
    }

    /// Canonical path of the collection file
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Staging path written before the atomic rename
    pub fn tmp_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.tmp", self.file_name))
    }
}

//! Repository registry
//!
//! Maps a [`Driver`] to the constructor of each repository. A registry is an
//! ordinary value: build it once at startup and pass it to whatever opens
//! repositories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Config, Driver};
use crate::datasource::{DataSourceRepository, DataSourceStore};
use crate::error::{Result, StoreError};
use crate::id::IdGenerator;
use crate::namespace::{NamespaceRepository, NamespaceStore};

pub type DataSourceFactory =
    fn(&Config, Arc<dyn IdGenerator>) -> Result<Arc<dyn DataSourceRepository>>;

pub type NamespaceFactory =
    fn(&Config, Arc<dyn IdGenerator>) -> Result<Arc<dyn NamespaceRepository>>;

/// Driver → constructor table
#[derive(Default)]
pub struct Registry {
    datasource: HashMap<Driver, DataSourceFactory>,
    namespace: HashMap<Driver, NamespaceFactory>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the file and memory drivers for every collection
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_datasource(Driver::File, open_file_datasource);
        registry.register_datasource(Driver::Memory, open_memory_datasource);
        registry.register_namespace(Driver::File, open_file_namespace);
        registry.register_namespace(Driver::Memory, open_memory_namespace);
        registry
    }

    pub fn register_datasource(&mut self, driver: Driver, factory: DataSourceFactory) {
        self.datasource.insert(driver, factory);
    }

    pub fn register_namespace(&mut self, driver: Driver, factory: NamespaceFactory) {
        self.namespace.insert(driver, factory);
    }

    /// Open the data source repository for `config.driver`
    pub fn open_datasource(
        &self,
        config: &Config,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Arc<dyn DataSourceRepository>> {
        let factory = self
            .datasource
            .get(&config.driver)
            .ok_or_else(|| StoreError::UnknownDriver(config.driver.to_string()))?;
        factory(config, ids)
    }

    /// Open the namespace repository for `config.driver`
    pub fn open_namespace(
        &self,
        config: &Config,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Arc<dyn NamespaceRepository>> {
        let factory = self
            .namespace
            .get(&config.driver)
            .ok_or_else(|| StoreError::UnknownDriver(config.driver.to_string()))?;
        factory(config, ids)
    }
}

fn open_file_datasource(
    config: &Config,
    ids: Arc<dyn IdGenerator>,
) -> Result<Arc<dyn DataSourceRepository>> {
    let store = DataSourceStore::open(config.store_config(&config.datasource_file), ids)?;
    Ok(Arc::new(store))
}

fn open_memory_datasource(
    _config: &Config,
    ids: Arc<dyn IdGenerator>,
) -> Result<Arc<dyn DataSourceRepository>> {
    Ok(Arc::new(DataSourceStore::in_memory(ids)))
}

fn open_file_namespace(
    config: &Config,
    ids: Arc<dyn IdGenerator>,
) -> Result<Arc<dyn NamespaceRepository>> {
    let store = NamespaceStore::open(config.store_config(&config.namespace_file), ids)?;
    Ok(Arc::new(store))
}

fn open_memory_namespace(
    _config: &Config,
    ids: Arc<dyn IdGenerator>,
) -> Result<Arc<dyn NamespaceRepository>> {
    Ok(Arc::new(NamespaceStore::in_memory(ids)))
}

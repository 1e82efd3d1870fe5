//! Data source repository
//!
//! The repository contract and its store-backed implementation.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::engine::Store;
use crate::error::{Result, StoreError};
use crate::id::{IdGenerator, Uid};
use crate::query::{self, Page, SelectPage};
use crate::status::Status;

use super::{CreateDataSource, DataSource, ListDataSource, SelectDataSource, UpdateDataSource};

/// Storage contract for data sources
///
/// Mutations on an absent uid return `Ok(0)`; callers that need a
/// "not found" error must check existence with `get` first.
pub trait DataSourceRepository: Send + Sync {
    fn create(&self, request: CreateDataSource) -> Result<DataSource>;

    fn get(&self, uid: Uid) -> Result<DataSource>;

    /// Replace the mutable fields; returns affected count
    fn update(&self, request: UpdateDataSource) -> Result<u64>;

    fn update_status(&self, uid: Uid, status: Status) -> Result<u64>;

    /// Remove permanently; returns affected count
    fn delete(&self, uid: Uid) -> Result<u64>;

    fn list(&self, request: &ListDataSource) -> Result<Page<DataSource>>;

    fn select(&self, request: &SelectDataSource) -> Result<SelectPage>;

    /// Flush and release resources
    fn close(&self) -> Result<()>;
}

/// Data source repository over a [`Store`]
pub struct DataSourceStore {
    store: Store<DataSource>,
}

impl DataSourceStore {
    /// Open the file-backed collection
    pub fn open(config: StoreConfig, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        Ok(Self {
            store: Store::open(config, ids)?,
        })
    }

    /// Memory-only collection
    pub fn in_memory(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Store::in_memory(ids),
        }
    }

    /// Underlying store, for flush control
    pub fn store(&self) -> &Store<DataSource> {
        &self.store
    }
}

impl DataSourceRepository for DataSourceStore {
    fn create(&self, request: CreateDataSource) -> Result<DataSource> {
        if request.creator == 0 {
            return Err(StoreError::InvalidArgument(
                "creator is required".to_string(),
            ));
        }

        let record = DataSource {
            namespace_uid: request.namespace_uid,
            kind: request.kind,
            engine: request.engine,
            name: request.name,
            status: request.status,
            endpoint: request.endpoint,
            description: request.description,
            config: request.config,
            metadata: request.metadata,
            creator: request.creator,
            ..DataSource::default()
        };
        Ok(self.store.insert(record))
    }

    fn get(&self, uid: Uid) -> Result<DataSource> {
        self.store.get(uid)
    }

    fn update(&self, request: UpdateDataSource) -> Result<u64> {
        Ok(self.store.update(request.uid, |record| {
            record.name = request.name;
            record.status = request.status;
            record.endpoint = request.endpoint;
            record.description = request.description;
            record.config = request.config;
            record.metadata = request.metadata;
        }))
    }

    fn update_status(&self, uid: Uid, status: Status) -> Result<u64> {
        Ok(self.store.update(uid, |record| record.status = status))
    }

    fn delete(&self, uid: Uid) -> Result<u64> {
        Ok(self.store.remove(uid))
    }

    fn list(&self, request: &ListDataSource) -> Result<Page<DataSource>> {
        Ok(self.store.scan(|records| {
            let matched = records
                .iter()
                .filter(|r| request.filter.matches(r))
                .collect();
            query::paginate(matched, request.sort_by, request.order, request.page)
        }))
    }

    fn select(&self, request: &SelectDataSource) -> Result<SelectPage> {
        Ok(self.store.scan(|records| {
            let matched = records
                .iter()
                .filter(|r| request.filter.matches(r))
                .collect();
            query::select_after(matched, request.order, request.last_uid, request.limit)
        }))
    }

    fn close(&self) -> Result<()> {
        self.store.close()
    }
}

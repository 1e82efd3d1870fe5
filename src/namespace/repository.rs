//! Namespace repository

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::engine::Store;
use crate::error::{Result, StoreError};
use crate::id::{IdGenerator, Uid};
use crate::query::{self, Page, SelectPage};
use crate::status::Status;

use super::{CreateNamespace, ListNamespace, Namespace, SelectNamespace, UpdateNamespace};

/// Storage contract for namespaces
///
/// Name uniqueness is the caller's concern; `get_by_name` returns the first
/// match in sequence order.
pub trait NamespaceRepository: Send + Sync {
    fn create(&self, request: CreateNamespace) -> Result<Namespace>;
    fn get(&self, uid: Uid) -> Result<Namespace>;
    fn get_by_name(&self, name: &str) -> Result<Option<Namespace>>;
    fn update(&self, request: UpdateNamespace) -> Result<u64>;
    fn update_status(&self, uid: Uid, status: Status) -> Result<u64>;
    fn delete(&self, uid: Uid) -> Result<u64>;
    fn list(&self, request: &ListNamespace) -> Result<Page<Namespace>>;
    fn select(&self, request: &SelectNamespace) -> Result<SelectPage>;
    fn close(&self) -> Result<()>;
}

pub struct NamespaceStore {
    store: Store<Namespace>,
}

impl NamespaceStore {
    pub fn open(config: StoreConfig, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        Ok(Self {
            store: Store::open(config, ids)?,
        })
    }

    pub fn in_memory(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Store::in_memory(ids),
        }
    }

    pub fn store(&self) -> &Store<Namespace> {
        &self.store
    }
}

impl NamespaceRepository for NamespaceStore {
    fn create(&self, request: CreateNamespace) -> Result<Namespace> {
        if request.creator == 0 {
            return Err(StoreError::InvalidArgument(
                "creator is required".to_string(),
            ));
        }

        let record = Namespace {
            name: request.name,
            status: request.status,
            metadata: request.metadata,
            creator: request.creator,
            ..Namespace::default()
        };
        Ok(self.store.insert(record))
    }

    fn get(&self, uid: Uid) -> Result<Namespace> {
        self.store.get(uid)
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Namespace>> {
        Ok(self
            .store
            .scan(|records| records.iter().find(|r| r.name == name).cloned()))
    }

    fn update(&self, request: UpdateNamespace) -> Result<u64> {
        Ok(self.store.update(request.uid, |record| {
            record.name = request.name;
            record.status = request.status;
            record.metadata = request.metadata;
        }))
    }

    fn update_status(&self, uid: Uid, status: Status) -> Result<u64> {
        Ok(self.store.update(uid, |record| record.status = status))
    }

    fn delete(&self, uid: Uid) -> Result<u64> {
        Ok(self.store.remove(uid))
    }

    fn list(&self, request: &ListNamespace) -> Result<Page<Namespace>> {
        Ok(self.store.scan(|records| {
            let matched = records
                .iter()
                .filter(|r| request.filter.matches(r))
                .collect();
            query::paginate(matched, request.sort_by, request.order, request.page)
        }))
    }

    fn select(&self, request: &SelectNamespace) -> Result<SelectPage> {
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

//! Data Source Module
//!
//! Data source definitions: where metrics, logs, traces and events are read
//! from. Each record belongs to one namespace.

mod repository;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::Uid;
use crate::query::{matches_keyword, Listable, Order, PageRequest, SelectItem, SortField};
use crate::status::Status;
use crate::storage::Model;

pub use repository::{DataSourceRepository, DataSourceStore};

/// A stored data source definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSource {
    /// Process-local sequence id
    #[serde(rename = "id")]
    pub sequence_id: u64,
    pub uid: Uid,
    pub namespace_uid: Uid,

    /// Signal type, e.g. `metric`, `logs`
    #[serde(rename = "type")]
    pub kind: String,

    /// Backend engine, e.g. `prometheus`, `loki`
    pub engine: String,

    pub name: String,
    pub status: Status,
    pub endpoint: String,
    pub description: String,
    pub config: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,

    /// Always 0: deletes remove the record outright
    pub deleted_at: i64,
    pub creator: Uid,
}

impl Model for DataSource {
    const KIND: &'static str = "data source";

    fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    fn set_sequence_id(&mut self, id: u64) {
        self.sequence_id = id;
    }

    fn uid(&self) -> Uid {
        self.uid
    }

    fn set_uid(&mut self, uid: Uid) {
        self.uid = uid;
    }

    fn stamp_created(&mut self, now: i64) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn stamp_updated(&mut self, now: i64) {
        self.updated_at = now;
    }
}

impl Listable for DataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn select_item(&self) -> SelectItem {
        SelectItem {
            uid: self.uid,
            label: self.name.clone(),
            disabled: !self.status.is_enabled(),
            tooltip: self.description.clone(),
        }
    }
}

/// Fields supplied when creating a data source
#[derive(Debug, Clone, Default)]
pub struct CreateDataSource {
    pub namespace_uid: Uid,
    pub kind: String,
    pub engine: String,
    pub name: String,
    pub status: Status,
    pub endpoint: String,
    pub description: String,
    pub config: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,

    /// Acting principal; must be non-zero
    pub creator: Uid,
}

/// Replacement values for the mutable fields of a data source
#[derive(Debug, Clone, Default)]
pub struct UpdateDataSource {
    pub uid: Uid,
    pub name: String,
    pub status: Status,
    pub endpoint: String,
    pub description: String,
    pub config: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,
}

/// Conjunctive filter; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct DataSourceFilter {
    /// Owning namespace; `None` or `Some(0)` matches all
    pub namespace_uid: Option<Uid>,
    pub status: Status,
    pub kind: String,
    pub engine: String,

    /// Case-insensitive substring of the name
    pub keyword: String,
}

impl DataSourceFilter {
    pub fn matches(&self, record: &DataSource) -> bool {
        if let Some(ns) = self.namespace_uid.filter(|ns| *ns > 0) {
            if record.namespace_uid != ns {
                return false;
            }
        }
        if self.status != Status::Unknown && record.status != self.status {
            return false;
        }
        if !self.kind.is_empty() && record.kind != self.kind {
            return false;
        }
        if !self.engine.is_empty() && record.engine != self.engine {
            return false;
        }
        matches_keyword(&record.name, &self.keyword)
    }
}

/// Offset-paginated listing request
#[derive(Debug, Clone, Default)]
pub struct ListDataSource {
    pub filter: DataSourceFilter,
    pub sort_by: SortField,
    pub order: Order,
    pub page: PageRequest,
}

/// Cursor-paginated selection request
#[derive(Debug, Clone, Default)]
pub struct SelectDataSource {
    pub filter: DataSourceFilter,
    pub order: Order,

    /// Uid of the last item of the previous window
    pub last_uid: Option<Uid>,

    /// Window size; non-positive means the default of 20
    pub limit: i32,
}

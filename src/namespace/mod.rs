//! Namespace Module
//!
//! Namespaces are the owning scope of every other resource.

mod repository;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::Uid;
use crate::query::{matches_keyword, Listable, Order, PageRequest, SelectItem, SortField};
use crate::status::Status;
use crate::storage::Model;

pub use repository::{NamespaceRepository, NamespaceStore};

/// A stored namespace
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    #[serde(rename = "id")]
    pub sequence_id: u64,
    pub uid: Uid,
    pub name: String,
    pub status: Status,
    pub metadata: BTreeMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: i64,
    pub creator: Uid,
}

impl Model for Namespace {
    const KIND: &'static str = "namespace";

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

impl Listable for Namespace {
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
            tooltip: self.metadata.get("description").cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateNamespace {
    pub name: String,
    pub status: Status,
    pub metadata: BTreeMap<String, String>,
    pub creator: Uid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNamespace {
    pub uid: Uid,
    pub name: String,
    pub status: Status,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct NamespaceFilter {
    pub status: Status,
    pub keyword: String,
}

impl NamespaceFilter {
    pub fn matches(&self, record: &Namespace) -> bool {
        if self.status != Status::Unknown && record.status != self.status {
            return false;
        }
        matches_keyword(&record.name, &self.keyword)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListNamespace {
    pub filter: NamespaceFilter,
    pub sort_by: SortField,
    pub order: Order,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default)]
pub struct SelectNamespace {
    pub filter: NamespaceFilter,
    pub order: Order,
    pub last_uid: Option<Uid>,
    pub limit: i32,
}

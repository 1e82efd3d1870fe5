//! Query Module
//!
//! Offset pagination (`paginate`) and keyset pagination (`select_after`)
//! over filtered slices of a record table.
//!
//! Both behave the same regardless of which repository driver holds the
//! records, so callers can switch drivers without seeing different pages.

use std::cmp::Ordering;

use serde::Serialize;

use crate::id::Uid;
use crate::storage::Model;

/// Page size used by `select_after` when the caller gives none
pub const DEFAULT_SELECT_LIMIT: usize = 20;

/// A record that can be listed and projected for selection
pub trait Listable: Model {
    fn name(&self) -> &str;
    fn created_at(&self) -> i64;

    /// Lightweight projection returned by select
    fn select_item(&self) -> SelectItem;
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

/// Orderable fields for offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    SequenceId,
    #[default]
    Uid,
    Name,
    CreatedAt,
}

impl SortField {
    fn compare<M: Listable>(self, a: &M, b: &M) -> Ordering {
        match self {
            SortField::SequenceId => a.sequence_id().cmp(&b.sequence_id()),
            SortField::Uid => a.uid().cmp(&b.uid()),
            SortField::Name => a.name().cmp(b.name()),
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        }
    }
}

/// 1-based page request; a non-positive page or size asks for everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub page: i32,
    pub page_size: i32,
}

impl PageRequest {
    pub fn new(page: i32, page_size: i32) -> Self {
        Self { page, page_size }
    }

    /// Request the whole filtered set as one page
    pub fn all() -> Self {
        Self::default()
    }
}

/// One page of an offset-paginated listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Filtered count before truncation
    pub total: u64,

    /// Page actually served (1 when the request asked for everything)
    pub page: i32,

    /// Page size actually served (the total when everything was requested)
    pub page_size: i32,
}

/// Projection of a record for pickers and typeahead
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectItem {
    pub uid: Uid,
    pub label: String,
    pub disabled: bool,
    pub tooltip: String,
}

/// One window of a keyset-paginated selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectPage {
    pub items: Vec<SelectItem>,

    /// Matching records beyond the cursor, before the limit was applied
    pub total: u64,

    /// Cursor for the next call: uid of the last returned item
    pub last_uid: Option<Uid>,

    pub has_more: bool,
}

/// Case-insensitive substring match; an empty keyword matches everything
pub fn matches_keyword(name: &str, keyword: &str) -> bool {
    keyword.is_empty() || name.to_lowercase().contains(&keyword.to_lowercase())
}

/// Sort `records` and cut out the requested page
pub fn paginate<M: Listable>(
    mut records: Vec<&M>,
    sort_by: SortField,
    order: Order,
    request: PageRequest,
) -> Page<M> {
    records.sort_by(|a, b| order.apply(sort_by.compare(*a, *b)));

    let total = records.len();
    let (page, page_size) = if request.page <= 0 || request.page_size <= 0 {
        (1, i32::try_from(total).unwrap_or(i32::MAX))
    } else {
        (request.page, request.page_size)
    };

    let size = page_size as usize;
    let start = ((page - 1) as usize).saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);

    Page {
        items: records[start..end].iter().map(|r| (*r).clone()).collect(),
        total: total as u64,
        page,
        page_size,
    }
}

/// Keyset pagination by uid
///
/// Records at or before `cursor` in the requested direction are skipped, so
/// chained calls never repeat or miss a record even while the table changes.
/// `has_more` compares the records beyond the cursor with what was returned.
pub fn select_after<M: Listable>(
    mut records: Vec<&M>,
    order: Order,
    cursor: Option<Uid>,
    limit: i32,
) -> SelectPage {
    records.sort_by(|a, b| order.apply(a.uid().cmp(&b.uid())));

    // Generated uids are positive; a zero cursor means "from the start"
    if let Some(cursor) = cursor.filter(|c| *c > 0) {
        records.retain(|r| match order {
            Order::Asc => r.uid() > cursor,
            Order::Desc => r.uid() < cursor,
        });
    }

    let total = records.len();
    let limit = if limit <= 0 {
        DEFAULT_SELECT_LIMIT
    } else {
        limit as usize
    };
    records.truncate(limit);

    SelectPage {
        last_uid: records.last().map(|r| r.uid()),
        has_more: total > records.len(),
        total: total as u64,
        items: records.iter().map(|r| r.select_item()).collect(),
    }
}

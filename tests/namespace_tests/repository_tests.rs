//! Tests for NamespaceStore
//!
//! These tests verify:
//! - Create/get/get_by_name/update/delete semantics
//! - Status and keyword filters in `list` and `select`
//! - Projection of namespaces into select items
//! - Persistence to its own collection file

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sovereign_store::namespace::{
    CreateNamespace, ListNamespace, NamespaceFilter, NamespaceRepository, NamespaceStore,
    SelectNamespace, UpdateNamespace,
};
use sovereign_store::query::{Order, PageRequest, SortField};
use sovereign_store::{SequenceGenerator, Status, StoreConfig, StoreError, Uid};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_memory_repo() -> NamespaceStore {
    NamespaceStore::in_memory(Arc::new(SequenceGenerator::new(10)))
}

fn open_file_repo(dir: &Path, first_uid: Uid) -> NamespaceStore {
    let config = StoreConfig::new(dir, "namespaces.yaml", Duration::from_secs(3600));
    NamespaceStore::open(config, Arc::new(SequenceGenerator::new(first_uid))).unwrap()
}

fn create_request(name: &str, status: Status) -> CreateNamespace {
    let mut metadata = BTreeMap::new();
    metadata.insert("description".to_string(), format!("{} team", name));
    CreateNamespace {
        name: name.to_string(),
        status,
        metadata,
        creator: 3,
    }
}

fn seed(repo: &NamespaceStore) {
    repo.create(create_request("platform", Status::Enabled)).unwrap();
    repo.create(create_request("payments", Status::Disabled)).unwrap();
    repo.create(create_request("search", Status::Enabled)).unwrap();
}

fn list_names(repo: &NamespaceStore, filter: NamespaceFilter) -> Vec<String> {
    repo.list(&ListNamespace {
        filter,
        sort_by: SortField::SequenceId,
        ..ListNamespace::default()
    })
    .unwrap()
    .items
    .into_iter()
    .map(|n| n.name)
    .collect()
}

// =============================================================================
// CRUD Tests
// =============================================================================

#[test]
fn test_create_and_get() {
    let repo = setup_memory_repo();

    let created = repo.create(create_request("platform", Status::Enabled)).unwrap();

    assert_eq!(created.sequence_id, 1);
    assert_eq!(created.uid, 10);
    assert_eq!(created.creator, 3);
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(repo.get(created.uid).unwrap(), created);
}

#[test]
fn test_create_requires_creator() {
    let repo = setup_memory_repo();
    let request = CreateNamespace {
        creator: 0,
        ..create_request("orphan", Status::Enabled)
    };

    let err = repo.create(request).unwrap_err();

    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert!(repo.store().is_empty());
}

#[test]
fn test_get_missing_is_not_found() {
    let repo = setup_memory_repo();

    let err = repo.get(404).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_get_by_name() {
    let repo = setup_memory_repo();
    seed(&repo);

    let found = repo.get_by_name("payments").unwrap().unwrap();

    assert_eq!(found.name, "payments");
    assert_eq!(found.status, Status::Disabled);
    assert!(repo.get_by_name("Payments").unwrap().is_none());
    assert!(repo.get_by_name("missing").unwrap().is_none());
}

#[test]
fn test_get_by_name_returns_first_of_duplicates() {
    let repo = setup_memory_repo();
    let first = repo.create(create_request("dup", Status::Enabled)).unwrap();
    repo.create(create_request("dup", Status::Disabled)).unwrap();

    let found = repo.get_by_name("dup").unwrap().unwrap();

    assert_eq!(found.uid, first.uid);
}

#[test]
fn test_update_replaces_fields() {
    let repo = setup_memory_repo();
    let created = repo.create(create_request("platform", Status::Enabled)).unwrap();

    let affected = repo
        .update(UpdateNamespace {
            uid: created.uid,
            name: "platform-core".to_string(),
            status: Status::Disabled,
            metadata: BTreeMap::new(),
        })
        .unwrap();

    let updated = repo.get(created.uid).unwrap();
    assert_eq!(affected, 1);
    assert_eq!(updated.name, "platform-core");
    assert_eq!(updated.status, Status::Disabled);
    assert!(updated.metadata.is_empty());
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.creator, created.creator);
}

#[test]
fn test_update_missing_affects_nothing() {
    let repo = setup_memory_repo();

    let affected = repo
        .update(UpdateNamespace {
            uid: 99,
            name: "ghost".to_string(),
            ..UpdateNamespace::default()
        })
        .unwrap();

    assert_eq!(affected, 0);
    assert!(!repo.store().is_dirty());
}

#[test]
fn test_update_status() {
    let repo = setup_memory_repo();
    let created = repo.create(create_request("platform", Status::Enabled)).unwrap();

    assert_eq!(repo.update_status(created.uid, Status::Disabled).unwrap(), 1);
    assert_eq!(repo.get(created.uid).unwrap().status, Status::Disabled);
    assert_eq!(repo.update_status(12345, Status::Enabled).unwrap(), 0);
}

#[test]
fn test_delete() {
    let repo = setup_memory_repo();
    let created = repo.create(create_request("platform", Status::Enabled)).unwrap();

    assert_eq!(repo.delete(created.uid).unwrap(), 1);
    assert!(repo.get(created.uid).unwrap_err().is_not_found());
    assert!(repo.get_by_name("platform").unwrap().is_none());
    assert_eq!(repo.delete(created.uid).unwrap(), 0);
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_all_in_sequence_order() {
    let repo = setup_memory_repo();
    seed(&repo);

    let names = list_names(&repo, NamespaceFilter::default());

    assert_eq!(names, ["platform", "payments", "search"]);
}

#[test]
fn test_list_filters_by_status() {
    let repo = setup_memory_repo();
    seed(&repo);

    let enabled = list_names(
        &repo,
        NamespaceFilter {
            status: Status::Enabled,
            ..NamespaceFilter::default()
        },
    );
    let disabled = list_names(
        &repo,
        NamespaceFilter {
            status: Status::Disabled,
            ..NamespaceFilter::default()
        },
    );

    assert_eq!(enabled, ["platform", "search"]);
    assert_eq!(disabled, ["payments"]);
}

#[test]
fn test_list_filters_by_keyword_case_insensitive() {
    let repo = setup_memory_repo();
    seed(&repo);

    let names = list_names(
        &repo,
        NamespaceFilter {
            keyword: "PA".to_string(),
            ..NamespaceFilter::default()
        },
    );

    assert_eq!(names, ["payments"]);
}

#[test]
fn test_list_pages_by_name_descending() {
    let repo = setup_memory_repo();
    seed(&repo);

    let page = repo
        .list(&ListNamespace {
            sort_by: SortField::Name,
            order: Order::Desc,
            page: PageRequest::new(1, 2),
            ..ListNamespace::default()
        })
        .unwrap();

    let names: Vec<_> = page.items.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["search", "platform"]);
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 2);
}

// =============================================================================
// Select Tests
// =============================================================================

#[test]
fn test_select_projects_description_and_status() {
    let repo = setup_memory_repo();
    seed(&repo);

    let page = repo.select(&SelectNamespace::default()).unwrap();

    assert_eq!(page.total, 3);
    assert!(!page.has_more);
    let payments = &page.items[1];
    assert_eq!(payments.label, "payments");
    assert_eq!(payments.tooltip, "payments team");
    assert!(payments.disabled);
    assert!(!page.items[0].disabled);
}

#[test]
fn test_select_tooltip_empty_without_description() {
    let repo = setup_memory_repo();
    repo.create(CreateNamespace {
        name: "bare".to_string(),
        status: Status::Enabled,
        creator: 1,
        ..CreateNamespace::default()
    })
    .unwrap();

    let page = repo.select(&SelectNamespace::default()).unwrap();

    assert_eq!(page.items[0].tooltip, "");
}

#[test]
fn test_select_cursor_chain_with_filter() {
    let repo = setup_memory_repo();
    for i in 0..5 {
        repo.create(create_request(&format!("team-{}", i), Status::Enabled))
            .unwrap();
    }
    repo.create(create_request("other", Status::Enabled)).unwrap();

    let request = |last_uid| SelectNamespace {
        filter: NamespaceFilter {
            keyword: "team".to_string(),
            ..NamespaceFilter::default()
        },
        order: Order::Desc,
        last_uid,
        limit: 2,
    };

    let first = repo.select(&request(None)).unwrap();
    let second = repo.select(&request(first.last_uid)).unwrap();
    let third = repo.select(&request(second.last_uid)).unwrap();

    let labels = |page: &sovereign_store::query::SelectPage| -> Vec<String> {
        page.items.iter().map(|i| i.label.clone()).collect()
    };
    assert_eq!(labels(&first), ["team-4", "team-3"]);
    assert_eq!(labels(&second), ["team-2", "team-1"]);
    assert_eq!(labels(&third), ["team-0"]);
    assert!(first.has_more);
    assert!(second.has_more);
    assert!(!third.has_more);
    assert_eq!(third.last_uid, Some(third.items[0].uid));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persists_to_namespace_file() {
    let temp_dir = TempDir::new().unwrap();

    {
        let repo = open_file_repo(temp_dir.path(), 10);
        seed(&repo);
        repo.close().unwrap();
    }

    assert!(temp_dir.path().join("namespaces.yaml").exists());
    assert!(!temp_dir.path().join("datasources.yaml").exists());

    let repo = open_file_repo(temp_dir.path(), 1_000);
    assert_eq!(repo.store().len(), 3);
    let payments = repo.get_by_name("payments").unwrap().unwrap();
    assert_eq!(payments.status, Status::Disabled);
    assert_eq!(payments.metadata["description"], "payments team");

    let next = repo.create(create_request("ledger", Status::Enabled)).unwrap();
    assert_eq!(next.sequence_id, 4);
    assert_eq!(next.uid, 1_000);
}

#[test]
fn test_reads_hand_written_collection() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("namespaces.yaml"),
        "- id: 2\n  uid: 20\n  name: ops\n  status: 1\n- name: legacy\n  status: 2\n",
    )
    .unwrap();

    let repo = open_file_repo(temp_dir.path(), 500);

    let ops = repo.get(20).unwrap();
    let legacy = repo.get_by_name("legacy").unwrap().unwrap();
    assert_eq!(ops.status, Status::Enabled);
    assert_eq!(legacy.sequence_id, 3);
    assert_eq!(legacy.uid, 500);
    assert_eq!(legacy.status, Status::Disabled);
    assert!(repo.store().is_dirty());
}

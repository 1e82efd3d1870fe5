//! # Sovereign Store
//!
//! Embedded, file-backed persistence for monitoring control-plane
//! configuration (namespaces, data sources), with:
//! - One YAML file per collection, rewritten atomically (tmp + rename)
//! - Debounced background flushing driven by a dirty flag
//! - Multi-reader/exclusive-writer concurrency model
//! - Offset pagination and keyset (cursor) pagination
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Registry (Driver → factory)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          Repositories (DataSourceStore, NamespaceStore)      │
//! │                 filters → query::paginate / select_after     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store<M>                              │
//! │               (RwLock<Table>, IdGenerator)                   │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌───────────────────┐
//!   │     Flusher     │──tick────▶│    FileBacking    │
//!   │ (thread, dirty) │           │ (load, tmp+rename)│
//!   └─────────────────┘           └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod datasource;
pub mod engine;
pub mod id;
pub mod namespace;
pub mod query;
pub mod registry;
pub mod status;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, Driver, StoreConfig};
pub use engine::Store;
pub use error::{Result, StoreError};
pub use id::{IdGenerator, SequenceGenerator, Snowflake, Uid};
pub use registry::Registry;
pub use status::Status;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

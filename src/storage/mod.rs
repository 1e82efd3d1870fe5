//! Storage Module
//!
//! File-backed record tables.
//!
//! ## Responsibilities
//! - Hold one collection in memory as an ordered table
//! - Load the collection file at startup, backfilling missing identifiers
//! - Rewrite the whole file atomically (tmp + rename) when dirty
//! - Run a background flusher that coalesces writes on a fixed tick
//!
//! ## File Format
//! One YAML document per collection, a top-level sequence with one mapping
//! per record:
//! ```text
//! - id: 1                      # sequence id, process-local
//!   uid: 1840325719211446272   # time-ordered unique id
//!   name: prometheus-main
//!   status: 1                  # 0 unknown, 1 enabled, 2 disabled
//!   config: { url: http://... }
//!   created_at: 1760601600     # epoch seconds
//!   ...
//! - id: 2
//!   ...
//! ```
//! An empty file is an empty collection. Anything else that fails to parse
//! refuses to open.

mod file;
mod flusher;
mod table;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::id::Uid;

pub use file::FileBacking;
pub use flusher::Flusher;
pub use table::Table;

/// A record type that can live in a [`Table`]
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable collection kind, used in errors and logs
    const KIND: &'static str;

    fn sequence_id(&self) -> u64;
    fn set_sequence_id(&mut self, id: u64);

    fn uid(&self) -> Uid;
    fn set_uid(&mut self, uid: Uid);

    /// Set both creation and update timestamps
    fn stamp_created(&mut self, now: i64);

    /// Refresh the update timestamp
    fn stamp_updated(&mut self, now: i64);
}

/// Current time as epoch seconds
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

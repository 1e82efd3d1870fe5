//! Engine Module
//!
//! The store that coordinates a record table with its file and flusher.
//!
//! ## Responsibilities
//! - Assign sequence ids, uids and timestamps on create
//! - Serve reads under a shared lock, mutations under an exclusive lock
//! - Mark the table dirty on every mutation
//! - Flush in the background when dirty; flush unconditionally on close

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::id::{IdGenerator, Uid};
use crate::storage::{unix_now, FileBacking, Flusher, Model, Table};

/// A single collection of records
///
/// ## Concurrency Model: Multiple-Reader / Exclusive-Writer
///
/// - **Reads** (get/scan): shared lock on the table, run in parallel
/// - **Mutations** (insert/update/remove): exclusive lock
/// - **Flush**: exclusive lock for the whole tmp write + rename, so a
///   flush never observes a half-applied mutation
///
/// Only one process may own a given file. Two processes pointed at the same
/// path overwrite each other's flushes.
pub struct Store<M: Model> {
    inner: Arc<Inner<M>>,

    /// Background flusher (file-backed stores only)
    flusher: Mutex<Option<Flusher>>,

    closed: AtomicBool,
}

struct Inner<M> {
    table: RwLock<Table<M>>,
    backing: Option<FileBacking>,
    ids: Arc<dyn IdGenerator>,
}

impl<M: Model> Store<M> {
    /// Open or create a file-backed store
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Decode the collection file (a malformed file is fatal)
    /// 3. Backfill missing sequence ids and uids
    /// 4. Start the background flusher
    pub fn open(config: StoreConfig, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        let backing = FileBacking::open(&config)?;
        let records = backing.load::<M>()?;
        let table = Table::from_records(records, ids.as_ref());

        tracing::info!(
            kind = M::KIND,
            path = %backing.path().display(),
            records = table.len(),
            last_sequence = table.last_sequence(),
            "opened store"
        );

        let inner = Arc::new(Inner {
            table: RwLock::new(table),
            backing: Some(backing),
            ids,
        });

        let ticking = Arc::clone(&inner);
        let flusher = Flusher::spawn(
            &format!("flush-{}", M::KIND),
            config.flush_interval,
            move || ticking.tick(),
        )?;

        Ok(Self {
            inner,
            flusher: Mutex::new(Some(flusher)),
            closed: AtomicBool::new(false),
        })
    }

    /// Create a store that lives only in process memory
    pub fn in_memory(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                table: RwLock::new(Table::new()),
                backing: None,
                ids,
            }),
            flusher: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new record
    ///
    /// Identifiers and timestamps on `record` are overwritten.
    pub fn insert(&self, mut record: M) -> M {
        let mut table = self.inner.table.write();
        record.set_sequence_id(table.next_sequence());
        record.set_uid(self.inner.ids.next_id());
        record.stamp_created(unix_now());
        table.push(record.clone());
        record
    }

    /// Apply `change` to the record with `uid`
    ///
    /// Returns the number of affected records (0 or 1).
    pub fn update<F>(&self, uid: Uid, change: F) -> u64
    where
        F: FnOnce(&mut M),
    {
        let mut table = self.inner.table.write();
        let Some(record) = table.find_mut(uid) else {
            return 0;
        };
        change(record);
        record.stamp_updated(unix_now());
        table.mark_dirty();
        1
    }

    /// Hard-delete the record with `uid`
    ///
    /// Returns the number of affected records (0 or 1).
    pub fn remove(&self, uid: Uid) -> u64 {
        let mut table = self.inner.table.write();
        match table.remove(uid) {
            Some(_) => 1,
            None => 0,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch a copy of the record with `uid`
    pub fn get(&self, uid: Uid) -> Result<M> {
        self.inner
            .table
            .read()
            .find(uid)
            .cloned()
            .ok_or(StoreError::NotFound { kind: M::KIND, uid })
    }

    /// Run `f` over all records under the shared lock
    pub fn scan<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[M]) -> R,
    {
        f(self.inner.table.read().records())
    }

    // =========================================================================
    // Durability
    // =========================================================================

    /// Flush if any mutation happened since the last flush attempt
    ///
    /// The dirty flag is cleared before writing. If the write fails the flag
    /// stays clear, so nothing is retried until the next mutation.
    pub fn flush_if_dirty(&self) -> Result<bool> {
        self.inner.flush_if_dirty()
    }

    /// Write the table to disk regardless of the dirty flag
    pub fn persist(&self) -> Result<()> {
        self.inner.persist()
    }

    /// Stop the flusher and run one final unconditional flush
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(flusher) = self.flusher.lock().take() {
            flusher.stop();
        }
        self.inner.persist()?;
        tracing::info!(kind = M::KIND, "closed store");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn is_dirty(&self) -> bool {
        self.inner.table.read().is_dirty()
    }

    pub fn len(&self) -> usize {
        self.inner.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.table.read().is_empty()
    }

    pub fn last_sequence(&self) -> u64 {
        self.inner.table.read().last_sequence()
    }

    /// Canonical file path, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.inner.backing.as_ref().map(|b| b.path())
    }
}

impl<M: Model> Drop for Store<M> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(kind = M::KIND, error = %e, "final flush failed");
        }
    }
}

impl<M: Model> Inner<M> {
    fn flush_if_dirty(&self) -> Result<bool> {
        let mut table = self.table.write();
        if !table.take_dirty() {
            return Ok(false);
        }
        match &self.backing {
            Some(backing) => backing.persist(table.records()).map(|_| true),
            None => Ok(false),
        }
    }

    fn persist(&self) -> Result<()> {
        let mut table = self.table.write();
        table.take_dirty();
        match &self.backing {
            Some(backing) => backing.persist(table.records()),
            None => Ok(()),
        }
    }

    /// One flusher tick: flush when dirty, then look for outside edits
    fn tick(&self) {
        if let Err(e) = self.flush_if_dirty() {
            tracing::warn!(
                kind = M::KIND,
                error = %e,
                "background flush failed; retrying after the next mutation"
            );
        }

        let Some(backing) = &self.backing else {
            return;
        };
        // Hold the read lock so a concurrent persist cannot look external
        let _table = self.table.read();
        if let Some(mtime) = backing.external_change() {
            tracing::warn!(
                kind = M::KIND,
                path = %backing.path().display(),
                modified = ?mtime,
                "collection file changed outside this process; in-memory state is kept and will overwrite it on the next flush"
            );
        }
    }
}

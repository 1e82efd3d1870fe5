//! Record table
//!
//! Ordered in-memory collection plus its sequence counter and dirty flag.
//! The whole table is the unit of locking; callers wrap it in an RwLock.

use crate::id::{IdGenerator, Uid};

use super::Model;

/// In-memory table of records in insertion order
#[derive(Debug)]
pub struct Table<M> {
    records: Vec<M>,

    /// Highest sequence id handed out or loaded
    last_sequence: u64,

    /// Set by every mutation, cleared by a flush attempt
    dirty: bool,
}

impl<M: Model> Table<M> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            last_sequence: 0,
            dirty: false,
        }
    }

    /// Build a table from decoded records
    ///
    /// Records are ordered by sequence id. Any record with a zero sequence id
    /// or uid gets a fresh one; if that happens the table starts dirty so the
    /// assigned identifiers are written back.
    pub fn from_records(mut records: Vec<M>, ids: &dyn IdGenerator) -> Self {
        records.sort_by_key(|r| r.sequence_id());

        let mut last_sequence = records.last().map(|r| r.sequence_id()).unwrap_or(0);
        let mut backfilled = false;

        for record in records.iter_mut() {
            if record.sequence_id() == 0 {
                last_sequence += 1;
                record.set_sequence_id(last_sequence);
                backfilled = true;
            }
            if record.uid() == 0 {
                record.set_uid(ids.next_id());
                backfilled = true;
            }
        }

        Self {
            records,
            last_sequence,
            dirty: backfilled,
        }
    }

    /// Reserve the next sequence id
    pub fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Append a record and mark the table dirty
    pub fn push(&mut self, record: M) {
        self.records.push(record);
        self.dirty = true;
    }

    pub fn find(&self, uid: Uid) -> Option<&M> {
        self.records.iter().find(|r| r.uid() == uid)
    }

    /// Mutable lookup; the caller decides whether the table became dirty
    pub fn find_mut(&mut self, uid: Uid) -> Option<&mut M> {
        self.records.iter_mut().find(|r| r.uid() == uid)
    }

    /// Remove the record with `uid`, preserving the order of the rest
    pub fn remove(&mut self, uid: Uid) -> Option<M> {
        let index = self.records.iter().position(|r| r.uid() == uid)?;
        self.dirty = true;
        Some(self.records.remove(index))
    }

    pub fn records(&self) -> &[M] {
        &self.records
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning its previous value
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<M: Model> Default for Table<M> {
    fn default() -> Self {
        Self::new()
    }
}

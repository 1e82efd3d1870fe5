//! Identifier Module
//!
//! Globally unique, time-ordered record identifiers.
//!
//! ## Responsibilities
//! - Hand out a fresh `Uid` per created record
//! - Stay injectable so tests can use a predictable sequence
//!
//! ## Layout (Snowflake)
//! ```text
//! ┌───┬──────────────────────────┬───────────┬─────────────┐
//! │ 0 │ millis since epoch (41)  │ node (10) │  step (12)  │
//! └───┴──────────────────────────┴───────────┴─────────────┘
//! ```

mod snowflake;

use std::sync::atomic::{AtomicI64, Ordering};

pub use snowflake::Snowflake;

/// External handle of a record
pub type Uid = i64;

/// Source of unique identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier; never returns the same value twice
    fn next_id(&self) -> Uid;
}

/// Deterministic generator: `start`, `start + 1`, ...
///
/// Intended for tests where identifiers must be predictable.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicI64,
}

impl SequenceGenerator {
    pub fn new(start: Uid) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdGenerator for SequenceGenerator {
    fn next_id(&self) -> Uid {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

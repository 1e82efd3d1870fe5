//! Snowflake generator
//!
//! Node-scoped generator: timestamp + node id + per-millisecond step.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use super::{IdGenerator, Uid};
use crate::error::{Result, StoreError};

/// Epoch for the timestamp component (2010-11-04T01:42:54.657Z)
pub const EPOCH_MILLIS: i64 = 1_288_834_974_657;

const NODE_BITS: u32 = 10;
const STEP_BITS: u32 = 12;
const MAX_NODE: u16 = (1 << NODE_BITS) - 1;
const STEP_MASK: i64 = (1 << STEP_BITS) - 1;
const TIME_SHIFT: u32 = NODE_BITS + STEP_BITS;

/// Time-ordered unique id generator
pub struct Snowflake {
    node: i64,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    /// Last timestamp handed out (millis since `EPOCH_MILLIS`)
    last: i64,
    step: i64,
}

impl Snowflake {
    /// Create a generator for `node` (0..=1023)
    pub fn new(node: u16) -> Result<Self> {
        if node > MAX_NODE {
            return Err(StoreError::Config(format!(
                "node id {} out of range 0..={}",
                node, MAX_NODE
            )));
        }
        Ok(Self {
            node: i64::from(node),
            state: Mutex::new(State::default()),
        })
    }

    pub fn node(&self) -> u16 {
        self.node as u16
    }

    fn now() -> i64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        millis - EPOCH_MILLIS
    }
}

impl IdGenerator for Snowflake {
    fn next_id(&self) -> Uid {
        let mut state = self.state.lock();

        // A clock that steps backwards keeps using the last timestamp
        let mut now = Self::now().max(state.last);

        if now == state.last {
            state.step = (state.step + 1) & STEP_MASK;
            if state.step == 0 {
                // Step space exhausted for this millisecond
                while now <= state.last {
                    std::hint::spin_loop();
                    now = Self::now().max(state.last);
                }
            }
        } else {
            state.step = 0;
        }
        state.last = now;

        (now << TIME_SHIFT) | (self.node << STEP_BITS) | state.step
    }
}

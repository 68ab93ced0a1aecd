//! Main-loop stall detection.
//!
//! The loop bumps a [`Heartbeat`] each tick. A watcher thread compares the
//! age of the last beat against a limit that is longer while any widget is
//! inside a blocking fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::widgets::BusyFlag;

/// Loop silence tolerated when nothing is fetching.
pub const IDLE_STALL_MS: u64 = 30_000;
/// Loop silence tolerated while a fetch is in flight.
pub const BUSY_STALL_MS: u64 = 120_000;

#[derive(Debug, Clone, Default)]
pub struct Heartbeat(Arc<AtomicU64>);

impl Heartbeat {
    pub fn beat(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::Relaxed);
    }

    pub fn last_ms(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    /// Long fetch, still inside the busy allowance.
    Fetching,
    Stalled,
}

pub struct Supervisor {
    heartbeat: Heartbeat,
    busy: Vec<BusyFlag>,
}

impl Supervisor {
    pub fn new(heartbeat: Heartbeat, busy: Vec<BusyFlag>) -> Self {
        Self { heartbeat, busy }
    }

    pub fn check(&self, now_ms: u64) -> Verdict {
        let silent_ms = now_ms.saturating_sub(self.heartbeat.last_ms());
        let busy = self.busy.iter().any(BusyFlag::get);
        if silent_ms < IDLE_STALL_MS {
            Verdict::Healthy
        } else if busy && silent_ms < BUSY_STALL_MS {
            Verdict::Fetching
        } else {
            Verdict::Stalled
        }
    }
}

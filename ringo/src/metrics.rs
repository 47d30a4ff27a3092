//! Metrics for ringo sequencers.
//!
//! Lightweight counters for observability. Every sequencer carries one set;
//! reading a snapshot never changes sequencer state.
//!
//! Only the slow paths (barrier waits, lost claim races, timeouts) are counted
//! unconditionally. Per-operation counters (`reservations`, `slots_committed`)
//! sit on the reserve/commit fast path and are recorded only with the
//! `metrics` cargo feature. `slots_reserved` is read off the cursor.

use std::sync::atomic::{ AtomicU64, Ordering };

use crate::sequencer::Sequence;

#[repr(align(128))]
pub struct Metrics {
    pub reservations: AtomicU64,
    pub slots_committed: AtomicU64,
    pub barrier_waits: AtomicU64,
    pub cas_retries: AtomicU64,
    pub timeouts: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            reservations: AtomicU64::new(0),
            slots_committed: AtomicU64::new(0),
            barrier_waits: AtomicU64::new(0),
            cas_retries: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        }
    }

    #[cfg(feature = "metrics")]
    #[inline]
    pub fn record_reserve(&self) {
        self.reservations.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline(always)]
    pub fn record_reserve(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub fn record_commit(&self, slots: u64) {
        self.slots_committed.fetch_add(slots, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline(always)]
    pub fn record_commit(&self, _slots: u64) {}

    #[inline]
    pub fn record_barrier_wait(&self) {
        self.barrier_waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cas_retry(&self) {
        self.cas_retries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters; `cursor` is the owning sequencer's last claimed index.
    pub fn snapshot(&self, cursor: Sequence) -> MetricsSnapshot {
        MetricsSnapshot {
            reservations: self.reservations.load(Ordering::Relaxed),
            slots_reserved: (cursor + 1) as u64,
            slots_committed: self.slots_committed.load(Ordering::Relaxed),
            barrier_waits: self.barrier_waits.load(Ordering::Relaxed),
            cas_retries: self.cas_retries.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub reservations: u64,
    pub slots_reserved: u64,
    pub slots_committed: u64,
    pub barrier_waits: u64,
    pub cas_retries: u64,
    pub timeouts: u64,
}

impl MetricsSnapshot {
    /// Slots reserved but not committed yet. Needs the `metrics` feature to
    /// see commits; without it this equals `slots_reserved`.
    pub fn in_flight(&self) -> u64 {
        self.slots_reserved.saturating_sub(self.slots_committed)
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reserves={} reserved={} committed={} waits={} cas_retries={} timeouts={}",
            self.reservations,
            self.slots_reserved,
            self.slots_committed,
            self.barrier_waits,
            self.cas_retries,
            self.timeouts
        )
    }
}

//! Slot reservation and commit tracking shared by every writer arity.
//!
//! ## Barrier
//!
//! Before claiming `[lower, upper]` a sequencer waits until its dependency's
//! commit marker at `lower & mask` equals `(lower - barrier_adjust) >> shift`:
//!
//! - **Leader** (`barrier_adjust = buffer_size`): the follower must have
//!   drained the slot one full rotation ago, so a writer never laps a reader
//! - **Follower** (`barrier_adjust = 0`): the leader must have published the
//!   slot in the current rotation
//!
//! Every slot of a range is checked, lowest first, each against the rotation
//! it falls in. A single-slot reservation performs exactly one check.
//!
//! A range can span at most one rotation, so every reservation requires
//! `1 <= count <= buffer_size()`. A larger range would need one physical slot
//! retired in two different rotations at once and the barrier would never open.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{ Duration, Instant };

use crate::error::{ Result, RingoError };
use crate::insights;
use crate::metrics::{ Metrics, MetricsSnapshot };
use crate::sequencer::commit::CommitLog;
use crate::sequencer::cursor::Cursor;
use crate::sequencer::wait::{ Backoff, WaitStrategy };
use crate::sequencer::writers::{ MultiWriter, Writers };
use crate::sequencer::{ Role, Sequence };

pub struct Sequencer<W: Writers = MultiWriter, S: WaitStrategy = Backoff> {
    cursor: Cursor,
    committed: Arc<CommitLog>,
    dependency: Arc<CommitLog>,
    role: Role,
    barrier_adjust: Sequence,
    wait: S,
    metrics: Metrics,
    _writers: PhantomData<W>,
}

impl<W: Writers, S: WaitStrategy> Sequencer<W, S> {
    /// Create a sequencer with a fresh commit log of `size` slots, gated on
    /// `dependency`.
    pub fn new(size: usize, role: Role, dependency: Arc<CommitLog>, wait: S) -> Result<Self> {
        let committed = Arc::new(CommitLog::new(size)?);
        Self::with_commit_log(committed, dependency, role, wait)
    }

    /// Create a sequencer that publishes into `committed` and is gated on
    /// `dependency`. Both logs must have the same capacity.
    pub fn with_commit_log(
        committed: Arc<CommitLog>,
        dependency: Arc<CommitLog>,
        role: Role,
        wait: S
    ) -> Result<Self> {
        if committed.capacity() != dependency.capacity() {
            return Err(
                RingoError::config(
                    format!(
                        "Dependency size {} does not match ring size {}",
                        dependency.capacity(),
                        committed.capacity()
                    )
                )
            );
        }

        let barrier_adjust = role.barrier_adjust(committed.capacity());
        Ok(Self {
            cursor: Cursor::default(),
            committed,
            dependency,
            role,
            barrier_adjust,
            wait,
            metrics: Metrics::new(),
            _writers: PhantomData,
        })
    }

    /// Rotation the dependency must have retired at `lower` before it can be claimed.
    #[inline]
    fn gate(&self, lower: Sequence) -> Sequence {
        self.dependency.round(lower - self.barrier_adjust)
    }

    #[inline]
    fn barrier_open(&self, lower: Sequence, upper: Sequence) -> bool {
        (lower..=upper).all(|sequence| self.dependency.is_retired(sequence, self.gate(sequence)))
    }

    /// Reserve `count` contiguous slots and return the highest index claimed.
    ///
    /// The claimed range is `[upper - count + 1, upper]`. Spins (per the wait
    /// strategy) while the dependency has not retired the range; a dependency
    /// that never commits keeps the caller here forever.
    ///
    /// `count` must be in `1..=buffer_size()`; a larger count never returns.
    pub fn reserve(&self, count: usize) -> Sequence {
        debug_assert!(count >= 1, "reserve count must be at least 1");
        debug_assert!(
            count <= self.buffer_size(),
            "reserve count {} exceeds ring size {}",
            count,
            self.buffer_size()
        );
        let count = count as Sequence;

        loop {
            let previous = self.cursor.load();
            let upper = previous + count;
            let lower = previous + 1;

            if !self.barrier_open(lower, upper) {
                self.metrics.record_barrier_wait();
                insights::record_barrier_wait(self.role, lower);
                self.wait.wait_until(|| self.barrier_open(lower, upper));
            }

            if W::claim(&self.cursor, previous, upper) {
                self.metrics.record_reserve();
                return upper;
            }

            self.metrics.record_cas_retry();
            insights::record_contention(self.role, previous);
        }
    }

    /// Reserve `count` slots if the barrier is already open, without waiting.
    ///
    /// Lost claim races are retried; only a closed barrier yields `None`.
    /// A `count` above `buffer_size()` can never be satisfied and yields `None`.
    pub fn try_reserve(&self, count: usize) -> Option<Sequence> {
        debug_assert!(count >= 1, "reserve count must be at least 1");
        if count > self.buffer_size() {
            return None;
        }
        let count = count as Sequence;

        loop {
            let previous = self.cursor.load();
            let upper = previous + count;

            if !self.barrier_open(previous + 1, upper) {
                return None;
            }

            if W::claim(&self.cursor, previous, upper) {
                self.metrics.record_reserve();
                return Some(upper);
            }

            self.metrics.record_cas_retry();
        }
    }

    /// `reserve` bounded by `timeout`. Returns `RingoError::Timeout` if the
    /// barrier stays closed for the whole time box, or
    /// `RingoError::InvalidConfig` if `count` is outside `1..=buffer_size()`.
    /// A timeout too large to represent as an `Instant` waits without bound.
    pub fn reserve_timeout(&self, count: usize, timeout: Duration) -> Result<Sequence> {
        if count == 0 || count > self.buffer_size() {
            return Err(
                RingoError::config(
                    format!("Reserve count {} outside 1..={}", count, self.buffer_size())
                )
            );
        }
        let deadline = Instant::now().checked_add(timeout);
        let expired = || deadline.is_some_and(|deadline| Instant::now() >= deadline);

        loop {
            if let Some(upper) = self.try_reserve(count) {
                return Ok(upper);
            }

            let lower = self.cursor.load() + 1;
            let upper = lower + (count as Sequence) - 1;
            if expired() {
                self.metrics.record_timeout();
                insights::record_timeout(self.role, lower);
                return Err(RingoError::Timeout);
            }

            self.metrics.record_barrier_wait();
            self.wait.wait_until(|| self.barrier_open(lower, upper) || expired());
        }
    }

    /// Mark `[lower, upper]` as committed in the current rotation, opening the
    /// barrier of every sequencer that depends on this one.
    ///
    /// Call only for a range returned by `reserve`, after the payload slots
    /// have been written or read.
    pub fn commit(&self, lower: Sequence, upper: Sequence) {
        debug_assert!(lower <= upper, "commit range [{}, {}] is empty", lower, upper);
        debug_assert!(
            upper <= self.cursor.load(),
            "commit of {} beyond claimed cursor {}",
            upper,
            self.cursor.load()
        );

        for sequence in (lower..=upper).rev() {
            self.committed.mark(sequence);
        }
        self.metrics.record_commit((upper - lower + 1) as u64);
    }

    /// Gate this sequencer on `other`'s commit progress. Wiring-time only:
    /// requires exclusive access, so no reservation can be in flight.
    ///
    /// `Pipeline` hands sequencers out as `Arc`s; rebind through
    /// `Arc::get_mut` before the handle is cloned, or build with
    /// `with_commit_log` instead.
    pub fn set_dependency<W2: Writers, S2: WaitStrategy>(
        &mut self,
        other: &Sequencer<W2, S2>
    ) -> Result<()> {
        if other.buffer_size() != self.buffer_size() {
            return Err(
                RingoError::config(
                    format!(
                        "Dependency size {} does not match ring size {}",
                        other.buffer_size(),
                        self.buffer_size()
                    )
                )
            );
        }
        self.dependency = other.committed.clone();
        Ok(())
    }

    /// Index mask for addressing the external payload array.
    #[inline]
    pub fn mask(&self) -> Sequence {
        self.committed.mask()
    }

    /// Payload array offset of `sequence`.
    #[inline]
    pub fn slot(&self, sequence: Sequence) -> usize {
        (sequence & self.committed.mask()) as usize
    }

    pub fn buffer_size(&self) -> usize {
        self.committed.capacity()
    }

    /// Last index claimed, `SEQUENCE_DEFAULT` before the first reservation.
    pub fn cursor(&self) -> Sequence {
        self.cursor.load()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn commit_log(&self) -> &Arc<CommitLog> {
        &self.committed
    }

    /// Counter snapshot, with `slots_reserved` taken from the cursor.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.cursor.load())
    }
}

impl<W: Writers, S: WaitStrategy> std::fmt::Debug for Sequencer<W, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("role", &self.role)
            .field("writers", &W::NAME)
            .field("buffer_size", &self.buffer_size())
            .field("cursor", &self.cursor())
            .finish()
    }
}

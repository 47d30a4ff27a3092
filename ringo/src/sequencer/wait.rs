//! Wait strategies for the dependency barrier
//!
//! A sequencer whose barrier is closed polls its dependency's commit log
//! until the expected marker shows up. These strategies only decide what the
//! waiting thread does between two polls. None of them park the thread or
//! block on a condition variable: the barrier is a busy-polling design and the
//! strategies trade CPU for latency, nothing more.

use std::hint;
use std::thread;

use crate::constants::{ DEFAULT_SPIN_LIMIT, MAX_SPIN_LIMIT };

/// Trait for strategies that determine how a sequencer waits on its barrier
pub trait WaitStrategy: Copy + Send + Sync + 'static {
    /// Return once `condition` evaluates to true.
    fn wait_until<F>(&self, condition: F) where F: FnMut() -> bool;
}

/// Busy spin wait strategy - lowest latency, highest CPU usage.
/// Burns a full core while waiting; only use it when every waiting thread has
/// a core of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusySpin;

impl WaitStrategy for BusySpin {
    #[inline]
    fn wait_until<F>(&self, mut condition: F) where F: FnMut() -> bool {
        while !condition() {
            hint::spin_loop();
        }
    }
}

/// Yielding wait strategy - gives the processor back to the scheduler between
/// every poll. Safe when there are more waiting threads than cores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yielding;

impl WaitStrategy for Yielding {
    #[inline]
    fn wait_until<F>(&self, mut condition: F) where F: FnMut() -> bool {
        while !condition() {
            thread::yield_now();
        }
    }
}

/// Exponential backoff - spins `1, 2, 4 … 2^spin_limit` pause instructions
/// between polls, then collapses to yielding the thread.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    spin_limit: u32,
}

impl Backoff {
    /// Create a backoff that doubles its spin `spin_limit` times before
    /// yielding. Clamped to `MAX_SPIN_LIMIT`.
    pub const fn new(spin_limit: u32) -> Self {
        let spin_limit = if spin_limit > MAX_SPIN_LIMIT { MAX_SPIN_LIMIT } else { spin_limit };
        Self { spin_limit }
    }

    pub fn spin_limit(&self) -> u32 {
        self.spin_limit
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_LIMIT)
    }
}

impl WaitStrategy for Backoff {
    fn wait_until<F>(&self, mut condition: F) where F: FnMut() -> bool {
        let mut step = 0u32;
        while !condition() {
            if step <= self.spin_limit {
                for _ in 0..1u32 << step {
                    hint::spin_loop();
                }
                step += 1;
            } else {
                thread::yield_now();
            }
        }
    }
}

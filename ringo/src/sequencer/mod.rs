//! Lock-free slot sequencing (LMAX Disruptor style).
//!
//! - `Cursor` - last claimed index of one sequencer
//! - `CommitLog` - per-slot rotation markers, read by dependents
//! - `Sequencer<W, S>` - reserve/commit with a dependency barrier
//! - `SingleWriter` / `MultiWriter` - writer arity of a sequencer
//! - `BusySpin` / `Yielding` / `Backoff` - what a closed barrier does

pub mod cursor;
pub mod commit;
pub mod wait;
pub mod writers;
pub mod sequencer_core;

pub use cursor::Cursor;
pub use commit::CommitLog;
pub use wait::{ Backoff, BusySpin, WaitStrategy, Yielding };
pub use writers::{ MultiWriter, SingleWriter, Writers };
pub use sequencer_core::Sequencer;

/// Absolute slot index; wraps onto the ring through the mask.
pub type Sequence = i64;

/// Position of a sequencer in the two-stage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Writes slots; gated by the follower's drain progress.
    Leader,
    /// Reads slots; gated by the leader's publication progress.
    Follower,
}

impl Role {
    /// Offset subtracted from the first claimed index before the barrier check.
    pub fn barrier_adjust(self, buffer_size: usize) -> Sequence {
        match self {
            Role::Leader => buffer_size as Sequence,
            Role::Follower => 0,
        }
    }

    pub fn is_leader(self) -> bool {
        matches!(self, Role::Leader)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Leader => f.write_str("leader"),
            Role::Follower => f.write_str("follower"),
        }
    }
}

//! Ringo Constants
//!
//! Core constants shared by the sequencers and the pipeline.

use crate::sequencer::Sequence;

/// Cursor value before anything has been claimed, also the initial commit marker.
pub const SEQUENCE_DEFAULT: Sequence = -1;

/// Largest sequence a cursor can reach.
pub const SEQUENCE_MAX: Sequence = Sequence::MAX;

/// Default ring size (must be power of 2)
pub const DEFAULT_RING_SIZE: usize = 4096;

/// Largest accepted ring size (2^30 slots, 4 GiB of commit markers).
pub const MAX_RING_SIZE: usize = 1 << 30;

/// Doublings of the pause loop before `Backoff` falls back to yielding.
pub const DEFAULT_SPIN_LIMIT: u32 = 6;

/// Upper bound for a configured spin limit (2^16 pause instructions per poll).
pub const MAX_SPIN_LIMIT: u32 = 16;

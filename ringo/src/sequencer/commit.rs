//! Per-slot commit markers.
//!
//! Each slot records the ring rotation (`index >> shift`) that last committed
//! it, not just a committed/free flag. Slot indices wrap, so a dependent
//! sequencer compares the marker against the rotation it expects and can tell
//! "retired this lap" from "retired N laps ago".
//!
//! ## Memory Ordering
//!
//! - **mark**: `Release` store, published after the caller finished with the
//!   payload slot
//! - **is_retired**: `Acquire` load, so payload written before `mark` is
//!   visible once the barrier opens
//! - Only the owning sequencer writes its log; any number of dependents read it

use std::sync::atomic::{ AtomicI32, Ordering };

use crate::constants::{ MAX_RING_SIZE, SEQUENCE_DEFAULT };
use crate::error::{ Result, RingoError };
use crate::sequencer::Sequence;

pub struct CommitLog {
    markers: Box<[AtomicI32]>,
    mask: Sequence,
    shift: u32,
}

impl CommitLog {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(RingoError::config("Ring size must be greater than 0"));
        }
        if !size.is_power_of_two() {
            return Err(RingoError::config(format!("Ring size must be power of 2, got {}", size)));
        }
        if size > MAX_RING_SIZE {
            return Err(
                RingoError::config(format!("Ring size {} exceeds maximum {}", size, MAX_RING_SIZE))
            );
        }

        let markers = (0..size)
            .map(|_| AtomicI32::new(SEQUENCE_DEFAULT as i32))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            markers,
            mask: (size - 1) as Sequence,
            shift: size.trailing_zeros(),
        })
    }

    #[inline]
    fn index_of(&self, sequence: Sequence) -> usize {
        (sequence & self.mask) as usize
    }

    /// Rotation of the ring that `sequence` falls in.
    #[inline]
    pub fn round(&self, sequence: Sequence) -> Sequence {
        sequence >> self.shift
    }

    /// Records that `sequence` has been committed in its rotation.
    #[inline]
    pub fn mark(&self, sequence: Sequence) {
        let idx = self.index_of(sequence);
        self.markers[idx].store(self.round(sequence) as i32, Ordering::Release);
    }

    /// True once the slot of `sequence` carries the marker for `round`.
    ///
    /// The cast wraps, so markers stay exact modulo 2^32 rotations.
    #[inline]
    pub fn is_retired(&self, sequence: Sequence, round: Sequence) -> bool {
        self.markers[self.index_of(sequence)].load(Ordering::Acquire) == (round as i32)
    }

    pub fn marker(&self, sequence: Sequence) -> i32 {
        self.markers[self.index_of(sequence)].load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.markers.len()
    }

    pub fn mask(&self) -> Sequence {
        self.mask
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }
}

impl std::fmt::Debug for CommitLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitLog")
            .field("capacity", &self.capacity())
            .field("mask", &self.mask)
            .field("shift", &self.shift)
            .finish()
    }
}

use std::sync::atomic::{ AtomicI64, Ordering };

use crate::constants::SEQUENCE_DEFAULT;
use crate::sequencer::Sequence;

/// Exclusively-owned claim counter of a sequencer.
///
/// Holds the index of the last slot claimed. Padded to its own cache line
/// (128 bytes for Apple Silicon, 64 bytes on x86) so the leader and follower
/// cursors never false-share.
#[repr(align(128))]
pub struct Cursor {
    sequence: AtomicI64,
}

impl Cursor {
    pub fn new(start: Sequence) -> Self {
        Self { sequence: AtomicI64::new(start) }
    }

    #[inline]
    pub fn store(&self, sequence: Sequence) {
        self.sequence.store(sequence, Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> Sequence {
        self.sequence.load(Ordering::Acquire)
    }

    /// Moves the cursor from `current` to `new` if nobody else moved it first.
    #[inline]
    pub fn compare_and_swap(&self, current: Sequence, new: Sequence) -> bool {
        self.sequence
            .compare_exchange_weak(current, new, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(SEQUENCE_DEFAULT)
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("sequence", &self.load()).finish()
    }
}

//! Writer arity of a sequencer.
//!
//! The reservation step is the only thing that differs between a sequencer
//! driven by one thread and one shared by many. Barrier and commit logic are
//! shared; the arity picks how the cursor is advanced.

use crate::sequencer::cursor::Cursor;
use crate::sequencer::Sequence;

pub trait Writers: Send + Sync + 'static {
    const NAME: &'static str;

    /// Advance the cursor from `previous` to `upper`. Returns false if
    /// another writer advanced it first and the reservation must restart.
    fn claim(cursor: &Cursor, previous: Sequence, upper: Sequence) -> bool;
}

/// Exactly one thread ever reserves on the sequencer. The cursor is moved
/// with a plain store; overlapping ranges are prevented by that discipline
/// alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWriter;

impl Writers for SingleWriter {
    const NAME: &'static str = "single";

    #[inline]
    fn claim(cursor: &Cursor, _previous: Sequence, upper: Sequence) -> bool {
        cursor.store(upper);
        true
    }
}

/// Any number of threads reserve concurrently. The cursor is moved with a
/// compare-and-swap and losers retry from a fresh read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiWriter;

impl Writers for MultiWriter {
    const NAME: &'static str = "multi";

    #[inline]
    fn claim(cursor: &Cursor, previous: Sequence, upper: Sequence) -> bool {
        cursor.compare_and_swap(previous, upper)
    }
}

//! Lock-free ring-buffer sequencing (LMAX Disruptor pattern).
//!
//! A leader and a follower share a fixed-size ring without locks. The leader
//! never overwrites a slot the follower has not consumed; the follower never
//! reads a slot the leader has not published. Ringo only tracks reservations
//! and commits; the payload array lives with the caller and is indexed with
//! the sequencer's mask.
//!
//! - `Pipeline<L, F, S>` - leader/follower pair wired to each other
//! - `Sequencer<W, S>` - reserve/commit against one dependency
//! - `SingleWriter` / `MultiWriter` - writer arity per sequencer
//! - `Backoff` / `Yielding` / `BusySpin` - barrier wait strategies
//!
//! ```
//! use ringo::SinglePipeline;
//!
//! let pipeline = SinglePipeline::<ringo::Backoff>::new(1024).unwrap();
//! let mut payload = vec![0u64; pipeline.buffer_size()];
//!
//! let leader = pipeline.leader();
//! let index = leader.reserve(1);
//! payload[leader.slot(index)] = 42;
//! leader.commit(index, index);
//!
//! let follower = pipeline.follower();
//! let index = follower.reserve(1);
//! assert_eq!(payload[follower.slot(index)], 42);
//! follower.commit(index, index);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod pipeline;
pub mod sequencer;

pub use config::PipelineConfig;
pub use constants::{ DEFAULT_RING_SIZE, SEQUENCE_DEFAULT, SEQUENCE_MAX };
pub use error::{ Result, RingoError };
pub use metrics::{ Metrics, MetricsSnapshot };
pub use pipeline::{ FanInPipeline, MultiPipeline, Pipeline, SinglePipeline };
pub use sequencer::{
    Backoff,
    BusySpin,
    CommitLog,
    Cursor,
    MultiWriter,
    Role,
    Sequence,
    Sequencer,
    SingleWriter,
    WaitStrategy,
    Writers,
    Yielding,
};

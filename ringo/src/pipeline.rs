//! Two-stage leader/follower pipeline.
//!
//! The leader publishes into the ring and is gated by the follower's drain
//! progress; the follower consumes and is gated by the leader's publication
//! progress. Each side only holds an `Arc` to the other's commit log, so the
//! 2-cycle carries no ownership cycle and either handle can outlive the other.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::insights;
use crate::sequencer::{
    Backoff,
    CommitLog,
    MultiWriter,
    Role,
    Sequence,
    Sequencer,
    SingleWriter,
    WaitStrategy,
    Writers,
};

/// Single leader thread, single follower thread.
pub type SinglePipeline<S = Backoff> = Pipeline<SingleWriter, SingleWriter, S>;

/// Many leader threads, many follower threads.
pub type MultiPipeline<S = Backoff> = Pipeline<MultiWriter, MultiWriter, S>;

/// Many leader threads draining into one follower thread.
pub type FanInPipeline<S = Backoff> = Pipeline<MultiWriter, SingleWriter, S>;

pub struct Pipeline<L: Writers = MultiWriter, F: Writers = MultiWriter, S: WaitStrategy = Backoff> {
    leader: Arc<Sequencer<L, S>>,
    follower: Arc<Sequencer<F, S>>,
}

impl<L: Writers, F: Writers, S: WaitStrategy + Default> Pipeline<L, F, S> {
    pub fn new(size: usize) -> Result<Self> {
        Self::with_wait_strategy(size, S::default())
    }
}

impl<L: Writers, F: Writers> Pipeline<L, F, Backoff> {
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Self::with_wait_strategy(config.ring_size, Backoff::new(config.spin_limit))
    }
}

impl<L: Writers, F: Writers, S: WaitStrategy> Pipeline<L, F, S> {
    pub fn with_wait_strategy(size: usize, wait: S) -> Result<Self> {
        let leader_log = Arc::new(CommitLog::new(size)?);
        let follower_log = Arc::new(CommitLog::new(size)?);

        let leader = Sequencer::with_commit_log(
            leader_log.clone(),
            follower_log.clone(),
            Role::Leader,
            wait
        )?;
        let follower = Sequencer::with_commit_log(follower_log, leader_log, Role::Follower, wait)?;

        insights::record_pipeline_created(size, L::NAME, F::NAME);
        Ok(Self {
            leader: Arc::new(leader),
            follower: Arc::new(follower),
        })
    }

    pub fn leader(&self) -> &Arc<Sequencer<L, S>> {
        &self.leader
    }

    pub fn follower(&self) -> &Arc<Sequencer<F, S>> {
        &self.follower
    }

    pub fn buffer_size(&self) -> usize {
        self.leader.buffer_size()
    }

    pub fn mask(&self) -> Sequence {
        self.leader.mask()
    }

    /// Split into the `(leader, follower)` handles.
    pub fn into_parts(self) -> (Arc<Sequencer<L, S>>, Arc<Sequencer<F, S>>) {
        (self.leader, self.follower)
    }
}

impl<L: Writers, F: Writers, S: WaitStrategy> std::fmt::Debug for Pipeline<L, F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("leader", &self.leader)
            .field("follower", &self.follower)
            .finish()
    }
}

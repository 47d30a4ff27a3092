//! Insights - Observability for ringo.
//!
//! Structured `tracing` events for the cold paths of the sequencers. Zero-cost
//! when the `tracing` feature is disabled.
//!
//! # Usage
//!
//! ```toml
//! ringo = { version = "0.1", features = ["tracing"] }
//! ```
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Tracy profiler (real-time visualization)
//! ```toml
//! ringo = { version = "0.1", features = ["tracy"] }
//! ```
//! ```rust,ignore
//! ringo::insights::init_tracy()?;
//! ```

use crate::error::Result;
use crate::sequencer::{ Role, Sequence };

/// Install the Tracy layer as the global subscriber (call once at startup)
#[cfg(feature = "tracy")]
pub fn init_tracy() -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(tracing_tracy::TracyLayer::default()),
    )
    .map_err(|e| crate::error::RingoError::config(format!("tracing subscriber: {}", e)))
}

#[cfg(not(feature = "tracy"))]
pub fn init_tracy() -> Result<()> {
    Ok(())
}

/// Record a pipeline being wired
#[cfg(feature = "tracing")]
#[inline]
pub fn record_pipeline_created(size: usize, leader_writers: &'static str, follower_writers: &'static str) {
    tracing::debug!(size, leader_writers, follower_writers, "pipeline created");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_pipeline_created(_size: usize, _leader_writers: &'static str, _follower_writers: &'static str) {}

/// Record a reservation that found the barrier closed
#[cfg(feature = "tracing")]
#[inline]
pub fn record_barrier_wait(role: Role, lower: Sequence) {
    tracing::trace!(%role, lower, "barrier closed");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_barrier_wait(_role: Role, _lower: Sequence) {}

/// Record a lost claim race between writers
#[cfg(feature = "tracing")]
#[inline]
pub fn record_contention(role: Role, previous: Sequence) {
    tracing::trace!(%role, previous, "cursor claim raced");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_contention(_role: Role, _previous: Sequence) {}

/// Record a time-boxed reservation giving up
#[cfg(feature = "tracing")]
#[inline]
pub fn record_timeout(role: Role, lower: Sequence) {
    tracing::warn!(%role, lower, "reservation timed out on barrier");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_timeout(_role: Role, _lower: Sequence) {}

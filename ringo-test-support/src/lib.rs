//! # ringo-test-support
//!
//! Testing infrastructure for the ringo sequencers.
//!
//! ## Components
//!
//! - **StressRunner** - Long-duration fan-in runs with progress reporting
//! - **StressCounters** - Shared counters updated by publisher/drain threads
//! - **StressMetrics** - Snapshot with rates and verdict helpers
//!
//! The cross-thread properties of the pipeline (uniqueness, barrier
//! correctness, wrap-around, lapping prevention, end-to-end load) live in
//! `tests/`.

pub mod stress;

pub use stress::{ print_summary, StressConfig, StressCounters, StressMetrics, StressRunner };

//! Stress testing utilities for long-duration pipeline runs.

use std::sync::atomic::{ AtomicBool, AtomicU64, AtomicUsize, Ordering };
use std::sync::Arc;
use std::thread;
use std::time::{ Duration, Instant };

use rand::Rng;
use ringo::{ FanInPipeline, PipelineConfig, Result };

/// Configuration for stress tests
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Duration to run the test
    pub duration: Duration,
    /// Number of publisher threads on the leader
    pub publishers: usize,
    /// Ring size of the pipeline under test
    pub ring_size: usize,
    /// Largest batch a publisher reserves at once (random 1..=max_batch).
    /// Clamped to `ring_size` at run time; a wider range never clears the barrier.
    pub max_batch: usize,
    /// Print progress every interval
    pub report_interval: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            publishers: 1,
            ring_size: 1024,
            max_batch: 1,
            report_interval: Duration::from_secs(1),
        }
    }
}

impl StressConfig {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(duration_secs),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_publishers(mut self, n: usize) -> Self {
        self.publishers = n;
        self
    }

    pub fn with_ring_size(mut self, size: usize) -> Self {
        self.ring_size = size;
        self
    }

    pub fn with_max_batch(mut self, size: usize) -> Self {
        self.max_batch = size;
        self
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// `max_batch` limited to what one reservation can claim.
    pub fn batch_limit(&self) -> usize {
        self.max_batch.clamp(1, self.ring_size.max(1))
    }
}

/// Metrics collected during stress testing
#[derive(Debug, Clone)]
pub struct StressMetrics {
    pub slots_published: u64,
    pub slots_consumed: u64,
    pub errors: u64,
    pub duration: Duration,
    pub peak_rate: f64,
}

impl StressMetrics {
    pub fn new() -> Self {
        Self {
            slots_published: 0,
            slots_consumed: 0,
            errors: 0,
            duration: Duration::ZERO,
            peak_rate: 0.0,
        }
    }

    pub fn publish_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            (self.slots_published as f64) / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn consume_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            (self.slots_consumed as f64) / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Published slots the drain never saw. Always zero for a clean run.
    pub fn undrained(&self) -> u64 {
        self.slots_published.saturating_sub(self.slots_consumed)
    }

    pub fn passed(&self) -> bool {
        self.errors == 0 && self.undrained() == 0
    }
}

impl Default for StressMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared counters for stress testing
pub struct StressCounters {
    pub published: AtomicU64,
    pub consumed: AtomicU64,
    pub errors: AtomicU64,
    pub running: AtomicBool,
}

impl StressCounters {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_publish(&self, slots: u64) {
        self.published.fetch_add(slots, Ordering::Relaxed);
    }

    pub fn record_consume(&self, slots: u64) {
        self.consumed.fetch_add(slots, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StressMetrics {
        StressMetrics {
            slots_published: self.published.load(Ordering::Relaxed),
            slots_consumed: self.consumed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            duration: Duration::ZERO,
            peak_rate: 0.0,
        }
    }
}

impl Default for StressCounters {
    fn default() -> Self {
        Self {
            published: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }
}

/// Runner for stress tests with progress reporting
pub struct StressRunner {
    config: StressConfig,
    counters: Arc<StressCounters>,
}

impl StressRunner {
    pub fn new(config: StressConfig) -> Self {
        Self {
            config,
            counters: StressCounters::new(),
        }
    }

    pub fn counters(&self) -> Arc<StressCounters> {
        self.counters.clone()
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Run the stress test with progress reporting
    pub fn run_with_progress<F>(&self, test_fn: F) -> StressMetrics
    where
        F: FnOnce(Arc<StressCounters>),
    {
        let counters = self.counters.clone();
        let start = Instant::now();
        let duration = self.config.duration;
        let report_interval = self.config.report_interval;

        // Spawn progress reporter
        let report_counters = counters.clone();
        let reporter = thread::spawn(move || {
            let mut last_published = 0u64;
            let mut peak_rate = 0.0f64;

            while report_counters.is_running() {
                thread::sleep(report_interval);

                let published = report_counters.published.load(Ordering::Relaxed);
                let consumed = report_counters.consumed.load(Ordering::Relaxed);
                let errors = report_counters.errors.load(Ordering::Relaxed);

                let rate = ((published - last_published) as f64) / report_interval.as_secs_f64();
                peak_rate = peak_rate.max(rate);
                last_published = published;

                let elapsed = start.elapsed();
                eprintln!(
                    "[{:>5.1}s] published: {:>10}, consumed: {:>10}, rate: {:>10.0}/s, errors: {}",
                    elapsed.as_secs_f64(),
                    published,
                    consumed,
                    rate,
                    errors
                );

                if elapsed >= duration {
                    report_counters.stop();
                    break;
                }
            }

            peak_rate
        });

        // Run the test
        test_fn(counters.clone());

        // Stop and collect
        counters.stop();
        let peak_rate = reporter.join().unwrap_or(0.0);

        let mut metrics = counters.snapshot();
        metrics.duration = start.elapsed();
        metrics.peak_rate = peak_rate;

        metrics
    }

    /// Drive a fan-in pipeline (multi-writer leader, single drain) until the
    /// configured duration elapses.
    ///
    /// Every publisher writes each slot's absolute index into the payload
    /// array; the drain checks it reads exactly that value back, so an
    /// overwritten (lapped) or unpublished slot shows up as an error.
    pub fn run_fan_in(&self) -> Result<StressMetrics> {
        let config = PipelineConfig::new(self.config.ring_size)?;
        let pipeline = FanInPipeline::from_config(&config)?;
        let (leader, follower) = pipeline.into_parts();
        let payload: Arc<Vec<AtomicU64>> = Arc::new(
            (0..self.config.ring_size).map(|_| AtomicU64::new(u64::MAX)).collect()
        );
        let publishers = self.config.publishers;
        let max_batch = self.config.batch_limit();

        let metrics = self.run_with_progress(|counters| {
            let finished = Arc::new(AtomicUsize::new(0));
            let mut handles = Vec::with_capacity(publishers);

            for _ in 0..publishers {
                let leader = leader.clone();
                let payload = payload.clone();
                let counters = counters.clone();
                let finished = finished.clone();

                handles.push(
                    thread::spawn(move || {
                        let mut rng = rand::thread_rng();
                        while counters.is_running() {
                            let count = rng.gen_range(1..=max_batch);
                            let Ok(upper) = leader.reserve_timeout(count, Duration::from_millis(10)) else {
                                continue;
                            };
                            let lower = upper - (count as i64) + 1;
                            for index in lower..=upper {
                                payload[leader.slot(index)].store(index as u64, Ordering::Relaxed);
                            }
                            leader.commit(lower, upper);
                            counters.record_publish(count as u64);
                        }
                        finished.fetch_add(1, Ordering::Release);
                    })
                );
            }

            let drain_counters = counters.clone();
            let drain_payload = payload.clone();
            let drain_finished = finished.clone();
            let drain = thread::spawn(move || {
                loop {
                    match follower.reserve_timeout(1, Duration::from_millis(10)) {
                        Ok(index) => {
                            let value = drain_payload[follower.slot(index)].load(Ordering::Relaxed);
                            if value != (index as u64) {
                                drain_counters.record_error();
                            }
                            follower.commit(index, index);
                            drain_counters.record_consume(1);
                        }
                        Err(_) => {
                            let done = drain_finished.load(Ordering::Acquire) == publishers;
                            let published = drain_counters.published.load(Ordering::Relaxed);
                            let consumed = drain_counters.consumed.load(Ordering::Relaxed);
                            if done && consumed >= published {
                                break;
                            }
                        }
                    }
                }
            });

            while counters.is_running() {
                thread::sleep(Duration::from_millis(5));
            }
            for handle in handles {
                if handle.join().is_err() {
                    counters.record_error();
                }
            }
            if drain.join().is_err() {
                counters.record_error();
            }
        });

        Ok(metrics)
    }
}

/// Print a summary of stress test results
pub fn print_summary(metrics: &StressMetrics) {
    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║                    STRESS TEST RESULTS                       ║");
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!("║  Duration:        {:>10.2}s                                ║", metrics.duration.as_secs_f64());
    eprintln!("║  Slots Published: {:>10}                                  ║", metrics.slots_published);
    eprintln!("║  Slots Consumed:  {:>10}                                  ║", metrics.slots_consumed);
    eprintln!("║  Publish Rate:    {:>10.0} slots/s                        ║", metrics.publish_rate());
    eprintln!("║  Consume Rate:    {:>10.0} slots/s                        ║", metrics.consume_rate());
    eprintln!("║  Peak Rate:       {:>10.0} slots/s                        ║", metrics.peak_rate);
    eprintln!("║  Undrained:       {:>10}                                  ║", metrics.undrained());
    eprintln!("║  Errors:          {:>10}                                  ║", metrics.errors);
    eprintln!("╚══════════════════════════════════════════════════════════════╝");

    // Verdict
    if metrics.errors > 0 {
        eprintln!("\n❌ FAILED: {} errors detected", metrics.errors);
    } else if metrics.undrained() > 0 {
        eprintln!("\n❌ FAILED: {} published slots never drained", metrics.undrained());
    } else {
        eprintln!("\n✅ PASSED: No errors, every published slot drained");
    }
}

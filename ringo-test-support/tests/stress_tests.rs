//! Fan-in stress runs: several publishers with random batches, one drain.

use ringo_test_support::{ print_summary, StressConfig, StressRunner };
use std::time::Duration;

const TEST_DURATION_SECS: u64 = 2;

#[test]
fn test_fan_in_single_publisher() {
    let config = StressConfig::new(TEST_DURATION_SECS)
        .with_report_interval(Duration::from_millis(500))
        .with_ring_size(1024);

    let metrics = StressRunner::new(config).run_fan_in().unwrap();
    print_summary(&metrics);

    assert!(metrics.slots_published > 0);
    assert!(metrics.passed());
}

#[test]
fn test_fan_in_contended_batches() {
    let config = StressConfig::new(TEST_DURATION_SECS)
        .with_report_interval(Duration::from_millis(500))
        .with_publishers(4)
        .with_ring_size(64)
        .with_max_batch(8);

    let metrics = StressRunner::new(config).run_fan_in().unwrap();
    print_summary(&metrics);

    assert_eq!(metrics.errors, 0, "drain observed a lapped or unpublished slot");
    assert_eq!(metrics.slots_published, metrics.slots_consumed);
}

#[test]
fn test_custom_workload_with_progress() {
    let config = StressConfig::default()
        .with_duration(Duration::from_millis(300))
        .with_report_interval(Duration::from_millis(100));
    let runner = StressRunner::new(config);

    let metrics = runner.run_with_progress(|counters| {
        while counters.is_running() {
            counters.record_publish(1);
            counters.record_consume(1);
            std::thread::sleep(Duration::from_millis(1));
        }
    });

    assert!(metrics.duration >= Duration::from_millis(300));
    assert!(metrics.passed());
}

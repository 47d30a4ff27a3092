//! Average Calculator - Fan-in (4 Publishers, 1 Drain)
//!
//! Each publisher reserves single slots on the multi-writer leader and writes
//! its numbers into a shared payload array; the drain thread consumes through
//! the single-writer follower and calculates the average of all 1M.

use ringo::{ FanInPipeline, PipelineConfig };
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const RING_SIZE: usize = 64 * 1024;
const MESSAGES_PER_PUBLISHER: u64 = 250_000;
const NUM_PUBLISHERS: usize = 4;
const MAX_NUMBER: u64 = MESSAGES_PER_PUBLISHER * (NUM_PUBLISHERS as u64);

fn main() {
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Average Calculator - Fan-in (4 Publishers)            ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    println!("Task: Calculate average of numbers 1 to {}", MAX_NUMBER);

    let config = PipelineConfig::new(RING_SIZE).unwrap();
    let pipeline = FanInPipeline::from_config(&config).unwrap();
    let (leader, follower) = pipeline.into_parts();
    let payload: Arc<Vec<AtomicU64>> = Arc::new((0..RING_SIZE).map(|_| AtomicU64::new(0)).collect());

    let start = Instant::now();

    let mut publishers = vec![];
    for publisher_id in 0..NUM_PUBLISHERS {
        let leader = leader.clone();
        let payload = payload.clone();

        publishers.push(thread::spawn(move || {
            let first = (publisher_id as u64) * MESSAGES_PER_PUBLISHER + 1;
            for number in first..first + MESSAGES_PER_PUBLISHER {
                let index = leader.reserve(1);
                payload[leader.slot(index)].store(number, Ordering::Relaxed);
                leader.commit(index, index);
            }
        }));
    }

    let drain_payload = payload.clone();
    let drain = thread::spawn(move || {
        let mut sum = 0u64;
        for _ in 0..MAX_NUMBER {
            let index = follower.reserve(1);
            sum += drain_payload[follower.slot(index)].load(Ordering::Relaxed);
            follower.commit(index, index);
        }
        (sum, follower.metrics())
    });

    for publisher in publishers {
        publisher.join().unwrap();
    }
    let (sum, drain_metrics) = drain.join().unwrap();
    let elapsed = start.elapsed();

    let average = (sum as f64) / (MAX_NUMBER as f64);
    let expected = ((MAX_NUMBER + 1) as f64) / 2.0;

    println!("Sum:      {}", sum);
    println!("Average:  {:.1} (expected {:.1})", average, expected);
    println!("Leader:   {}", leader.metrics());
    println!("Drain:    {}", drain_metrics);
    println!(
        "Rate:     {:.2} M/s",
        (MAX_NUMBER as f64) / elapsed.as_secs_f64() / 1_000_000.0
    );

    assert_eq!(sum, (MAX_NUMBER * (MAX_NUMBER + 1)) / 2);
    println!("\n✅ PASSED");
}

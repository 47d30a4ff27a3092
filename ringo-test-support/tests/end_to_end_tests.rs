//! Long single-producer/single-consumer run over the full pipeline.

use ringo::{ Backoff, Sequence, SinglePipeline };
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;
use std::thread;

const RING_SIZE: usize = 1024;
const ITERATIONS: u64 = 16_777_216;

#[test]
fn test_end_to_end_sixteen_million_pairs() {
    let pipeline = SinglePipeline::<Backoff>::new(RING_SIZE).unwrap();
    let (leader, follower) = pipeline.into_parts();
    let payload: Arc<Vec<AtomicU64>> = Arc::new(
        (0..RING_SIZE).map(|_| AtomicU64::new(0)).collect()
    );

    let producer = {
        let leader = leader.clone();
        let payload = payload.clone();
        thread::spawn(move || {
            for _ in 0..ITERATIONS {
                let index = leader.reserve(1);
                payload[leader.slot(index)].store(index as u64, Ordering::Relaxed);
                leader.commit(index, index);
            }
        })
    };

    let consumer = {
        let follower = follower.clone();
        let payload = payload.clone();
        thread::spawn(move || {
            let mut mismatches = 0u64;
            let mut expected: Sequence = 0;
            for _ in 0..ITERATIONS {
                let index = follower.reserve(1);
                assert_eq!(index, expected);
                if payload[follower.slot(index)].load(Ordering::Relaxed) != (index as u64) {
                    mismatches += 1;
                }
                follower.commit(index, index);
                expected += 1;
            }
            mismatches
        })
    };

    producer.join().unwrap();
    let mismatches = consumer.join().unwrap();

    assert_eq!(mismatches, 0);
    assert_eq!(leader.metrics().slots_committed, ITERATIONS);
    assert_eq!(follower.metrics().slots_committed, ITERATIONS);
    assert_eq!(leader.cursor(), (ITERATIONS as Sequence) - 1);
    assert_eq!(follower.cursor(), (ITERATIONS as Sequence) - 1);
}

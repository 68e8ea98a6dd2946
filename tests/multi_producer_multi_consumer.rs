//! Scenario 3: three producers sharing one ring, fanning out to three independent consumers.

use std::sync::Arc;
use std::thread;

use weir::{ConsumerSequencer, MultiProducerSequencer, RingBuffer, WeirError};

const RING_SIZE: usize = 1024;
const PRODUCER_THREADS: i64 = 3;
const CONSUMER_THREADS: usize = 3;

fn run(iterations_per_producer: i64) {
    let total = iterations_per_producer * PRODUCER_THREADS;
    let source_data: Arc<RingBuffer<i64, RING_SIZE>> = Arc::new(RingBuffer::new().unwrap());
    let mut producer_sequence = MultiProducerSequencer::new(RING_SIZE as i64);

    let mut consumers: Vec<ConsumerSequencer> = (0..CONSUMER_THREADS)
        .map(|_| ConsumerSequencer::new())
        .collect();
    for consumer in &mut consumers {
        producer_sequence.follow(consumer.sequence());
        consumer.follow(producer_sequence.sequence());
    }
    let producer_sequence = Arc::new(producer_sequence);

    let produce_threads: Vec<_> = (0..PRODUCER_THREADS)
        .map(|_| {
            let producer_sequence = Arc::clone(&producer_sequence);
            let data = Arc::clone(&source_data);
            thread::spawn(move || {
                for _ in 0..iterations_per_producer {
                    let pos = producer_sequence.next(1).unwrap();
                    unsafe { *data.at_mut(pos) = pos };
                    producer_sequence.publish_after(pos, pos - 1).unwrap();
                }
            })
        })
        .collect();

    let consume_threads: Vec<_> = consumers
        .into_iter()
        .map(|consumer| {
            let data = Arc::clone(&source_data);
            thread::spawn(move || {
                let mut next_sequence = consumer.acquire() + 1;
                assert_eq!(next_sequence, 0);
                loop {
                    match consumer.wait_for(next_sequence) {
                        Ok(available_sequence) => {
                            while next_sequence <= available_sequence {
                                assert_eq!(unsafe { *data.at(next_sequence) }, next_sequence);
                                next_sequence += 1;
                            }
                            consumer.publish(available_sequence);
                        }
                        Err(WeirError::Eof) => {
                            assert_eq!(next_sequence, total);
                            break;
                        }
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            })
        })
        .collect();

    for t in produce_threads {
        t.join().unwrap();
    }
    producer_sequence.set_eof();

    for t in consume_threads {
        t.join().unwrap();
    }
}

#[test]
fn multi_producer_multi_consumer_delivers_every_position_exactly_once() {
    run(100_000 / PRODUCER_THREADS as i64);
}

#[test]
#[ignore = "full-scale stress run: cargo test -- --ignored"]
fn multi_producer_multi_consumer_full_scale() {
    run(1_000_000);
}

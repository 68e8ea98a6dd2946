//! Scenario 2: one producer fanning out to three independent consumers, each reading the whole
//! stream in order.

use std::sync::Arc;
use std::thread;

use weir::{ConsumerSequencer, RingBuffer, SingleProducerSequencer, WeirError};

const RING_SIZE: usize = 1024;

fn run(iterations: i64) {
    let source_data: Arc<RingBuffer<i64, RING_SIZE>> = Arc::new(RingBuffer::new().unwrap());
    let mut producer_sequence = SingleProducerSequencer::new(RING_SIZE as i64);

    let mut consumers: Vec<ConsumerSequencer> = (0..3).map(|_| ConsumerSequencer::new()).collect();
    for consumer in &mut consumers {
        producer_sequence.follow(consumer.sequence());
        consumer.follow(producer_sequence.sequence());
    }

    let producer_data = Arc::clone(&source_data);
    let produce_thread = thread::spawn(move || {
        for i in 0..iterations {
            let pos = producer_sequence.next(1).unwrap();
            unsafe { *producer_data.at_mut(pos) = i };
            producer_sequence.publish(pos);
        }
        producer_sequence.set_eof();
    });

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
                            assert_eq!(next_sequence, iterations);
                            break;
                        }
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            })
        })
        .collect();

    produce_thread.join().unwrap();
    for t in consume_threads {
        t.join().unwrap();
    }
}

#[test]
fn one_producer_three_consumers_each_read_the_whole_stream() {
    run(100_000);
}

#[test]
#[ignore = "full-scale stress run: cargo test -- --ignored"]
fn one_producer_three_consumers_full_scale() {
    let _ = tracing_subscriber::fmt::try_init();
    run(30_000_000);
}

//! Computes the average of 1..=1,000,000 across a single producer and single consumer thread,
//! then checks the result against the closed-form answer. A worked version of the claim/write/
//! publish and wait_for/read/publish loops described for the core's end-to-end protocol.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use weir::{ConsumerSequencer, RingBuffer, SingleProducerSequencer, WeirError};

const RING_SIZE: usize = 1024;
const BATCH_SIZE: i64 = 64;
const MAX_NUMBER: u64 = 1_000_000;

fn main() {
    let ring: Arc<RingBuffer<u64, RING_SIZE>> = Arc::new(RingBuffer::new().unwrap());

    let mut producer = SingleProducerSequencer::new(RING_SIZE as i64);
    let mut consumer = ConsumerSequencer::new();
    consumer.follow(producer.sequence());
    producer.follow(consumer.sequence());

    let start = Instant::now();

    let producer_ring = Arc::clone(&ring);
    let producer_thread = thread::spawn(move || {
        let mut number = 1u64;
        while number <= MAX_NUMBER {
            let remaining = MAX_NUMBER - number + 1;
            let batch_len = remaining.min(BATCH_SIZE as u64);
            let end = producer.next(batch_len as i64).unwrap();
            let start_pos = end - batch_len as i64 + 1;
            for (offset, pos) in (start_pos..=end).enumerate() {
                unsafe { *producer_ring.at_mut(pos) = number + offset as u64 };
            }
            producer.publish(end);
            number += batch_len;
        }
        producer.set_eof();
    });

    let consumer_ring = Arc::clone(&ring);
    let consumer_thread = thread::spawn(move || {
        let mut next_sequence = consumer.acquire() + 1;
        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        loop {
            match consumer.wait_for(next_sequence) {
                Ok(available) => {
                    while next_sequence <= available {
                        sum += unsafe { *consumer_ring.at(next_sequence) };
                        count += 1;
                        next_sequence += 1;
                    }
                    consumer.publish(available);
                }
                Err(WeirError::Eof) => break,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        (sum, count)
    });

    producer_thread.join().unwrap();
    let (sum, count) = consumer_thread.join().unwrap();
    let elapsed = start.elapsed();

    let expected_sum = MAX_NUMBER * (MAX_NUMBER + 1) / 2;
    assert_eq!(count, MAX_NUMBER);
    assert_eq!(sum, expected_sum);

    println!("processed {count} numbers in {elapsed:?}");
    println!("average = {:.1}", sum as f64 / count as f64);
}

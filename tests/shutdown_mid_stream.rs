//! Scenario 5: the producer finishes and signals end-of-stream before the consumer has even
//! started; the consumer must still drain everything published before seeing `Eof`.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use weir::{ConsumerSequencer, RingBuffer, SingleProducerSequencer, WeirError};

const RING_SIZE: usize = 1024;
const EVENTS: i64 = 100;

#[test]
fn late_starting_consumer_drains_everything_before_eof() {
    let source_data: Arc<RingBuffer<i64, RING_SIZE>> = Arc::new(RingBuffer::new().unwrap());
    let mut consumer = ConsumerSequencer::new();
    let mut producer = SingleProducerSequencer::new(RING_SIZE as i64);

    consumer.follow(producer.sequence());
    producer.follow(consumer.sequence());

    let producer_data = Arc::clone(&source_data);
    for i in 0..EVENTS {
        let pos = producer.next(1).unwrap();
        unsafe { *producer_data.at_mut(pos) = i };
        producer.publish(pos);
    }
    producer.set_eof();

    // the consumer only starts reading well after the producer is done and has raised EOF
    thread::sleep(Duration::from_millis(20));

    let consumer_data = Arc::clone(&source_data);
    let mut next_sequence = consumer.acquire() + 1;
    assert_eq!(next_sequence, 0);
    let mut read = 0i64;
    loop {
        match consumer.wait_for(next_sequence) {
            Ok(available_sequence) => {
                while next_sequence <= available_sequence {
                    assert_eq!(unsafe { *consumer_data.at(next_sequence) }, next_sequence);
                    next_sequence += 1;
                    read += 1;
                }
                consumer.publish(available_sequence);
            }
            Err(WeirError::Eof) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(read, EVENTS);
    assert!(consumer.eof());
}

//! Weir
//!
//! A lock-free, bounded, multi-producer/multi-consumer ring buffer core in the LMAX Disruptor
//! family. Producers claim slots with an atomic (or, for the single-writer case, plain) cursor
//! advance; consumers follow producers and each other through a dependency graph of published
//! sequences; nobody ever blocks on a lock, condvar, or channel — only on reading another
//! participant's sequence.
//!
//! # Building a pipeline
//!
//! ```
//! use std::sync::Arc;
//! use weir::{ConsumerSequencer, RingBuffer, SingleProducerSequencer};
//!
//! let ring: RingBuffer<u64, 8> = RingBuffer::new().unwrap();
//! let mut producer = SingleProducerSequencer::new(8);
//! let mut consumer = ConsumerSequencer::new();
//!
//! consumer.follow(producer.sequence());
//! producer.follow(consumer.sequence());
//!
//! let pos = producer.next(1).unwrap();
//! unsafe { *ring.at_mut(pos) = 42 };
//! producer.publish(pos);
//!
//! let available = consumer.wait_for(pos).unwrap();
//! assert_eq!(unsafe { *ring.at(available) }, 42);
//! consumer.publish(available);
//! ```
//!
//! # Shutdown
//!
//! There is no explicit close handshake. A producer that is done calls
//! [`SingleProducerSequencer::set_eof`]/[`MultiProducerSequencer::set_eof`]; every consumer
//! following it (directly, or transitively through a consumer chain) unblocks from
//! [`ConsumerSequencer::wait_for`] with [`WeirError::Eof`] once it has drained everything
//! published before shutdown, and propagates its own end-of-stream in turn.

mod barrier;
mod constants;
mod cursor;
mod error;
mod ring_buffer;
mod sequence;

pub mod consumer;
pub mod multi_producer;
pub mod single_producer;

pub use consumer::ConsumerSequencer;
pub use error::{Result, WeirError};
pub use multi_producer::MultiProducerSequencer;
pub use ring_buffer::RingBuffer;
pub use sequence::Sequence;
pub use single_producer::SingleProducerSequencer;

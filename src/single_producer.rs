//! A sequencer for the single-writer case: claim never needs to synchronize with other writers.

use std::cell::Cell;
use std::sync::Arc;

use crate::cursor::EventCursor;
use crate::error::{Result, WeirError};
use crate::sequence::Sequence;

/// Claims and publishes positions for exactly one producer thread.
///
/// Because there is only ever one writer, claiming the next `n` slots needs no atomic
/// read-modify-write: `next_sequence` is a plain [`Cell`], and the only synchronization this type
/// performs is waiting on the consumers it follows before it overwrites a slot they haven't
/// read yet (invariant I3 — a producer never laps a consumer).
pub struct SingleProducerSequencer {
    cursor: EventCursor,
    size: i64,
    next_sequence: Cell<i64>,
    cached_min_sequence: Cell<i64>,
}

impl SingleProducerSequencer {
    /// A sequencer over a ring of the given power-of-two `size`.
    pub fn new(size: i64) -> Self {
        Self {
            cursor: EventCursor::new(),
            size,
            next_sequence: Cell::new(crate::constants::INIT_SEQUENCE),
            cached_min_sequence: Cell::new(crate::constants::INIT_SEQUENCE),
        }
    }

    /// This producer's own sequence, for consumers to follow.
    pub fn sequence(&self) -> Arc<Sequence> {
        self.cursor.sequence()
    }

    /// Add a consumer (or consumer chain's tail) this producer must not lap.
    pub fn follow(&mut self, seq: Arc<Sequence>) {
        self.cursor.follow(seq);
    }

    /// Claim the next `n` slots, blocking until the slowest follower has freed them if the ring
    /// is full. Returns the highest claimed position; the claimed range is
    /// `[returned - n + 1, returned]`.
    ///
    /// Fails with [`WeirError::InvalidClaim`] if `n` is not in `[1, size]`.
    pub fn next(&self, n: i64) -> Result<i64> {
        if n < 1 || n > self.size {
            return Err(WeirError::InvalidClaim {
                requested: n,
                capacity: self.size,
            });
        }

        let next = self.next_sequence.get() + n;
        let wrap_point = next - self.size;

        if wrap_point > self.cached_min_sequence.get() {
            let min = self.cursor.wait_for_min_at_least(wrap_point)?;
            self.cached_min_sequence.set(min);
        }

        self.next_sequence.set(next);
        Ok(next)
    }

    /// Publish positions up to and including `pos`, making them visible to followers.
    pub fn publish(&self, pos: i64) {
        self.cursor.publish(pos);
    }

    /// Raise end-of-stream on this producer's sequence.
    pub fn set_eof(&self) {
        self.cursor.set_eof();
    }
}

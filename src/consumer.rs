//! A sequencer for a consumer: waits on its upstream dependencies, publishes what it has read.

use std::sync::Arc;

use crate::cursor::EventCursor;
use crate::error::{Result, WeirError};
use crate::sequence::Sequence;

/// Tracks one consumer's read position and the dependencies (a producer, or an upstream
/// consumer it chains after) it must wait on to advance.
pub struct ConsumerSequencer {
    cursor: EventCursor,
}

impl ConsumerSequencer {
    /// A consumer with nothing followed yet.
    pub fn new() -> Self {
        Self {
            cursor: EventCursor::new(),
        }
    }

    /// This consumer's own sequence, for downstream consumers or the producer it reads from to
    /// follow in turn.
    pub fn sequence(&self) -> Arc<Sequence> {
        self.cursor.sequence()
    }

    /// Add an upstream dependency (producer or consumer) this consumer reads after.
    pub fn follow(&mut self, seq: Arc<Sequence>) {
        self.cursor.follow(seq);
    }

    /// Block until position `pos` is available from every upstream dependency.
    ///
    /// On [`WeirError::Eof`] this consumer raises its own end-of-stream flag before propagating
    /// the error, so that anything following this consumer in turn also unblocks.
    pub fn wait_for(&self, pos: i64) -> Result<i64> {
        match self.cursor.wait_for(pos) {
            Ok(available) => Ok(available),
            Err(err) => {
                self.cursor.set_eof();
                Err(err)
            }
        }
    }

    /// Publish that this consumer has finished processing up to and including `pos`.
    pub fn publish(&self, pos: i64) {
        self.cursor.publish(pos);
    }

    /// This consumer's last published (fully processed) position.
    pub fn acquire(&self) -> i64 {
        self.cursor.acquire()
    }

    /// Whether this consumer has observed end-of-stream.
    pub fn eof(&self) -> bool {
        self.cursor.eof()
    }
}

impl Default for ConsumerSequencer {
    fn default() -> Self {
        Self::new()
    }
}

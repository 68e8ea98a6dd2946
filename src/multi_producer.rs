//! A sequencer shared by several producer threads: claiming is atomic, publishing is ordered.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::constants::{INIT_SEQUENCE, SPIN_TRIES, YIELD_TRIES};
use crate::cursor::EventCursor;
use crate::error::{Result, WeirError};
use crate::sequence::Sequence;

/// Claims and publishes positions on behalf of any number of producer threads sharing one ring.
///
/// Claiming is the easy part: an atomic `fetch_add` on [`claim_cursor`](Self) hands each caller a
/// disjoint range with no further coordination. Publishing is the hard part, because producers
/// can finish writing their slots in any order, but consumers only ever see a single monotonic
/// published sequence (there is no per-slot "ready" bitmap in this design). So a producer that
/// claimed range `(after_pos, pos]` must wait for whoever claimed up to `after_pos` to publish
/// first, and only then advance the shared published sequence to `pos` itself — publishes form a
/// chain in claim order, even though the writes they guard happen in parallel.
pub struct MultiProducerSequencer {
    cursor: EventCursor,
    size: i64,
    claim_cursor: Sequence,
    cached_min_sequence: AtomicI64,
}

impl MultiProducerSequencer {
    /// A sequencer over a ring of the given power-of-two `size`.
    pub fn new(size: i64) -> Self {
        Self {
            cursor: EventCursor::new(),
            size,
            claim_cursor: Sequence::default(),
            cached_min_sequence: AtomicI64::new(INIT_SEQUENCE),
        }
    }

    /// This sequencer's published sequence, for consumers to follow.
    pub fn sequence(&self) -> Arc<Sequence> {
        self.cursor.sequence()
    }

    /// Add a consumer (or consumer chain's tail) producers must not lap.
    pub fn follow(&mut self, seq: Arc<Sequence>) {
        self.cursor.follow(seq);
    }

    /// Atomically claim the next `n` slots. Returns the highest claimed position; the claimed
    /// range is `[returned - n + 1, returned]`. Safe to call concurrently from any number of
    /// producer threads.
    ///
    /// Fails with [`WeirError::InvalidClaim`] if `n` is not in `[1, size]`.
    pub fn next(&self, n: i64) -> Result<i64> {
        if n < 1 || n > self.size {
            return Err(WeirError::InvalidClaim {
                requested: n,
                capacity: self.size,
            });
        }

        let next = self.claim_cursor.increment_and_get(n);
        let wrap_point = next - self.size;

        let cached = self.cached_min_sequence.load(Ordering::Relaxed);
        if wrap_point > cached {
            let min = self.cursor.wait_for_min_at_least(wrap_point)?;
            // Relaxed: this is a monotonically-improving hint, not a synchronization point — a
            // stale read only costs a redundant barrier scan on the next call, never correctness.
            self.cached_min_sequence.store(min, Ordering::Relaxed);
        }

        Ok(next)
    }

    /// Publish the claimed range ending at `pos`, after waiting for the producer that claimed up
    /// to `after_pos` to publish first. `after_pos` is the highest position returned by the
    /// previous claim this caller's range follows — typically `pos - n`.
    ///
    /// Blocks with a spin / yield / sleep backoff. Fails with [`WeirError::Eof`] if end-of-stream
    /// is raised on this sequence while waiting.
    pub fn publish_after(&self, pos: i64, after_pos: i64) -> Result<()> {
        let own = self.sequence();

        let mut observed = own.acquire();
        if observed >= after_pos {
            own.store(pos);
            return Ok(());
        }

        for _ in 0..SPIN_TRIES {
            std::hint::spin_loop();
            observed = own.acquire();
            if observed >= after_pos || own.eof() {
                break;
            }
        }

        if observed < after_pos && !own.eof() {
            let span = tracing::trace_span!("multi_producer_publish_yield", after_pos).entered();
            for _ in 0..YIELD_TRIES {
                thread::yield_now();
                observed = own.acquire();
                if observed >= after_pos || own.eof() {
                    break;
                }
            }
            drop(span);
        }

        while observed < after_pos && !own.eof() {
            thread::sleep(crate::constants::SLEEP_QUANTUM);
            observed = own.acquire();
        }

        if own.eof() && observed < after_pos {
            return Err(WeirError::Eof);
        }

        own.store(pos);
        Ok(())
    }

    /// Raise end-of-stream on the shared published sequence.
    pub fn set_eof(&self) {
        self.cursor.set_eof();
    }
}

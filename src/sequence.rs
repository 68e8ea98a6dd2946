//! The padded atomic sequence counter every cursor is built around.

#[cfg(not(loom))]
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use crate::constants::{INIT_SEQUENCE, PADDED_SIZE};

/// A monotonic 64-bit counter published by exactly one writer and observed by many readers.
///
/// All writes use release ordering and all reads use acquire ordering, so any writes to ring
/// storage that happen-before a [`store`](Sequence::store) are visible to any thread that
/// observes [`acquire`](Sequence::acquire) returning a value at or past that store. The counter
/// is padded to a full [`PADDED_SIZE`](crate::constants::PADDED_SIZE)-byte line so that two
/// independent sequences never share a cache line and invalidate each other under contention
/// (see `flux`'s `PaddedProducerSequence`/`PaddedConsumerSequence`, which this type generalizes
/// into a single reusable primitive).
///
/// `eof` is a one-shot flag: once set it is never cleared, and it is read with relaxed ordering
/// because it is monotonic and every reader that cares re-checks the counter itself after
/// observing it.
///
/// `repr(align)` needs a literal, so `128` here must track [`PADDED_SIZE`](crate::constants::PADDED_SIZE).
#[repr(align(128))]
pub struct Sequence {
    value: AtomicI64,
    eof: AtomicBool,
    _pad: [u8; PADDED_SIZE - 8 - 1],
}

impl Sequence {
    /// Create a new sequence at the given initial value.
    pub fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
            eof: AtomicBool::new(false),
            _pad: [0; PADDED_SIZE - 8 - 1],
        }
    }

    /// Load the counter with acquire ordering.
    #[inline(always)]
    pub fn acquire(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Store a new value with release ordering.
    ///
    /// Precondition: only the sequence's owning thread calls this.
    #[inline(always)]
    pub fn store(&self, value: i64) {
        self.value.store(value, Ordering::Release);
    }

    /// Atomically add `n` to the counter and return the post-increment value.
    ///
    /// Unlike [`store`](Sequence::store), this may be called concurrently by multiple writers —
    /// it is the sole coordination point among producers sharing a [`MultiProducerSequencer`](crate::MultiProducerSequencer).
    #[inline(always)]
    pub fn increment_and_get(&self, n: i64) -> i64 {
        self.value.fetch_add(n, Ordering::Release) + n
    }

    /// Raise the end-of-stream flag. Idempotent.
    #[inline]
    pub fn set_eof(&self) {
        if !self.eof.swap(true, Ordering::Relaxed) {
            tracing::info!(sequence = self.acquire(), "sequence reached eof");
        }
    }

    /// Whether end-of-stream has been raised.
    #[inline(always)]
    pub fn eof(&self) -> bool {
        self.eof.load(Ordering::Relaxed)
    }
}

impl Default for Sequence {
    /// A fresh sequence starts at [`INIT_SEQUENCE`], i.e. `-1`.
    fn default() -> Self {
        Self::new(INIT_SEQUENCE)
    }
}


/// Model-checked under `loom`: exhaustively explores thread interleavings instead of sampling
/// them, at the cost of only tolerating a handful of iterations per thread. Run with
/// `RUSTFLAGS="--cfg loom" cargo test --release --lib`.
#[cfg(loom)]
mod loom_tests {
    use super::*;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn concurrent_increment_and_get_is_exactly_once() {
        loom::model(|| {
            let seq = Arc::new(Sequence::new(0));
            let threads: Vec<_> = (0..2)
                .map(|_| {
                    let seq = Arc::clone(&seq);
                    thread::spawn(move || {
                        seq.increment_and_get(1);
                    })
                })
                .collect();
            for t in threads {
                t.join().unwrap();
            }
            assert_eq!(seq.acquire(), 2);
        });
    }

    #[test]
    fn store_is_visible_after_acquire_observes_it() {
        loom::model(|| {
            let seq = Arc::new(Sequence::new(INIT_SEQUENCE));
            let payload = Arc::new(loom::sync::atomic::AtomicI64::new(0));

            let writer = {
                let seq = Arc::clone(&seq);
                let payload = Arc::clone(&payload);
                thread::spawn(move || {
                    payload.store(42, Ordering::Relaxed);
                    seq.store(0);
                })
            };

            let reader = thread::spawn(move || {
                if seq.acquire() == 0 {
                    assert_eq!(payload.load(Ordering::Relaxed), 42);
                }
            });

            writer.join().unwrap();
            reader.join().unwrap();
        });
    }
}

//! Weir Performance Constants
//!
//! Core constants used by the sequence, barrier, and sequencer types.

use std::time::Duration;

/// Sentinel value a fresh [`crate::Sequence`](crate::sequence::Sequence) holds before anything
/// has been published through it. The first valid position in any stream is `INIT_SEQUENCE + 1`,
/// i.e. `0`.
pub const INIT_SEQUENCE: i64 = -1;

/// Number of tight-loop re-reads `Barrier::wait_for` performs on a dependency before yielding
/// the thread.
pub const SPIN_TRIES: u32 = 1_000;

/// Number of `thread::yield_now()` calls performed after the spin budget is exhausted, before
/// falling back to sleeping.
pub const YIELD_TRIES: u32 = 10_000;

/// Sleep quantum used once both the spin and yield budgets are exhausted.
pub const SLEEP_QUANTUM: Duration = Duration::from_millis(10);

/// Cache line size for alignment (64 bytes on most CPUs).
pub const CACHE_LINE_SIZE: usize = 64;

/// Padding applied around [`crate::Sequence`](crate::sequence::Sequence)'s counter so two
/// independent sequences never share a cache line. Twice [`CACHE_LINE_SIZE`] rather than one,
/// matching `flux`'s `PaddedProducerSequence`/`PaddedConsumerSequence`, to cover wider cache
/// lines on some non-x86 parts.
pub const PADDED_SIZE: usize = CACHE_LINE_SIZE * 2;

//! A query over a set of upstream sequences: non-blocking min, and blocking wait-for.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::constants::{SPIN_TRIES, YIELD_TRIES};
use crate::error::{Result, WeirError};
use crate::sequence::Sequence;

/// Tracks a cursor's upstream dependencies and lets it ask "has everyone I follow reached
/// position `p` yet?" without blocking (`get_min`) or while blocking (`wait_for`).
///
/// Follow edges are added once at setup, before any wait runs (`follow` is not safe to call
/// concurrently with `wait_for`/`get_min`). A `Barrier` is owned by exactly one cursor and is
/// only ever waited on from that cursor's own thread — concurrent calls to `wait_for` on the
/// *same* `Barrier` are not supported, matching the original `mutable last_min_` field this type
/// is grounded on, which is likewise only sound single-threaded. `last_min` is still an atomic
/// rather than a `Cell`, though: a `Barrier` is embedded in the `EventCursor` that
/// `MultiProducerSequencer` owns, and that sequencer is shared across producer threads behind an
/// `Arc`, which requires every field to be `Sync` even though no two threads ever call into the
/// same `Barrier` concurrently. Relaxed ordering is enough because `last_min` is a pure caching
/// hint re-validated by `scan_min`'s acquire loads, never a synchronization point itself.
pub struct Barrier {
    followed: Vec<Arc<Sequence>>,
    last_min: AtomicI64,
}

impl Barrier {
    /// A barrier with no followed sequences yet.
    pub fn new() -> Self {
        Self {
            followed: Vec::new(),
            last_min: AtomicI64::new(i64::MIN),
        }
    }

    /// Add a sequence to the set this barrier waits on. Idempotent in observable effect: adding
    /// the same sequence twice does not change the computed minimum, it just scans it twice.
    pub fn follow(&mut self, seq: Arc<Sequence>) {
        self.followed.push(seq);
    }

    /// Non-blocking: the minimum of every followed sequence, without waiting for any of them to
    /// move. If the last computed minimum is already known to be past `pos`, that cached value
    /// is returned without re-scanning (`last_min` is a lower bound on the true minimum at the
    /// time it was cached, so this fast path can never return a value the caller hasn't already
    /// been shown is safe).
    pub fn get_min(&self, pos: i64) -> i64 {
        let cached = self.last_min.load(Ordering::Relaxed);
        if cached > pos {
            return cached;
        }
        let min = self.scan_min();
        self.last_min.store(min, Ordering::Relaxed);
        min
    }

    fn scan_min(&self) -> i64 {
        self.followed
            .iter()
            .map(|s| s.acquire())
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Block until every followed sequence has reached at least `pos`, using a spin / yield /
    /// sleep backoff per dependency. Returns the minimum observed across all dependencies once
    /// they have all satisfied the condition.
    ///
    /// If a followed sequence raises EOF while still behind `pos`, this returns
    /// [`WeirError::Eof`]. If it raises EOF exactly as it crosses past `pos`, the wait on that
    /// dependency succeeds immediately with `observed - 1` — truncating to the data that was
    /// fully available before shutdown — and `wait_for` returns that truncated value without
    /// consulting the remaining dependencies. Callers loop on `Eof`, so a return value that is
    /// less than the true minimum across all dependencies is acceptable.
    pub fn wait_for(&self, pos: i64) -> Result<i64> {
        let cached = self.last_min.load(Ordering::Relaxed);
        if cached > pos {
            return Ok(cached);
        }

        let mut min_pos = i64::MAX;
        for dep in &self.followed {
            let observed = self.wait_for_one(dep, pos)?;
            min_pos = min_pos.min(observed);
        }
        let min_pos = if self.followed.is_empty() {
            pos
        } else {
            min_pos
        };
        self.last_min.store(min_pos, Ordering::Relaxed);
        Ok(min_pos)
    }

    /// Non-blocking-scan loop used by the sequencers' wrap-protection: repeatedly calls
    /// [`get_min`](Self::get_min), yielding the thread between calls, until the returned minimum
    /// reaches `pos` — i.e. until whoever is about to have their slot overwritten has consumed
    /// through it. Unlike [`wait_for`](Self::wait_for), this never spins or sleeps, and it fails
    /// with [`WeirError::Eof`] the instant any followed dependency has signalled end-of-stream
    /// without having freed the slot (no truncation: wrap-protection has nothing to drain).
    pub fn wait_for_min_at_least(&self, pos: i64) -> Result<i64> {
        loop {
            let min = self.get_min(pos);
            if min >= pos {
                return Ok(min);
            }
            if self.followed.iter().any(|dep| dep.eof()) {
                return Err(WeirError::Eof);
            }
            thread::yield_now();
        }
    }

    /// Spin, then yield, then sleep until `dep` reaches `pos` or signals EOF.
    fn wait_for_one(&self, dep: &Sequence, pos: i64) -> Result<i64> {
        let mut observed = dep.acquire();
        if observed >= pos {
            return Ok(observed);
        }

        for _ in 0..SPIN_TRIES {
            std::hint::spin_loop();
            observed = dep.acquire();
            if observed >= pos || dep.eof() {
                break;
            }
        }

        if observed < pos && !dep.eof() {
            let span = tracing::trace_span!("barrier_wait_yield", target = pos).entered();
            for _ in 0..YIELD_TRIES {
                thread::yield_now();
                observed = dep.acquire();
                if observed >= pos || dep.eof() {
                    break;
                }
            }
            drop(span);
        }

        if observed < pos && !dep.eof() {
            tracing::debug!(target_pos = pos, "barrier falling back to sleep backoff");
            while observed < pos {
                thread::sleep(crate::constants::SLEEP_QUANTUM);
                observed = dep.acquire();
                if dep.eof() {
                    break;
                }
            }
        }

        if dep.eof() {
            if observed > pos {
                return Ok(observed - 1);
            }
            return Err(WeirError::Eof);
        }

        Ok(observed)
    }
}

impl Default for Barrier {
    fn default() -> Self {
        Self::new()
    }
}

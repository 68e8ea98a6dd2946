//! A participant's own position in the stream, plus the barrier it waits on to advance.

use std::sync::Arc;

use crate::barrier::Barrier;
use crate::error::Result;
use crate::sequence::Sequence;

/// Couples a participant's own published [`Sequence`] with the [`Barrier`] over the sequences it
/// depends on. Producers and consumers are both built around one of these: a producer follows the
/// consumers reading its output (so it never overwrites unread slots), a consumer follows its
/// producer and any upstream consumers it chains after.
pub struct EventCursor {
    own: Arc<Sequence>,
    barrier: Barrier,
}

impl EventCursor {
    /// A cursor starting at [`crate::constants::INIT_SEQUENCE`] with nothing followed yet.
    pub fn new() -> Self {
        Self {
            own: Arc::new(Sequence::default()),
            barrier: Barrier::new(),
        }
    }

    /// This cursor's own published sequence, for other cursors to follow.
    pub fn sequence(&self) -> Arc<Sequence> {
        Arc::clone(&self.own)
    }

    /// Add a dependency this cursor must wait on before advancing past it.
    pub fn follow(&mut self, seq: Arc<Sequence>) {
        self.barrier.follow(seq);
    }

    /// This cursor's last published position.
    #[inline(always)]
    pub fn acquire(&self) -> i64 {
        self.own.acquire()
    }

    /// Publish a new position for this cursor, making everything up to and including `pos`
    /// visible to followers.
    #[inline(always)]
    pub fn publish(&self, pos: i64) {
        self.own.store(pos);
    }

    /// Non-blocking minimum across followed dependencies; see [`Barrier::get_min`].
    pub fn get_min(&self, pos: i64) -> i64 {
        self.barrier.get_min(pos)
    }

    /// Block until every followed dependency has reached `pos`; see [`Barrier::wait_for`].
    pub fn wait_for(&self, pos: i64) -> Result<i64> {
        self.barrier.wait_for(pos)
    }

    /// Yield-loop until every followed dependency's minimum reaches `pos`; see
    /// [`Barrier::wait_for_min_at_least`].
    pub fn wait_for_min_at_least(&self, pos: i64) -> Result<i64> {
        self.barrier.wait_for_min_at_least(pos)
    }

    /// Raise end-of-stream on this cursor's own sequence.
    pub fn set_eof(&self) {
        self.own.set_eof();
    }

    /// Whether this cursor's own sequence has been marked end-of-stream.
    pub fn eof(&self) -> bool {
        self.own.eof()
    }
}

impl Default for EventCursor {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for the Weir disruptor core.

use thiserror::Error;

/// Result type alias for Weir operations.
pub type Result<T> = std::result::Result<T, WeirError>;

/// Error taxonomy for the ring-buffer/sequencer core.
///
/// `Eof` is a control signal rather than a fault: it propagates through the follow graph so
/// that every blocked participant can notice shutdown and terminate. Every callsite in this
/// crate that observes `Eof` from an upstream flags its own [`Sequence::set_eof`](crate::Sequence::set_eof)
/// before re-raising it, so shutdown unwinds the whole dependency graph rather than just one
/// participant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeirError {
    /// `next(n)` was called with `n < 1` or `n > size`.
    #[error("invalid claim: requested {requested} slots, ring capacity is {capacity}")]
    InvalidClaim {
        /// The slot count the caller asked to claim.
        requested: i64,
        /// The ring's capacity.
        capacity: i64,
    },

    /// An upstream sequence in the follow graph has signalled end-of-stream and the waiting
    /// participant has drained everything that was published before it did.
    #[error("end of stream")]
    Eof,

    /// `RingBuffer::<T, N>::new` was called with a capacity that is not a power of two.
    #[error("ring buffer capacity {0} is not a power of two")]
    InvalidCapacity(usize),
}

impl WeirError {
    /// True for errors that represent a clean, expected shutdown rather than programmer error.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_is_recognized() {
        assert!(WeirError::Eof.is_eof());
        assert!(!WeirError::InvalidClaim { requested: 0, capacity: 8 }.is_eof());
        assert!(!WeirError::InvalidCapacity(3).is_eof());
    }

    #[test]
    fn display_messages_are_informative() {
        let err = WeirError::InvalidClaim { requested: 9, capacity: 8 };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains('8'));

        let err = WeirError::InvalidCapacity(3);
        assert!(err.to_string().contains('3'));
    }
}

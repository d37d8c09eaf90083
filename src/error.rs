use thiserror::Error;

/// Errors raised by [`crate::MultiProducerSequencer`] claim operations.
///
/// Mirrors the error taxonomy in `spec.md` §7: `InvalidArgument` is a
/// programming error (fail fast, never retried), `InsufficientCapacity` is
/// an expected flow-control signal for the non-blocking `try_next` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// `next(n)` / `try_next(n)` called with `n < 1`.
    #[error("invalid claim size: {n} (must be >= 1)")]
    InvalidArgument {
        /// The requested claim size that was rejected.
        n: i64,
    },
    /// The claim would overrun the slowest consumer; caller should retry or
    /// apply backpressure.
    #[error("insufficient capacity to claim {requested} sequence(s)")]
    InsufficientCapacity {
        /// The number of sequences the caller tried to claim.
        requested: i64,
    },
}

impl SequencerError {
    /// Returns `true` if the caller may reasonably retry (flow control,
    /// not a programming error).
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientCapacity { .. })
    }
}

/// Errors surfaced while a consumer waits on a [`crate::SequenceBarrier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// `barrier.alert()` was called while waiting; the consumer should
    /// unwind without advancing its gating sequence.
    #[error("sequence barrier alerted")]
    Alert,
}

use crate::Sequence;
use std::sync::Arc;

/// Folds `minimum_so_far` against every sequence in `sequences`, returning
/// the smallest value seen.
///
/// An empty `sequences` returns `minimum_so_far` unchanged — this is the
/// source behavior `spec.md` §9 documents for an empty gating set: before
/// any consumer is registered, producers are gated only by
/// `current - buffer_size <= current`, which is trivially true, so claims
/// run unbounded. Callers that require at least one gating consumer must
/// enforce that at configuration time; this function does not guess.
#[must_use]
pub fn minimum(sequences: &[Arc<Sequence>], minimum_so_far: i64) -> i64 {
    sequences
        .iter()
        .map(|s| s.get())
        .fold(minimum_so_far, i64::min)
}

/// `log2` of a power-of-two `n`.
///
/// # Panics
///
/// Panics if `n` is zero or not a power of two — both are programming
/// errors at the call sites in this crate (`SequencerConfig` validates
/// `buffer_size` before this is ever called).
#[must_use]
pub fn log2(n: usize) -> u32 {
    assert!(n > 0 && n.is_power_of_two(), "log2 requires a power of two, got {n}");
    n.trailing_zeros()
}

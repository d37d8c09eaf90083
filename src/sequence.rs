use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicI64, Ordering};

/// Sentinel value for a sequence that has not yet claimed or published
/// anything — the "pre-first" position (`spec.md` §3).
pub const INITIAL: i64 = -1;

/// A cache-line-padded, atomically updated 64-bit sequence counter.
///
/// Wraps [`crossbeam_utils::CachePadded`] so that a `Sequence` never shares
/// a cache line with a neighboring counter (the cursor, a consumer's gating
/// sequence, the gating-sequence cache) — `spec.md` §9 calls this
/// non-negotiable for performance under contention.
#[derive(Debug)]
pub struct Sequence {
    value: CachePadded<AtomicI64>,
}

impl Sequence {
    /// Creates a new sequence initialized to `INITIAL` (-1).
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(INITIAL)
    }

    /// Creates a new sequence initialized to `value`.
    #[must_use]
    pub fn with_value(value: i64) -> Self {
        Self {
            value: CachePadded::new(AtomicI64::new(value)),
        }
    }

    /// Reads the current value with acquire semantics: prior writes by a
    /// thread that released this sequence become visible here.
    #[inline]
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Writes `value` with release semantics, publishing prior writes by
    /// this thread to any thread that subsequently acquires this sequence.
    #[inline]
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Release);
    }

    /// Atomically sets the value to `new` if the current value equals
    /// `expected`. A full fence on success and failure alike.
    #[inline]
    pub fn compare_and_set(&self, expected: i64, new: i64) -> bool {
        self.value
            .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Atomically adds `delta` and returns the new value.
    #[inline]
    pub fn add_and_get(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, Ordering::AcqRel) + delta
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

use crate::availability::AvailabilityTable;
use crate::backoff::Backoff;
use crate::config::SequencerConfig;
use crate::error::SequencerError;
use crate::invariants::{debug_assert_contiguous_prefix, debug_assert_cursor_monotonic, debug_assert_gating_bound};
use crate::sequence::{Sequence, INITIAL};
use crate::util;
use crate::wait::WaitStrategy;
use std::sync::{Arc, RwLock};

/// Claim/publish coordinator for multiple concurrent producers
/// (`spec.md` §4.3).
///
/// Owns the cursor (highest *claimed*, not highest *published*, sequence),
/// the per-slot [`AvailabilityTable`], and a cache of the slowest gating
/// consumer's sequence. The ring's payload storage is an external
/// collaborator; this type only coordinates which sequence numbers are
/// safe to claim, and which are safe to read.
pub struct MultiProducerSequencer {
    config: SequencerConfig,
    cursor: Arc<Sequence>,
    availability: AvailabilityTable,
    gating_sequences: RwLock<Vec<Arc<Sequence>>>,
    gating_sequence_cache: Sequence,
    wait_strategy: Arc<dyn WaitStrategy>,
}

impl MultiProducerSequencer {
    /// Creates a sequencer for a ring of `config.buffer_size()` slots,
    /// signaling `wait_strategy` whenever a publish completes.
    #[must_use]
    pub fn new(config: SequencerConfig, wait_strategy: Arc<dyn WaitStrategy>) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(buffer_size = config.buffer_size(), "sequencer constructed");
        Self {
            config,
            cursor: Arc::new(Sequence::new()),
            availability: AvailabilityTable::new(config.buffer_size()),
            gating_sequences: RwLock::new(Vec::new()),
            gating_sequence_cache: Sequence::with_value(INITIAL),
            wait_strategy,
        }
    }

    /// Returns a shared handle to the producer cursor, for
    /// [`crate::SequenceBarrier`] construction.
    #[must_use]
    pub fn cursor(&self) -> Arc<Sequence> {
        Arc::clone(&self.cursor)
    }

    /// Returns the configured ring buffer size.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size()
    }

    /// Registers the gating set: consumer sequences producers must not
    /// overrun. Configured once before consumers start, then fixed for
    /// the lifetime of the topology (`spec.md` §3).
    pub fn set_gating_sequences(&self, sequences: Vec<Arc<Sequence>>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(count = sequences.len(), "gating sequences registered");
        *self.gating_sequences.write().unwrap_or_else(std::sync::PoisonError::into_inner) = sequences;
    }

    /// Claims one sequence; equivalent to `next_n(1)`.
    pub fn next(&self) -> i64 {
        // next_n(1) never returns InvalidArgument.
        self.next_n(1).unwrap_or_else(|_| unreachable!("next_n(1) cannot fail"))
    }

    /// Claims `n` contiguous sequences, returning the highest claimed
    /// value; the lowest is `returned - n + 1`. Blocks (cooperatively
    /// parks) until capacity is available — never fails except for an
    /// invalid `n`.
    pub fn next_n(&self, n: i64) -> Result<i64, SequencerError> {
        if n < 1 {
            return Err(SequencerError::InvalidArgument { n });
        }
        let buffer_size = self.config.buffer_size() as i64;
        let mut backoff = Backoff::new();

        loop {
            let current = self.cursor.get();
            let next = current + n;
            let wrap_point = next - buffer_size;
            let cached_gating = self.gating_sequence_cache.get();

            if wrap_point > cached_gating || cached_gating > current {
                let gating = util::minimum(
                    &self.gating_sequences.read().unwrap_or_else(std::sync::PoisonError::into_inner),
                    current,
                );

                if wrap_point > gating {
                    // Cache is left untouched: refreshing it here would make
                    // subsequent producers spin on the same stale value.
                    backoff.snooze();
                    continue;
                }

                #[cfg(feature = "tracing")]
                tracing::trace!(gating, current, "gating-sequence cache refreshed");
                self.gating_sequence_cache.set(gating);
                continue;
            }

            debug_assert_gating_bound!(next, cached_gating, buffer_size);

            if self.cursor.compare_and_set(current, next) {
                debug_assert_cursor_monotonic!(current, next);
                return Ok(next);
            }
        }
    }

    /// Non-blocking `next()`: fails with `InsufficientCapacity` instead of
    /// parking.
    pub fn try_next(&self) -> Result<i64, SequencerError> {
        self.try_next_n(1)
    }

    /// Non-blocking `next_n(n)`.
    pub fn try_next_n(&self, n: i64) -> Result<i64, SequencerError> {
        if n < 1 {
            return Err(SequencerError::InvalidArgument { n });
        }
        let buffer_size = self.config.buffer_size() as i64;

        loop {
            let current = self.cursor.get();
            let next = current + n;
            let wrap_point = next - buffer_size;
            let cached_gating = self.gating_sequence_cache.get();

            if wrap_point > cached_gating || cached_gating > current {
                let gating = util::minimum(
                    &self.gating_sequences.read().unwrap_or_else(std::sync::PoisonError::into_inner),
                    current,
                );

                if wrap_point > gating {
                    return Err(SequencerError::InsufficientCapacity { requested: n });
                }

                #[cfg(feature = "tracing")]
                tracing::trace!(gating, current, "gating-sequence cache refreshed");
                self.gating_sequence_cache.set(gating);
            }

            debug_assert_gating_bound!(next, self.gating_sequence_cache.get(), buffer_size);

            if self.cursor.compare_and_set(current, next) {
                debug_assert_cursor_monotonic!(current, next);
                return Ok(next);
            }
        }
    }

    /// Snapshot predicate: may be conservatively `false` under concurrent
    /// consumer progress, but never incorrectly `true`.
    #[must_use]
    pub fn has_available_capacity(&self, required: i64) -> bool {
        let current = self.cursor.get();
        let buffer_size = self.config.buffer_size() as i64;
        let wrap_point = current + required - buffer_size;
        let cached_gating = self.gating_sequence_cache.get();

        if wrap_point > cached_gating || cached_gating > current {
            let gating = util::minimum(
                &self.gating_sequences.read().unwrap_or_else(std::sync::PoisonError::into_inner),
                current,
            );
            if wrap_point > gating {
                return false;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(gating, current, "gating-sequence cache refreshed");
            self.gating_sequence_cache.set(gating);
        }
        true
    }

    /// Remaining capacity, snapshotting the cursor once (`spec.md` §9:
    /// the source reads it twice, which can return a mildly inconsistent
    /// value; this implementation avoids that).
    #[must_use]
    pub fn remaining_capacity(&self) -> i64 {
        let current = self.cursor.get();
        let consumed = util::minimum(
            &self.gating_sequences.read().unwrap_or_else(std::sync::PoisonError::into_inner),
            current,
        );
        self.config.buffer_size() as i64 - (current - consumed)
    }

    /// Forces the cursor to `sequence`. Used only during initialization or
    /// recovery, never on the hot claim path.
    pub fn claim(&self, sequence: i64) {
        self.cursor.set(sequence);
    }

    /// Marks `sequence` published and signals the wait strategy.
    pub fn publish(&self, sequence: i64) {
        self.mark_as_published(sequence);
        self.wait_strategy.signal_all_when_blocking();
    }

    /// Marks `[lo, hi]` published with a single signal. A no-op if
    /// `lo > hi`.
    pub fn publish_range(&self, lo: i64, hi: i64) {
        if lo > hi {
            return;
        }
        let mut sequence = lo;
        while sequence <= hi {
            self.mark_as_published(sequence);
            sequence += 1;
        }
        self.wait_strategy.signal_all_when_blocking();
    }

    fn mark_as_published(&self, sequence: i64) {
        let index = self.index_of(sequence);
        let flag = self.flag_of(sequence);
        self.availability.mark_published(index, flag);
    }

    /// Per-slot publication test (`spec.md` §4.2).
    #[must_use]
    pub fn is_available(&self, sequence: i64) -> bool {
        let index = self.index_of(sequence);
        let flag = self.flag_of(sequence);
        self.availability.is_published(index, flag)
    }

    /// Scans forward from `lower_bound` up to `available_sequence`,
    /// returning the last sequence for which every sequence in
    /// `[lower_bound, result]` is published. Returns `lower_bound - 1` if
    /// even `lower_bound` is unpublished. Producers publish out of order,
    /// so this scan — not a shared cursor read — is what tells a consumer
    /// how far it may safely read (`spec.md` §4.3).
    #[must_use]
    pub fn get_highest_published_sequence(&self, lower_bound: i64, available_sequence: i64) -> i64 {
        let mut sequence = lower_bound;
        while sequence <= available_sequence {
            if !self.is_available(sequence) {
                let result = sequence - 1;
                debug_assert_contiguous_prefix!(result, lower_bound);
                return result;
            }
            sequence += 1;
        }
        debug_assert_contiguous_prefix!(available_sequence, lower_bound);
        available_sequence
    }

    #[inline]
    fn index_of(&self, sequence: i64) -> usize {
        (sequence & self.config.index_mask()) as usize
    }

    #[inline]
    fn flag_of(&self, sequence: i64) -> i64 {
        sequence >> self.config.index_shift()
    }
}

use crate::dependent::DependentSequence;
use crate::error::WaitError;
use crate::sequence::Sequence;
use crate::sequencer::MultiProducerSequencer;
use crate::wait::{AlertWatcher, WaitStrategy};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A consumer's gate onto the ring (`spec.md` §4.5).
///
/// Combines the producer cursor (an upper bound: nothing past it is even
/// claimed), an optional group of upstream consumer sequences to wait
/// behind, a [`WaitStrategy`], and an alert flag used to unwind a consumer
/// that is parked in `wait_for` during shutdown.
pub struct SequenceBarrier {
    sequencer: Arc<MultiProducerSequencer>,
    cursor: Arc<Sequence>,
    dependent_sequence: DependentSequence,
    wait_strategy: Arc<dyn WaitStrategy>,
    alerted: AtomicBool,
}

impl SequenceBarrier {
    /// Builds a barrier against `sequencer`, waiting behind `dependencies`
    /// (sequences of upstream consumers this one must not overtake). An
    /// empty `dependencies` gates directly on the producer cursor instead
    /// (`spec.md` §4.5).
    #[must_use]
    pub fn new(sequencer: Arc<MultiProducerSequencer>, wait_strategy: Arc<dyn WaitStrategy>, dependencies: Vec<Arc<Sequence>>) -> Self {
        let cursor = sequencer.cursor();
        let dependent_sequence = if dependencies.is_empty() {
            DependentSequence::Cursor(Arc::clone(&cursor))
        } else {
            DependentSequence::Group(dependencies)
        };
        Self {
            sequencer,
            cursor,
            dependent_sequence,
            wait_strategy,
            alerted: AtomicBool::new(false),
        }
    }

    /// Waits until `target` (or higher) is available to read, returning the
    /// highest contiguously published sequence reachable from `target`
    /// (`spec.md` §4.5) — this may be higher than `target` if later
    /// sequences already published, but never skips an unpublished gap.
    ///
    /// # Errors
    ///
    /// Returns `Err(WaitError::Alert)` if `alert()` is called while waiting.
    pub fn wait_for(&self, target: i64) -> Result<i64, WaitError> {
        self.check_alert()?;
        let available = self.wait_strategy.wait_for(target, &self.cursor, &self.dependent_sequence, self)?;
        if available < target {
            // A custom WaitStrategy may support timeouts; the built-in ones
            // never return early, but the contract allows it.
            return Ok(available);
        }
        Ok(self.sequencer.get_highest_published_sequence(target, available))
    }

    /// The consumer's current view of progress: the dependent sequence's
    /// value, not the producer cursor. Deliberately asymmetric with
    /// [`MultiProducerSequencer::cursor`] — producers publish ahead of what
    /// any given consumer has processed (`spec.md` §4.5, §9).
    #[must_use]
    pub fn cursor(&self) -> i64 {
        self.dependent_sequence.get()
    }

    /// Signals an alert: any in-progress or future `wait_for` call returns
    /// `Err(WaitError::Alert)` until `clear_alert()` is called. Used to
    /// unblock a consumer parked in a blocking wait strategy during
    /// shutdown.
    pub fn alert(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!("sequence barrier alerted");
        self.alerted.store(true, Ordering::Release);
        self.wait_strategy.signal_all_when_blocking();
    }

    /// Clears a previously raised alert.
    pub fn clear_alert(&self) {
        self.alerted.store(false, Ordering::Release);
    }
}

impl AlertWatcher for SequenceBarrier {
    fn is_alerted(&self) -> bool {
        self.alerted.load(Ordering::Acquire)
    }
}

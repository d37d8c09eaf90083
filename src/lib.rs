//! ringseq - multi-producer sequencing core for a lock-free ring buffer
//!
//! Coordinates which sequence numbers multiple producers may claim, and
//! which are safe for a consumer to read, without ever touching the ring's
//! payload storage. Built from four cooperating pieces:
//!
//! - [`Sequence`]: a cache-line-padded atomic counter.
//! - [`AvailabilityTable`]: per-slot publication state, so producers that
//!   finish out of order don't force a consumer to wait on the slowest one.
//! - [`MultiProducerSequencer`]: claims ranges via CAS on a shared cursor,
//!   gated against the slowest registered consumer.
//! - [`SequenceBarrier`] + [`WaitStrategy`]: how a consumer waits for new
//!   sequences to become available, pluggable between spin/yield/block.
//!
//! # Example
//!
//! ```
//! use ringseq::{MultiProducerSequencer, SequenceBarrier, SequencerConfig, BusySpinWaitStrategy};
//! use std::sync::Arc;
//!
//! let sequencer = Arc::new(MultiProducerSequencer::new(
//!     SequencerConfig::new(8),
//!     Arc::new(BusySpinWaitStrategy::new()),
//! ));
//!
//! // One producer claims and publishes a single slot.
//! let claimed = sequencer.next();
//! sequencer.publish(claimed);
//!
//! // A consumer with no upstream dependencies waits directly on the cursor.
//! let barrier = SequenceBarrier::new(Arc::clone(&sequencer), Arc::new(BusySpinWaitStrategy::new()), Vec::new());
//! assert_eq!(barrier.wait_for(claimed).unwrap(), claimed);
//! ```

mod availability;
mod backoff;
mod barrier;
mod config;
mod dependent;
mod error;
mod invariants;
mod sequence;
mod sequencer;
mod util;
mod wait;

pub use availability::AvailabilityTable;
pub use backoff::Backoff;
pub use barrier::SequenceBarrier;
pub use config::{SequencerConfig, LARGE_CONFIG, SMALL_CONFIG};
pub use dependent::DependentSequence;
pub use error::{SequencerError, WaitError};
pub use sequence::{Sequence, INITIAL};
pub use sequencer::MultiProducerSequencer;
pub use wait::{
    AlertWatcher, BlockingWaitStrategy, BusySpinWaitStrategy, PhasedBackoffWaitStrategy, SleepingWaitStrategy, WaitStrategy,
    YieldingWaitStrategy,
};

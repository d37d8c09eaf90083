use crate::{util, Sequence};
use std::sync::Arc;

/// The sequence a [`crate::SequenceBarrier`] waits on.
///
/// `spec.md` §4.5: if a barrier is constructed with no dependent consumers,
/// its effective dependent sequence is the producer cursor itself;
/// otherwise it is a grouping view whose `get()` returns the minimum of the
/// underlying sequences, recomputed on every read — the group is not
/// mutable in place.
pub enum DependentSequence {
    /// No upstream consumers: gated directly on the producer cursor.
    Cursor(Arc<Sequence>),
    /// Gated on the minimum of one or more upstream consumer sequences.
    Group(Vec<Arc<Sequence>>),
}

impl DependentSequence {
    /// Reads the current effective value.
    #[must_use]
    pub fn get(&self) -> i64 {
        match self {
            Self::Cursor(cursor) => cursor.get(),
            Self::Group(sequences) => util::minimum(sequences, i64::MAX),
        }
    }
}

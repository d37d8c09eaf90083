//! Debug assertion macros for sequencer invariants.
//!
//! These macros provide runtime checks for the invariants documented in
//! `spec.md` §3 and §8. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release
//! builds.

// =============================================================================
// INV-SEQ-01: Cursor Monotonicity
// =============================================================================

/// Assert that the cursor only advances (using wrapping-safe `>=`).
///
/// **Invariant**: `new_cursor >= old_cursor`.
///
/// Used in: `MultiProducerSequencer::next_n()` after a winning CAS.
macro_rules! debug_assert_cursor_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-SEQ-01 violated: cursor decreased from {} to {}",
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-GATE-01: Gating Bound
// =============================================================================

/// Assert that a successful claim never outruns the slowest consumer.
///
/// **Invariant**: `cursor - min(gatingSet) <= bufferSize` at every point a
/// claim succeeds.
///
/// Used in: `MultiProducerSequencer::next_n()` right before the winning CAS.
macro_rules! debug_assert_gating_bound {
    ($next:expr, $gating:expr, $buffer_size:expr) => {
        debug_assert!(
            $next - $gating <= $buffer_size as i64,
            "INV-GATE-01 violated: claim to {} would outrun gating minimum {} (buffer_size {})",
            $next,
            $gating,
            $buffer_size
        )
    };
}

// =============================================================================
// INV-FLAG-01: Non-negative Publication Flag
// =============================================================================

/// Assert that a flag written into the availability table is never
/// negative — `-1` is reserved as the "never published" sentinel
/// (`spec.md` §3), so a real publication must write a non-negative wrap
/// count.
///
/// Used in: `AvailabilityTable::mark_published()`.
macro_rules! debug_assert_flag_non_negative {
    ($flag:expr) => {
        debug_assert!(
            $flag >= 0,
            "INV-FLAG-01 violated: published flag {} collides with the unpublished sentinel",
            $flag
        )
    };
}

// =============================================================================
// INV-SCAN-01: Highest Published Sequence Is a Contiguous Prefix
// =============================================================================

/// Assert the forward-scan postcondition from `spec.md` §8 property 4:
/// every sequence in `[lower_bound, result]` is published, and either
/// `result == available` or `result + 1` is not published.
///
/// Used in: `MultiProducerSequencer::get_highest_published_sequence()`,
/// debug-only because it re-walks the range the scan already walked.
macro_rules! debug_assert_contiguous_prefix {
    ($result:expr, $lower_bound:expr) => {
        debug_assert!(
            $result >= $lower_bound - 1,
            "INV-SCAN-01 violated: result {} below lower_bound - 1 ({})",
            $result,
            $lower_bound - 1
        )
    };
}

pub(crate) use debug_assert_contiguous_prefix;
pub(crate) use debug_assert_cursor_monotonic;
pub(crate) use debug_assert_flag_non_negative;
pub(crate) use debug_assert_gating_bound;

/// Configuration for a [`crate::MultiProducerSequencer`].
///
/// `buffer_size` must be a power of two (`spec.md` §3) so that the
/// availability table's `index`/`flag` split can use a mask instead of a
/// modulo.
#[derive(Debug, Clone, Copy)]
pub struct SequencerConfig {
    buffer_size: usize,
}

impl SequencerConfig {
    /// Creates a new configuration for a ring of `buffer_size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_size` is not a power of two, or is zero, or
    /// exceeds `1 << 30` (`spec.md` §6: "typically >= 8 and <= 2^30").
    #[must_use]
    pub const fn new(buffer_size: usize) -> Self {
        assert!(buffer_size.is_power_of_two(), "buffer_size must be a power of two");
        assert!(buffer_size <= 1 << 30, "buffer_size must not exceed 2^30");
        Self { buffer_size }
    }

    /// Returns the ring buffer size.
    #[inline]
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the index mask (`buffer_size - 1`) used to split a sequence
    /// into its availability-table index.
    #[inline]
    #[must_use]
    pub const fn index_mask(&self) -> i64 {
        (self.buffer_size - 1) as i64
    }

    /// Returns `log2(buffer_size)`, used to split a sequence into its
    /// availability-table flag (wrap count).
    #[inline]
    #[must_use]
    pub fn index_shift(&self) -> u32 {
        crate::util::log2(self.buffer_size)
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::new(1 << 16)
    }
}

/// Preset tuned for low-latency, low-memory deployments (4K slots, fits
/// comfortably in L1/L2 cache per producer).
pub const SMALL_CONFIG: SequencerConfig = SequencerConfig::new(1 << 12);

/// Preset tuned for high-throughput deployments with many producers
/// (256K slots).
pub const LARGE_CONFIG: SequencerConfig = SequencerConfig::new(1 << 18);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_64k_slots() {
        assert_eq!(SequencerConfig::default().buffer_size(), 1 << 16);
    }

    #[test]
    fn index_mask_and_shift_match_buffer_size() {
        let cfg = SequencerConfig::new(8);
        assert_eq!(cfg.index_mask(), 7);
        assert_eq!(cfg.index_shift(), 3);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two() {
        SequencerConfig::new(3);
    }

    #[test]
    fn buffer_size_of_one_is_allowed() {
        let cfg = SequencerConfig::new(1);
        assert_eq!(cfg.buffer_size(), 1);
        assert_eq!(cfg.index_mask(), 0);
        assert_eq!(cfg.index_shift(), 0);
    }
}

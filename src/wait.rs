use crate::dependent::DependentSequence;
use crate::error::WaitError;
use crate::sequence::Sequence;
use parking_lot::{Condvar, Mutex};
use std::hint;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Anything a [`WaitStrategy`] can poll for cancellation while waiting.
///
/// [`crate::SequenceBarrier`] implements this; `wait_for` implementations
/// must call `check_alert` periodically rather than spinning forever
/// without surfacing cancellation (`spec.md` §4.4).
pub trait AlertWatcher {
    /// Returns `true` if `alert()` has been called and not yet cleared.
    fn is_alerted(&self) -> bool;
    /// Returns `Err(WaitError::Alert)` if alerted, `Ok(())` otherwise.
    fn check_alert(&self) -> Result<(), WaitError> {
        if self.is_alerted() {
            Err(WaitError::Alert)
        } else {
            Ok(())
        }
    }
}

/// A pluggable blocking/spinning strategy a consumer uses to await a
/// target sequence (`spec.md` §4.4).
///
/// Block, spin, yield, or park until `dependent.get() >= target` or the
/// watcher is alerted. Implementations must call `watcher.check_alert()`
/// at every iteration so cancellation surfaces promptly, and must never
/// busy-loop indefinitely without doing so.
pub trait WaitStrategy: Send + Sync + std::fmt::Debug {
    /// Waits until `dependent.get() >= target` or the watcher is alerted.
    ///
    /// Returns the last observed value of `dependent` — this is `>= target`
    /// unless the strategy supports timeouts, in which case it may return
    /// early with a smaller value (none of the variants below do; a custom
    /// implementation may).
    ///
    /// `cursor` is the producer cursor, offered for strategies that want to
    /// report on producer progress independently of the (possibly grouped)
    /// dependent sequence; none of the built-in variants need it.
    fn wait_for(
        &self,
        target: i64,
        cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError>;

    /// Wakes any waiters parked on this strategy. A no-op for strategies
    /// that never block (`spec.md` §4.4).
    fn signal_all_when_blocking(&self);
}

/// Mutex + condition variable. Lowest CPU usage, highest latency; requires
/// a producer to call `signal_all_when_blocking` after publishing.
///
/// Uses `parking_lot` rather than `std::sync`, matching
/// `bugthesystem-Flux`'s `disruptor::wait_strategy::BlockingWaitStrategy` —
/// the pack's own precedent for this exact Disruptor-style wait strategy
/// set. `parking_lot`'s guards never poison, so there's no `unwrap` dance
/// on lock acquisition.
#[derive(Debug, Default)]
pub struct BlockingWaitStrategy {
    lock: Mutex<()>,
    condvar: Condvar,
}

impl BlockingWaitStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaitStrategy for BlockingWaitStrategy {
    fn wait_for(
        &self,
        target: i64,
        _cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError> {
        watcher.check_alert()?;
        let mut available = dependent.get();
        if available >= target {
            return Ok(available);
        }

        let mut guard = self.lock.lock();
        loop {
            watcher.check_alert()?;
            available = dependent.get();
            if available >= target {
                return Ok(available);
            }
            // Bounded wait so a missed signal still re-checks the alert flag
            // promptly instead of blocking forever.
            self.condvar.wait_for(&mut guard, Duration::from_millis(1));
        }
    }

    fn signal_all_when_blocking(&self) {
        let _guard = self.lock.lock();
        self.condvar.notify_all();
    }
}

/// Spin with PAUSE hints, then park for 1ns increments once the spin
/// budget is exhausted. Low CPU, moderate latency.
#[derive(Debug, Default)]
pub struct SleepingWaitStrategy;

impl SleepingWaitStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WaitStrategy for SleepingWaitStrategy {
    fn wait_for(
        &self,
        target: i64,
        _cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError> {
        let mut backoff = crate::backoff::Backoff::new();
        loop {
            watcher.check_alert()?;
            let available = dependent.get();
            if available >= target {
                return Ok(available);
            }
            if backoff.is_completed() {
                thread::sleep(Duration::from_nanos(1));
            } else {
                backoff.snooze();
            }
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Spin with a cooperative `yield_now` once a short spin budget is
/// exhausted. Medium CPU, low latency when producers roughly match core
/// count.
#[derive(Debug, Default)]
pub struct YieldingWaitStrategy;

impl YieldingWaitStrategy {
    const SPIN_TRIES: u32 = 100;

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WaitStrategy for YieldingWaitStrategy {
    fn wait_for(
        &self,
        target: i64,
        _cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError> {
        let mut tries = Self::SPIN_TRIES;
        loop {
            watcher.check_alert()?;
            let available = dependent.get();
            if available >= target {
                return Ok(available);
            }
            if tries == 0 {
                thread::yield_now();
            } else {
                tries -= 1;
                hint::spin_loop();
            }
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Pure spin, no yield or park. Highest CPU, lowest latency.
#[derive(Debug, Default)]
pub struct BusySpinWaitStrategy;

impl BusySpinWaitStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WaitStrategy for BusySpinWaitStrategy {
    fn wait_for(
        &self,
        target: i64,
        _cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError> {
        loop {
            watcher.check_alert()?;
            let available = dependent.get();
            if available >= target {
                return Ok(available);
            }
            hint::spin_loop();
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Spin for `spin_duration`, then yield for `yield_duration`, then
/// delegate to `inner` (typically [`BlockingWaitStrategy`]). Tunable
/// tradeoff between the pure-spin variants' latency and the blocking
/// variant's CPU usage.
pub struct PhasedBackoffWaitStrategy {
    spin_duration: Duration,
    yield_duration: Duration,
    inner: Arc<dyn WaitStrategy>,
}

impl std::fmt::Debug for PhasedBackoffWaitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhasedBackoffWaitStrategy")
            .field("spin_duration", &self.spin_duration)
            .field("yield_duration", &self.yield_duration)
            .finish_non_exhaustive()
    }
}

impl PhasedBackoffWaitStrategy {
    #[must_use]
    pub fn new(spin_duration: Duration, yield_duration: Duration, inner: Arc<dyn WaitStrategy>) -> Self {
        Self {
            spin_duration,
            yield_duration,
            inner,
        }
    }

    /// Convenience constructor delegating to [`BlockingWaitStrategy`] after
    /// the spin/yield budget is exhausted.
    #[must_use]
    pub fn with_blocking_fallback(spin_duration: Duration, yield_duration: Duration) -> Self {
        Self::new(spin_duration, yield_duration, Arc::new(BlockingWaitStrategy::new()))
    }
}

impl WaitStrategy for PhasedBackoffWaitStrategy {
    fn wait_for(
        &self,
        target: i64,
        cursor: &Sequence,
        dependent: &DependentSequence,
        watcher: &dyn AlertWatcher,
    ) -> Result<i64, WaitError> {
        let start = Instant::now();
        loop {
            watcher.check_alert()?;
            let available = dependent.get();
            if available >= target {
                return Ok(available);
            }
            let elapsed = start.elapsed();
            if elapsed > self.spin_duration + self.yield_duration {
                return self.inner.wait_for(target, cursor, dependent, watcher);
            } else if elapsed > self.spin_duration {
                thread::yield_now();
            } else {
                hint::spin_loop();
            }
        }
    }

    fn signal_all_when_blocking(&self) {
        self.inner.signal_all_when_blocking();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    /// Counting watcher: never alerted until flipped, used by the tests
    /// below without pulling in the full `SequenceBarrier`.
    #[derive(Debug, Default)]
    struct TestWatcher(AtomicU32);

    impl AlertWatcher for TestWatcher {
        fn is_alerted(&self) -> bool {
            self.0.load(Ordering::Acquire) != 0
        }
    }

    fn dep(v: i64) -> DependentSequence {
        DependentSequence::Cursor(Arc::new(Sequence::with_value(v)))
    }

    #[test]
    fn busy_spin_returns_immediately_when_already_available() {
        let cursor = Sequence::new();
        let watcher = TestWatcher::default();
        let strategy = BusySpinWaitStrategy::new();
        let d = dep(5);
        assert_eq!(strategy.wait_for(5, &cursor, &d, &watcher).unwrap(), 5);
    }

    #[test]
    fn yielding_returns_immediately_when_already_available() {
        let cursor = Sequence::new();
        let watcher = TestWatcher::default();
        let strategy = YieldingWaitStrategy::new();
        let d = dep(10);
        assert_eq!(strategy.wait_for(3, &cursor, &d, &watcher).unwrap(), 10);
    }

    #[test]
    fn busy_spin_surfaces_alert() {
        let cursor = Sequence::new();
        let watcher = TestWatcher::default();
        watcher.0.store(1, Ordering::Release);
        let strategy = BusySpinWaitStrategy::new();
        let d = dep(0);
        assert_eq!(strategy.wait_for(5, &cursor, &d, &watcher), Err(WaitError::Alert));
    }

    #[test]
    fn blocking_wakes_on_signal() {
        let strategy = Arc::new(BlockingWaitStrategy::new());
        let cursor = Arc::new(Sequence::new());
        let target_seq = Arc::new(Sequence::with_value(0));
        let watcher = Arc::new(TestWatcher::default());

        let s2 = Arc::clone(&strategy);
        let target2 = Arc::clone(&target_seq);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            target2.set(10);
            s2.signal_all_when_blocking();
        });

        let d = DependentSequence::Cursor(Arc::clone(&target_seq));
        let result = strategy.wait_for(10, &cursor, &d, &*watcher).unwrap();
        assert_eq!(result, 10);
        handle.join().unwrap();
    }

    #[test]
    fn blocking_surfaces_alert_while_parked() {
        let strategy = Arc::new(BlockingWaitStrategy::new());
        let cursor = Arc::new(Sequence::new());
        let target_seq = Arc::new(Sequence::with_value(0));
        let watcher = Arc::new(TestWatcher::default());

        let watcher2 = Arc::clone(&watcher);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            watcher2.0.store(1, Ordering::Release);
        });

        let d = DependentSequence::Cursor(Arc::clone(&target_seq));
        let result = strategy.wait_for(10, &cursor, &d, &*watcher);
        assert_eq!(result, Err(WaitError::Alert));
        handle.join().unwrap();
    }

    #[test]
    fn phased_backoff_falls_through_to_inner_blocking() {
        let strategy = PhasedBackoffWaitStrategy::with_blocking_fallback(
            Duration::from_micros(10),
            Duration::from_micros(10),
        );
        let cursor = Sequence::new();
        let target_seq = Arc::new(Sequence::with_value(0));
        let watcher = TestWatcher::default();

        let strategy = Arc::new(strategy);
        let s2 = Arc::clone(&strategy);
        let target2 = Arc::clone(&target_seq);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            target2.set(1);
            s2.signal_all_when_blocking();
        });

        let d = DependentSequence::Cursor(Arc::clone(&target_seq));
        let result = strategy.wait_for(1, &cursor, &d, &watcher).unwrap();
        assert_eq!(result, 1);
        handle.join().unwrap();
    }
}

//! Time abstraction for platform-agnostic timing.
//!
//! Every timer in the compass subsystem (calibration stability window,
//! warning debounce, sampling throttle) is driven by millisecond timestamps
//! read from a [`TimeSource`] at call time. No component schedules itself;
//! correctness depends on the host polling the update cycle regularly.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// Implementations:
/// - `embassy_time::Instant`-backed source on embedded targets
/// - [`MockTime`] for host testing with controllable time
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns elapsed time in milliseconds since a reference point.
    ///
    /// Uses saturating subtraction so a stale reference never underflows.
    fn elapsed_ms(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Monotonic clock backed by `embassy_time` (embedded targets).
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

#[cfg(feature = "embassy")]
impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}

/// Mock time source with manually advanced time.
///
/// Lets tests control time progression for deterministic testing of the
/// debounce and stability-window semantics.
///
/// # Example
///
/// ```
/// use pico_compass::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance(1500);
/// assert_eq!(time.now_ms(), 1500);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

impl TimeSource for &MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_starts_at_zero() {
        let time = MockTime::new();
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_set_and_advance() {
        let time = MockTime::new();
        time.set(2_000);
        assert_eq!(time.now_ms(), 2_000);

        time.advance(500);
        assert_eq!(time.now_ms(), 2_500);
    }

    #[test]
    fn mock_time_elapsed() {
        let time = MockTime::new();
        time.set(10_000);
        assert_eq!(time.elapsed_ms(3_000), 7_000);
    }

    #[test]
    fn mock_time_elapsed_saturates() {
        let time = MockTime::new();
        time.set(1_000);

        // Reference in the "future" saturates to 0
        assert_eq!(time.elapsed_ms(5_000), 0);
    }

    #[test]
    fn shared_reference_tracks_owner() {
        let time = MockTime::new();
        let view = &time;
        time.advance(42);
        assert_eq!(view.now_ms(), 42);
    }
}

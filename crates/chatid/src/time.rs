use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests. Identifiers store **signed milliseconds since the Unix
/// epoch**, so the identifier layer uses `TimeSource<i64>`.
///
/// # Example
///
/// ```
/// use chatid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<i64> for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> T;
}

impl<T, S: TimeSource<T> + ?Sized> TimeSource<T> for &S {
    fn current_millis(&self) -> T {
        (**self).current_millis()
    }
}

/// Reads the system wall clock on every call.
///
/// Safe to share between threads; it holds no state.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource<i64> for SystemClock {
    fn current_millis(&self) -> i64 {
        #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
        let now = {
            use web_time::web::SystemTimeExt;
            web_time::SystemTime::now().to_std()
        };
        #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
        let now = SystemTime::now();

        unix_millis(now)
    }
}

/// Converts a [`SystemTime`] to signed milliseconds since the Unix epoch,
/// saturating at the `i64` range.
#[must_use]
pub fn unix_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => duration_millis(after),
        Err(before) => -duration_millis(before.duration()),
    }
}

/// Whole milliseconds in `duration`, saturating at `i64::MAX`.
#[must_use]
pub fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_millis_handles_both_sides_of_the_epoch() {
        assert_eq!(unix_millis(UNIX_EPOCH), 0);
        assert_eq!(unix_millis(UNIX_EPOCH + Duration::from_millis(1500)), 1500);
        assert_eq!(unix_millis(UNIX_EPOCH - Duration::from_millis(20)), -20);
    }

    #[test]
    fn system_clock_is_past_2025() {
        // 2025-01-01T00:00:00Z
        assert!(SystemClock.current_millis() > 1_735_689_600_000);
    }

    #[test]
    fn references_are_time_sources() {
        fn read(t: impl TimeSource<i64>) -> i64 {
            t.current_millis()
        }
        let clock = SystemClock;
        assert!(read(&clock) > 0);
    }
}

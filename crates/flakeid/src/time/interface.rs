use core::time::Duration;

/// Epoch of [`SequentialId`] timestamps: Tuesday, January 1, 2019 00:00:00
/// UTC.
///
/// [`SequentialId`]: crate::SequentialId
pub const SEQUENTIAL_EPOCH: Duration = Duration::from_millis(1_546_300_800_000);

/// Default epoch of short IDs: Tuesday, January 1, 2019 00:00:00 UTC.
pub const SHORT_EPOCH: Duration = Duration::from_millis(1_546_300_800_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Duration = Duration::from_millis(0);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests.
///
/// The timestamp type `T` is generic (typically `u64`), and the unit is
/// expected to be **milliseconds** relative to a configurable origin.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}

impl<T, S> TimeSource<T> for &S
where
    S: TimeSource<T> + ?Sized,
{
    fn current_millis(&self) -> T {
        (**self).current_millis()
    }
}

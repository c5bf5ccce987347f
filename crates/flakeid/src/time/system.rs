use super::{SEQUENTIAL_EPOCH, TimeSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source measured from a fixed epoch.
///
/// Every call reads [`SystemTime::now`]; there is no background ticker and no
/// caching. A backwards step of the operating system clock is therefore
/// visible to the generators, which report it instead of reusing sequence
/// space.
///
/// Readings earlier than the epoch saturate to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to [`SEQUENTIAL_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(SEQUENTIAL_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock using `epoch` (a [`Duration`] since 1970-01-01 UTC)
    /// as the origin.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{SystemClock, TimeSource};
    /// use std::time::{SystemTime, UNIX_EPOCH};
    ///
    /// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    /// let clock = SystemClock::with_epoch(now);
    ///
    /// // Only a few milliseconds have passed since `now`.
    /// let ts: u64 = clock.current_millis();
    /// assert!(ts < 60_000);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The configured origin.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource<u64> for SystemClock {
    fn current_millis(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        match now.checked_sub(self.epoch) {
            Some(elapsed) => u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    epoch_ms = self.epoch.as_millis() as u64,
                    now_ms = now.as_millis() as u64,
                    "system clock is before the configured epoch"
                );
                0
            }
        }
    }
}

use crate::{
    Error, IdGenerator, Mutex, Precision, Result, SequentialConfig, SequentialId, SystemClock,
    TimeSource,
};
use core::cmp::Ordering;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Mutable state of a [`SequentialGenerator`]: the last issued tick and the
/// sequence handed out within it.
///
/// Fields are private; the only way to mutate the state is to issue IDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequentialState {
    timestamp: u64,
    sequence: u64,
    issued: bool,
}

impl SequentialState {
    /// Creates an empty state behind the lock type used by generators, ready
    /// to be passed to [`SequentialGenerator::with_shared_state`].
    pub fn new_shared() -> SharedState {
        #[cfg(feature = "cache-padded")]
        {
            Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(Self::default())))
        }
        #[cfg(not(feature = "cache-padded"))]
        {
            Arc::new(Mutex::new(Self::default()))
        }
    }

    /// Tick of the most recently issued ID, if any ID has been issued.
    pub const fn last_timestamp(&self) -> Option<u64> {
        if self.issued {
            Some(self.timestamp)
        } else {
            None
        }
    }
}

/// The lock guarding a [`SequentialState`], shareable between generators.
#[cfg(feature = "cache-padded")]
pub type SharedState = Arc<crossbeam_utils::CachePadded<Mutex<SequentialState>>>;

/// The lock guarding a [`SequentialState`], shareable between generators.
#[cfg(not(feature = "cache-padded"))]
pub type SharedState = Arc<Mutex<SequentialState>>;

/// A lock-based generator of [`SequentialId`]s, safe to share across threads.
///
/// Every call to [`SequentialGenerator::try_generate`] reads the clock and
/// updates the `(timestamp, sequence)` pair inside one critical section, then
/// packs the ID after the lock is released. The generator never sleeps: a
/// backwards clock yields [`Error::ClockRolledBack`] and an exhausted tick
/// yields [`Error::SequenceOverflow`].
///
/// Cloning a generator shares its state; both handles draw from the same
/// sequence space.
///
/// # Example
///
/// ```
/// use flakeid::{Precision, SequentialGenerator};
///
/// let generator = SequentialGenerator::new(7, Precision::Millisecond).unwrap();
/// let a = generator.try_generate().unwrap();
/// let b = generator.try_generate().unwrap();
/// assert_eq!(a.node_id(), 7);
/// assert!(a < b);
/// ```
#[derive(Clone, Debug)]
pub struct SequentialGenerator<T = SystemClock>
where
    T: TimeSource<u64>,
{
    state: SharedState,
    clock: T,
    node_id: u64,
    precision: Precision,
}

impl SequentialGenerator<SystemClock> {
    /// Creates a generator for `node_id` reading the system clock from the
    /// 2019-01-01 epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOverflow`] if `node_id` exceeds 1023.
    pub fn new(node_id: u64, precision: Precision) -> Result<Self> {
        Self::with_clock(node_id, precision, SystemClock::default())
    }

    /// Creates a generator from a [`SequentialConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOverflow`] if the configured node ID exceeds
    /// 1023.
    pub fn from_config(config: &SequentialConfig) -> Result<Self> {
        Self::new(config.node_id, config.precision)
    }
}

impl<T> SequentialGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a generator reading milliseconds since the ID epoch from
    /// `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOverflow`] if `node_id` exceeds 1023.
    pub fn with_clock(node_id: u64, precision: Precision, clock: T) -> Result<Self> {
        Self::with_shared_state(node_id, precision, clock, SequentialState::new_shared())
    }

    /// Creates a generator that serializes through an externally owned lock.
    ///
    /// Generators sharing one state never issue the same `(timestamp,
    /// sequence)` pair. They must all use the same `precision`, otherwise the
    /// stored tick is compared across units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOverflow`] if `node_id` exceeds 1023.
    pub fn with_shared_state(
        node_id: u64,
        precision: Precision,
        clock: T,
        state: SharedState,
    ) -> Result<Self> {
        if node_id > SequentialId::MAX_NODE_ID {
            return Err(Error::WorkerIdOverflow {
                worker_id: node_id,
                max: SequentialId::MAX_NODE_ID,
            });
        }
        Ok(Self::from_parts(node_id, precision, clock, state))
    }

    pub(crate) const fn from_parts(
        node_id: u64,
        precision: Precision,
        clock: T,
        state: SharedState,
    ) -> Self {
        Self {
            state,
            clock,
            node_id,
            precision,
        }
    }

    /// The node ID stamped into every ID.
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// The configured precision.
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// A handle to the lock guarding this generator's state.
    pub fn shared_state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Issues the next ID.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRolledBack`] if the clock is behind the last issued
    ///   tick
    /// - [`Error::SequenceOverflow`] if the current tick is exhausted; the
    ///   state is left untouched so a retry on the next tick succeeds
    /// - [`Error::TimeOverflow`] if the elapsed time no longer fits the
    ///   timestamp field
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (not with `parking-lot`)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_generate(&self) -> Result<SequentialId> {
        let precision = self.precision;
        let (timestamp, sequence) = {
            #[cfg(feature = "parking-lot")]
            let mut state = self.state.lock();
            #[cfg(not(feature = "parking-lot"))]
            let mut state = self.state.lock()?;

            // read under the lock so concurrent callers observe ordered ticks
            let now = precision.units_from_millis(self.clock.current_millis());
            if now > precision.max_timestamp() {
                return Err(Self::cold_time_overflow(now, precision.max_timestamp()));
            }

            match now.cmp(&state.timestamp) {
                Ordering::Equal if state.issued => {
                    if state.sequence >= precision.max_sequence() {
                        return Err(Self::cold_sequence_overflow(now));
                    }
                    state.sequence += 1;
                }
                Ordering::Less if state.issued => {
                    return Err(Self::cold_clock_behind(state.timestamp, now));
                }
                _ => {
                    state.timestamp = now;
                    state.sequence = 0;
                    state.issued = true;
                }
            }
            (state.timestamp, state.sequence)
        };
        Ok(SequentialId::from_components(
            precision,
            timestamp,
            sequence,
            self.node_id,
        ))
    }

    /// Issues the next ID, panicking on error.
    ///
    /// # Panics
    ///
    /// Panics if [`SequentialGenerator::try_generate`] fails.
    #[track_caller]
    pub fn must_generate(&self) -> SequentialId {
        IdGenerator::must_generate(self)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, "clock moved backwards, refusing to issue");
        Error::ClockRolledBack { last, now }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_overflow(timestamp: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::debug!(timestamp, "sequence exhausted");
        Error::SequenceOverflow { timestamp }
    }

    #[cold]
    #[inline(never)]
    fn cold_time_overflow(elapsed: u64, max: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(elapsed, max, "timestamp budget exhausted, epoch must be redefined");
        Error::TimeOverflow { elapsed, max }
    }
}

impl<T> IdGenerator for SequentialGenerator<T>
where
    T: TimeSource<u64>,
{
    type Id = SequentialId;

    fn try_generate(&self) -> Result<SequentialId> {
        self.try_generate()
    }
}

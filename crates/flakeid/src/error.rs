/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakeid` can emit.
///
/// Every error is returned to the immediate caller. Nothing is retried
/// internally and nothing blocks waiting for the clock to move. The first four
/// variants are construction errors: they surface before a generator issues
/// its first ID (see [`Error::is_construction`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The alphabet does not contain exactly 32 or 64 symbols.
    #[error("alphabet must contain exactly 32 or 64 symbols, got {len}")]
    UnsupportedAlphabetLength {
        /// Number of symbols found.
        len: usize,
    },

    /// The alphabet contains the same symbol more than once.
    #[error("alphabet symbol {symbol:?} appears more than once")]
    DuplicateSymbol {
        /// The first repeated symbol.
        symbol: char,
    },

    /// The alphabet contains a symbol outside printable single-byte ASCII.
    #[error("alphabet symbols must be printable ASCII")]
    NonAsciiAlphabet,

    /// The node (or worker) ID does not fit in the layout's node field.
    #[error("worker id {worker_id} exceeds the maximum of {max}")]
    WorkerIdOverflow {
        /// The rejected ID.
        worker_id: u64,
        /// The largest accepted ID.
        max: u64,
    },

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// Both values are in the generator's own time unit. The generator never
    /// waits for the clock to catch up; the caller decides whether to retry,
    /// alert, or halt.
    #[error("clock moved backwards: last issued at {last}, now {now}")]
    ClockRolledBack {
        /// Timestamp of the most recently issued ID.
        last: u64,
        /// Timestamp reported by the clock.
        now: u64,
    },

    /// Every sequence value of the current tick has been handed out.
    ///
    /// Retry once the clock advances to the next tick.
    #[error("sequence exhausted for timestamp {timestamp}")]
    SequenceOverflow {
        /// The exhausted tick.
        timestamp: u64,
    },

    /// The elapsed time since the epoch no longer fits in the timestamp field.
    ///
    /// This is a configuration problem (the epoch must be redefined), not a
    /// transient condition.
    #[error("elapsed time {elapsed} exceeds the timestamp budget of {max}")]
    TimeOverflow {
        /// Elapsed units since the epoch.
        elapsed: u64,
        /// Largest representable timestamp.
        max: u64,
    },

    /// A character outside the alphabet was found while decoding.
    #[error("invalid symbol {byte:#04x} at index {index}")]
    InvalidSymbol {
        /// The offending byte.
        byte: u8,
        /// Byte offset into the input.
        index: usize,
    },

    /// An empty string was given to a decoder.
    #[error("cannot decode an empty string")]
    EmptyInput,

    /// The decoded value does not fit in 64 bits.
    #[error("decoded value does not fit in 64 bits")]
    DecodeOverflow,

    /// A non-digit character was found where a decimal digit was expected.
    #[error("invalid decimal digit {byte:#04x} at index {index}")]
    InvalidDigit {
        /// The offending byte.
        byte: u8,
        /// Byte offset into the input.
        index: usize,
    },

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for errors raised while building an alphabet, encoding,
    /// or generator, before any ID is issued.
    pub const fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlphabetLength { .. }
                | Self::DuplicateSymbol { .. }
                | Self::NonAsciiAlphabet
                | Self::WorkerIdOverflow { .. }
        )
    }

    /// Returns `true` when retrying on a later clock tick may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SequenceOverflow { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

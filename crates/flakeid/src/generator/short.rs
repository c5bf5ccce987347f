use crate::{
    Alphabet, Error, IdGenerator, Mutex, OsFallbackRandom, RandSource, Result, SHORT_EPOCH,
    ShortConfig, SystemClock, TimeSource,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Largest elapsed-millisecond value a short ID may carry (40 bits, roughly
/// 34 years past the epoch).
pub const MAX_SHORT_MILLIS: u64 = (1 << 40) - 1;

#[derive(Debug, Default)]
struct ShortState {
    last_millis: Option<u64>,
    counter: u64,
}

/// A generator of short, opaque, printable IDs.
///
/// Each ID packs three fields into symbols of a seeded, shuffled alphabet:
/// elapsed milliseconds since the epoch, the worker ID, and (only when
/// nonzero) a counter that disambiguates IDs issued within the same
/// millisecond. Every symbol carries 4 data bits (32-symbol alphabet) or 5
/// (64-symbol alphabet); its remaining top bit is random filler.
///
/// ```text
///  symbol index:   [ filler (1) | data (4 or 5) ]
///  output:         millis symbols, LSB first | worker | counter (if > 0)
/// ```
///
/// Short IDs are not meant to be decoded. Uniqueness relies on the
/// `(millis, counter)` pair and a worker ID unique to each generator.
///
/// # Example
///
/// ```
/// use flakeid::{DEFAULT_ABC, ShortGenerator};
///
/// let generator = ShortGenerator::new(1, DEFAULT_ABC, 2342).unwrap();
/// let a = generator.try_generate().unwrap();
/// let b = generator.try_generate().unwrap();
/// assert_ne!(a, b);
/// assert!(a.bytes().all(|c| generator.alphabet().as_bytes().contains(&c)));
/// ```
#[derive(Debug)]
pub struct ShortGenerator<T = SystemClock, R = OsFallbackRandom>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    state: Mutex<ShortState>,
    alphabet: Alphabet,
    worker: u8,
    clock: T,
    rng: R,
}

impl ShortGenerator<SystemClock, OsFallbackRandom> {
    /// Creates a generator for `worker` over `alphabet` shuffled by `seed`,
    /// reading the system clock from [`SHORT_EPOCH`].
    ///
    /// # Errors
    ///
    /// - the alphabet errors of [`Alphabet::new`]
    /// - [`Error::WorkerIdOverflow`] if `worker` does not fit in one data
    ///   symbol (15 for 32-symbol alphabets, 31 for 64-symbol alphabets)
    pub fn new(worker: u8, alphabet: &str, seed: u64) -> Result<Self> {
        Self::with_sources(
            worker,
            Alphabet::new(alphabet)?.shuffled(seed),
            SystemClock::with_epoch(SHORT_EPOCH),
            OsFallbackRandom::new(),
        )
    }

    /// Creates a generator from a [`ShortConfig`].
    ///
    /// # Errors
    ///
    /// See [`ShortGenerator::new`].
    pub fn from_config(config: &ShortConfig) -> Result<Self> {
        Self::new(config.worker, &config.alphabet, config.seed)
    }
}

impl<T, R> ShortGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    /// Creates a generator over an already shuffled `alphabet` with explicit
    /// clock and filler sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOverflow`] if `worker` does not fit in one
    /// data symbol of `alphabet`.
    pub fn with_sources(worker: u8, alphabet: Alphabet, clock: T, rng: R) -> Result<Self> {
        let max = (1_u64 << alphabet.data_bits()) - 1;
        if u64::from(worker) > max {
            return Err(Error::WorkerIdOverflow {
                worker_id: u64::from(worker),
                max,
            });
        }
        Ok(Self {
            state: Mutex::new(ShortState::default()),
            alphabet,
            worker,
            clock,
            rng,
        })
    }

    /// The shuffled alphabet IDs are drawn from.
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The worker ID packed into every ID.
    pub const fn worker(&self) -> u8 {
        self.worker
    }

    /// Issues the next short ID.
    ///
    /// # Errors
    ///
    /// - [`Error::TimeOverflow`] once more than 2^40 - 1 milliseconds have
    ///   passed since the epoch
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (not with `parking-lot`)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_generate(&self) -> Result<String> {
        let (millis, counter) = {
            #[cfg(feature = "parking-lot")]
            let mut state = self.state.lock();
            #[cfg(not(feature = "parking-lot"))]
            let mut state = self.state.lock()?;

            let millis = self.clock.current_millis();
            if millis > MAX_SHORT_MILLIS {
                return Err(Self::cold_time_overflow(millis));
            }
            match state.last_millis {
                Some(last) if last == millis => state.counter += 1,
                Some(last) if millis < last => {
                    Self::cold_clock_behind(last, millis);
                    state.last_millis = Some(millis);
                    state.counter = 0;
                }
                _ => {
                    state.last_millis = Some(millis);
                    state.counter = 0;
                }
            }
            (millis, state.counter)
        };

        let mut out = String::with_capacity(16);
        let mut filler = Filler::new(&self.rng);
        pack(&mut out, millis, &self.alphabet, &mut filler);
        pack(&mut out, u64::from(self.worker), &self.alphabet, &mut filler);
        if counter > 0 {
            pack(&mut out, counter, &self.alphabet, &mut filler);
        }
        Ok(out)
    }

    /// Issues the next short ID, panicking on error.
    ///
    /// # Panics
    ///
    /// Panics if [`ShortGenerator::try_generate`] fails.
    #[track_caller]
    pub fn must_generate(&self) -> String {
        IdGenerator::must_generate(self)
    }

    // a backwards step restarts the counter, it is not an error here
    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, "clock moved backwards");
        #[cfg(not(feature = "tracing"))]
        let _ = (last, now);
    }

    #[cold]
    #[inline(never)]
    fn cold_time_overflow(elapsed: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(elapsed, "short id time budget exhausted, epoch must be redefined");
        Error::TimeOverflow {
            elapsed,
            max: MAX_SHORT_MILLIS,
        }
    }
}

impl<T, R> IdGenerator for ShortGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    type Id = String;

    fn try_generate(&self) -> Result<String> {
        self.try_generate()
    }
}

/// Hands out random bytes, drawing a fresh `u64` every eight bytes.
struct Filler<'a, R> {
    rng: &'a R,
    bits: u64,
    left: u32,
}

impl<'a, R: RandSource<u64>> Filler<'a, R> {
    const fn new(rng: &'a R) -> Self {
        Self {
            rng,
            bits: 0,
            left: 0,
        }
    }

    fn next_byte(&mut self) -> u8 {
        if self.left == 0 {
            self.bits = self.rng.rand();
            self.left = 8;
        }
        let byte = self.bits as u8;
        self.bits >>= 8;
        self.left -= 1;
        byte
    }
}

/// Appends `value` to `out`, least significant data bits first, using at
/// least one symbol.
fn pack<R: RandSource<u64>>(
    out: &mut String,
    value: u64,
    alphabet: &Alphabet,
    filler: &mut Filler<'_, R>,
) {
    let digits = alphabet.data_bits();
    let data_mask = (1_u64 << digits) - 1;
    let filler_mask = (alphabet.len() - 1) & !(data_mask as usize);
    let symbols = (u64::BITS - value.leading_zeros()).div_ceil(digits).max(1);

    let mut value = value;
    for _ in 0..symbols {
        let index = (usize::from(filler.next_byte()) & filler_mask) | (value & data_mask) as usize;
        out.push(char::from(alphabet.symbol(index)));
        value >>= digits;
    }
}

use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// Canonical 64-symbol alphabet: digits, lower-case, upper-case, `_` and `-`.
pub const DEFAULT_ABC: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Canonical 32-symbol alphabet (Crockford, upper-case).
pub const BASE32_ABC: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// An ordered set of exactly 32 or 64 distinct printable ASCII symbols.
///
/// The alphabet size fixes the symbol width: 5 bits for 32 symbols, 6 bits for
/// 64 symbols. An `Alphabet` is validated once and immutable afterwards.
///
/// ```text
///  32 symbols: index = [ filler (1) | data (4) ]
///  64 symbols: index = [ filler (1) | data (5) ]
/// ```
///
/// The data/filler split is only used by symbol packing (short IDs); plain
/// radix encoding uses the full index width.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: [u8; 64],
    len: u8,
}

impl Alphabet {
    /// The [`DEFAULT_ABC`] alphabet.
    pub const DEFAULT: Self = Self::from_static(DEFAULT_ABC);

    /// The [`BASE32_ABC`] alphabet.
    pub const BASE32: Self = Self::from_static(BASE32_ABC);

    /// Validates `alphabet` and builds an [`Alphabet`] from it.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedAlphabetLength`] if it does not hold exactly 32
    ///   or 64 symbols
    /// - [`Error::NonAsciiAlphabet`] if a symbol is not printable ASCII
    /// - [`Error::DuplicateSymbol`] if a symbol repeats
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{Alphabet, Error};
    ///
    /// let abc = Alphabet::new("0123456789ABCDEFGHJKMNPQRSTVWXYZ").unwrap();
    /// assert_eq!(abc.bits(), 5);
    ///
    /// assert_eq!(
    ///     Alphabet::new("abc"),
    ///     Err(Error::UnsupportedAlphabetLength { len: 3 })
    /// );
    /// ```
    pub fn new(alphabet: &str) -> Result<Self> {
        let len = alphabet.chars().count();
        if len != 32 && len != 64 {
            return Err(Error::UnsupportedAlphabetLength { len });
        }
        if !alphabet.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(Error::NonAsciiAlphabet);
        }

        let mut seen = [false; 128];
        let mut symbols = [0_u8; 64];
        for (i, b) in alphabet.bytes().enumerate() {
            if seen[usize::from(b)] {
                return Err(Error::DuplicateSymbol {
                    symbol: char::from(b),
                });
            }
            seen[usize::from(b)] = true;
            symbols[i] = b;
        }

        Ok(Self {
            symbols,
            // len is 32 or 64
            len: len as u8,
        })
    }

    /// Builds an alphabet from a string known at compile time.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `alphabet` violates
    /// any of the rules checked by [`Alphabet::new`].
    pub const fn from_static(alphabet: &'static str) -> Self {
        let bytes = alphabet.as_bytes();
        assert!(
            bytes.len() == 32 || bytes.len() == 64,
            "alphabet must contain exactly 32 or 64 symbols"
        );

        let mut symbols = [0_u8; 64];
        let mut i = 0;
        while i < bytes.len() {
            assert!(bytes[i].is_ascii_graphic(), "alphabet must be printable ASCII");
            let mut j = 0;
            while j < i {
                assert!(bytes[j] != bytes[i], "alphabet symbols must be unique");
                j += 1;
            }
            symbols[i] = bytes[i];
            i += 1;
        }

        Self {
            symbols,
            len: bytes.len() as u8,
        }
    }

    /// Number of symbols (32 or 64).
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; present for API symmetry with [`Alphabet::len`].
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Bits carried by one symbol: 5 or 6.
    pub const fn bits(&self) -> u32 {
        self.len.trailing_zeros()
    }

    /// Data bits carried by one packed symbol: 4 or 5. The remaining top bit
    /// of the index is random filler.
    pub const fn data_bits(&self) -> u32 {
        self.bits() - 1
    }

    /// Returns the symbol at `index`, masked to the alphabet width.
    pub const fn symbol(&self, index: usize) -> u8 {
        self.symbols[index & (self.len as usize - 1)]
    }

    /// Returns the symbols as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols[..self.len()]
    }

    /// Returns the symbols as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: every symbol was checked to be printable ASCII on
        // construction.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Returns this alphabet deterministically permuted by `seed`.
    ///
    /// See [`shuffle`].
    #[must_use]
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut symbols = [0_u8; 64];
        for (slot, b) in symbols
            .iter_mut()
            .zip(shuffle_bytes(self.as_bytes(), seed))
        {
            *slot = b;
        }
        Self {
            symbols,
            len: self.len,
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}

/// Deterministically permutes `alphabet` using a linear-congruential sequence
/// seeded by `seed`.
///
/// At each step the seed advances as `seed = (seed * 9301 + 49297) % 233280`
/// and the symbol at `seed * remaining / 233280` is moved from the remaining
/// pool to the output. The same `(alphabet, seed)` pair always yields the same
/// permutation, so a node can rebuild its alphabet from a persisted seed.
///
/// # Example
///
/// ```
/// use flakeid::{DEFAULT_ABC, shuffle};
///
/// let a = shuffle(DEFAULT_ABC, 42);
/// let b = shuffle(DEFAULT_ABC, 42);
/// assert_eq!(a, b);
/// assert_ne!(a, DEFAULT_ABC);
/// ```
pub fn shuffle(alphabet: &str, seed: u64) -> String {
    let mut source: Vec<char> = alphabet.chars().collect();
    let mut out = String::with_capacity(alphabet.len());
    let mut seed = seed;
    while source.len() > 1 {
        seed = next_seed(seed);
        out.push(source.remove(pick(seed, source.len())));
    }
    out.extend(source);
    out
}

/// Returns `true` iff all symbols of `alphabet` are pairwise distinct.
pub fn check_unique(alphabet: &str) -> bool {
    let mut seen = HashSet::with_capacity(alphabet.len());
    alphabet.chars().all(|c| seen.insert(c))
}

fn shuffle_bytes(bytes: &[u8], seed: u64) -> Vec<u8> {
    let mut source = bytes.to_vec();
    let mut out = Vec::with_capacity(bytes.len());
    let mut seed = seed;
    while source.len() > 1 {
        seed = next_seed(seed);
        out.push(source.remove(pick(seed, source.len())));
    }
    out.extend(source);
    out
}

const fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT) % LCG_MODULUS
}

// seed < LCG_MODULUS, so the product cannot overflow and the index is in range
const fn pick(seed: u64, remaining: usize) -> usize {
    (seed * remaining as u64 / LCG_MODULUS) as usize
}

use super::Alphabet;
use crate::{Error, Result};
use std::fmt;

const NO_VALUE: u8 = 255;

/// Size of the stack buffer that fits any encoded `u64`: 13 symbols at 5 bits
/// per symbol (11 at 6 bits).
pub const MAX_ENCODED_LEN: usize = 13;

/// Stack buffer accepted by [`Encoding::encode_to_buf`].
pub type EncodeBuf = [u8; MAX_ENCODED_LEN];

/// A reversible `u64` <-> string mapping over a 32- or 64-symbol alphabet.
///
/// Holds the forward table (value to symbol) and the inverse lookup (symbol
/// byte to value). Unmapped bytes map to a sentinel so that decoding can
/// reject them.
///
/// Encoding emits the minimum number of symbols needed to represent the value
/// (a single zero symbol for `0`), most significant symbol first.
///
/// # Example
///
/// ```
/// use flakeid::{BASE32_ABC, Encoding};
///
/// let enc = Encoding::new(BASE32_ABC).unwrap();
/// assert_eq!(enc.encode(0), "0");
/// assert_eq!(enc.encode(32), "10");
/// assert_eq!(enc.encode(u64::MAX), "FZZZZZZZZZZZZ");
/// assert_eq!(enc.decode("FZZZZZZZZZZZZ"), Ok(u64::MAX));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Encoding {
    alphabet: Alphabet,
    lookup: [u8; 256],
}

impl Encoding {
    /// Encoding over [`Alphabet::DEFAULT`].
    pub const DEFAULT: Self = Self::from_alphabet(Alphabet::DEFAULT);

    /// Encoding over [`Alphabet::BASE32`].
    pub const BASE32: Self = Self::from_alphabet(Alphabet::BASE32);

    /// Validates `alphabet` and builds the lookup tables.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Alphabet::new`], notably
    /// [`Error::UnsupportedAlphabetLength`] when the alphabet is not exactly 32
    /// or 64 symbols long.
    pub fn new(alphabet: &str) -> Result<Self> {
        Ok(Self::from_alphabet(Alphabet::new(alphabet)?))
    }

    /// Builds the lookup tables for an already validated alphabet.
    pub const fn from_alphabet(alphabet: Alphabet) -> Self {
        let mut lookup = [NO_VALUE; 256];
        let mut i = 0;
        while i < alphabet.len() {
            lookup[alphabet.symbol(i) as usize] = i as u8;
            i += 1;
        }
        Self { alphabet, lookup }
    }

    /// The alphabet this encoding maps through.
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Bits per symbol: 5 or 6.
    pub const fn bits_per_symbol(&self) -> u32 {
        self.alphabet.bits()
    }

    /// Longest possible output for a `u64`: 13 or 11 symbols.
    pub const fn max_encoded_len(&self) -> usize {
        u64::BITS.div_ceil(self.bits_per_symbol()) as usize
    }

    /// Encodes `x` into a new [`String`].
    pub fn encode(&self, x: u64) -> String {
        let mut buf = EncodeBuf::default();
        self.encode_to_buf(x, &mut buf).to_owned()
    }

    /// Encodes `x` into `buf` without heap allocation, returning the written
    /// tail of the buffer.
    ///
    /// Symbols are written back to front, so the result is always a suffix of
    /// `buf`.
    pub fn encode_to_buf<'a>(&self, x: u64, buf: &'a mut EncodeBuf) -> &'a str {
        let bits = self.bits_per_symbol();
        let mask = (1_u64 << bits) - 1;
        let mut x = x;
        let mut pos = MAX_ENCODED_LEN;
        loop {
            pos -= 1;
            buf[pos] = self.alphabet.symbol((x & mask) as usize);
            x >>= bits;
            if x == 0 {
                break;
            }
        }
        // SAFETY: every byte written comes from the alphabet, which is
        // printable ASCII by construction.
        unsafe { core::str::from_utf8_unchecked(&buf[pos..]) }
    }

    /// Decodes `s`, most significant symbol first.
    ///
    /// Leading zero symbols are accepted and contribute nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `s` is empty
    /// - [`Error::InvalidSymbol`] if a character is outside the alphabet
    /// - [`Error::DecodeOverflow`] if the value does not fit in 64 bits
    pub fn decode(&self, s: &str) -> Result<u64> {
        if s.is_empty() {
            return Err(Error::EmptyInput);
        }
        let bits = self.bits_per_symbol();
        let mut acc = 0_u64;
        for (index, byte) in s.bytes().enumerate() {
            let value = self.lookup[usize::from(byte)];
            if value == NO_VALUE {
                return Err(Error::InvalidSymbol { byte, index });
            }
            if acc >> (u64::BITS - bits) != 0 {
                return Err(Error::DecodeOverflow);
            }
            acc = (acc << bits) | u64::from(value);
        }
        Ok(acc)
    }

    /// Decodes `s` without validation.
    ///
    /// Symbols outside the alphabet contribute zero bits and bits shifted past
    /// the top of the accumulator are dropped. The result for malformed input
    /// is meaningless but never an error. Prefer [`Encoding::decode`].
    pub fn decode_lossy(&self, s: &str) -> u64 {
        let bits = self.bits_per_symbol();
        s.bytes().fold(0_u64, |acc, byte| {
            let value = match self.lookup[usize::from(byte)] {
                NO_VALUE => 0,
                v => v,
            };
            (acc << bits) | u64::from(value)
        })
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding")
            .field("alphabet", &self.alphabet.as_str())
            .field("bits_per_symbol", &self.bits_per_symbol())
            .finish()
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BASE32_ABC, DEFAULT_ABC};

    const BOUNDARIES: [u64; 8] = [
        0,
        1,
        31,
        63,
        64,
        (1 << 32) - 1,
        1 << 63,
        u64::MAX,
    ];

    #[test]
    fn rejects_unsupported_alphabet_length() {
        assert_eq!(
            Encoding::new("0123456789"),
            Err(Error::UnsupportedAlphabetLength { len: 10 })
        );
    }

    #[test]
    fn known_values_default() {
        let enc = Encoding::DEFAULT;
        assert_eq!(enc.encode(0), "0");
        assert_eq!(enc.encode(10), "a");
        assert_eq!(enc.encode(63), "-");
        assert_eq!(enc.encode(64), "10");
        assert_eq!(enc.encode(u64::MAX), "f----------");
        assert_eq!(enc.max_encoded_len(), 11);
    }

    #[test]
    fn known_values_base32() {
        let enc = Encoding::BASE32;
        assert_eq!(enc.encode(0), "0");
        assert_eq!(enc.encode(31), "Z");
        assert_eq!(enc.encode(32), "10");
        assert_eq!(enc.encode(u64::MAX), "FZZZZZZZZZZZZ");
        assert_eq!(enc.max_encoded_len(), 13);
    }

    #[test]
    fn boundary_round_trips() {
        for enc in [Encoding::DEFAULT, Encoding::BASE32] {
            for x in BOUNDARIES {
                let s = enc.encode(x);
                assert!(s.len() <= enc.max_encoded_len());
                assert_eq!(enc.decode(&s), Ok(x), "round trip of {x} via {s}");
                assert_eq!(enc.decode_lossy(&s), x);
            }
        }
    }

    #[test]
    fn shuffled_alphabet_round_trips() {
        let enc = Encoding::from_alphabet(Alphabet::DEFAULT.shuffled(1234));
        for x in BOUNDARIES {
            assert_eq!(enc.decode(&enc.encode(x)), Ok(x));
        }
        assert_ne!(enc.alphabet(), &Alphabet::DEFAULT);
    }

    #[test]
    fn encode_to_buf_writes_suffix() {
        let mut buf = EncodeBuf::default();
        let s = Encoding::DEFAULT.encode_to_buf(64, &mut buf);
        assert_eq!(s, "10");
        assert_eq!(&buf[MAX_ENCODED_LEN - 2..], b"10");
    }

    #[test]
    fn decode_accepts_leading_zero_symbols() {
        assert_eq!(Encoding::DEFAULT.decode("0000000000000a"), Ok(10));
    }

    #[test]
    fn decode_rejects_invalid_symbol() {
        assert_eq!(
            Encoding::DEFAULT.decode("ab@c"),
            Err(Error::InvalidSymbol {
                byte: b'@',
                index: 2
            })
        );
        // Crockford alphabet excludes 'U' and is case-sensitive here
        assert_eq!(
            Encoding::BASE32.decode("U"),
            Err(Error::InvalidSymbol {
                byte: b'U',
                index: 0
            })
        );
        assert_eq!(
            Encoding::BASE32.decode("a"),
            Err(Error::InvalidSymbol {
                byte: b'a',
                index: 0
            })
        );
    }

    #[test]
    fn decode_rejects_empty_and_overflow() {
        assert_eq!(Encoding::DEFAULT.decode(""), Err(Error::EmptyInput));
        assert_eq!(
            Encoding::DEFAULT.decode("g----------"),
            Err(Error::DecodeOverflow)
        );
        assert_eq!(
            Encoding::BASE32.decode("G0000000000000"),
            Err(Error::DecodeOverflow)
        );
    }

    #[test]
    fn decode_lossy_never_fails() {
        assert_eq!(Encoding::DEFAULT.decode_lossy(""), 0);
        assert_eq!(Encoding::DEFAULT.decode_lossy("@"), 0);
        assert_eq!(Encoding::DEFAULT.decode_lossy("1@"), 64);
    }

    #[test]
    fn new_matches_const_tables() {
        assert_eq!(Encoding::new(DEFAULT_ABC), Ok(Encoding::DEFAULT));
        assert_eq!(Encoding::new(BASE32_ABC), Ok(Encoding::BASE32));
    }
}

use core::fmt;

/// Timestamp precision of a [`SequentialId`], stored in its mode bit.
///
/// | Mode | Timestamp | Sequence | Node |
/// |------|-----------|----------|------|
/// | `Second` (0) | 32 bits, seconds | 21 bits | 10 bits |
/// | `Millisecond` (1) | 42 bits, milliseconds | 11 bits | 10 bits |
///
/// [`SequentialId`]: crate::SequentialId
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precision {
    /// One timestamp unit per second.
    #[default]
    Second = 0,
    /// One timestamp unit per millisecond.
    Millisecond = 1,
}

impl Precision {
    /// Decodes the mode bit (only the lowest bit of `bit` is read).
    pub const fn from_bit(bit: u64) -> Self {
        if bit & 1 == 0 {
            Self::Second
        } else {
            Self::Millisecond
        }
    }

    /// The mode bit of this precision.
    pub const fn bit(self) -> u64 {
        self as u64
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(self) -> u32 {
        match self {
            Self::Second => 21,
            Self::Millisecond => 11,
        }
    }

    /// Width of the timestamp field.
    pub const fn timestamp_bits(self) -> u32 {
        match self {
            Self::Second => 32,
            Self::Millisecond => 42,
        }
    }

    /// Bit offset of the timestamp field.
    pub const fn timestamp_shift(self) -> u32 {
        u64::BITS - self.timestamp_bits()
    }

    /// Largest sequence value; a tick can issue `max_sequence() + 1` IDs.
    pub const fn max_sequence(self) -> u64 {
        (1 << self.sequence_bits()) - 1
    }

    /// Largest timestamp value.
    pub const fn max_timestamp(self) -> u64 {
        (1 << self.timestamp_bits()) - 1
    }

    /// Converts milliseconds since the epoch into timestamp units.
    pub const fn units_from_millis(self, millis: u64) -> u64 {
        match self {
            Self::Second => millis / 1000,
            Self::Millisecond => millis,
        }
    }

    /// Converts timestamp units into milliseconds since the epoch.
    pub const fn millis_from_units(self, units: u64) -> u64 {
        match self {
            Self::Second => units.saturating_mul(1000),
            Self::Millisecond => units,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Second => f.write_str("second"),
            Self::Millisecond => f.write_str("millisecond"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Precision;

    #[test]
    fn layouts_fill_the_word() {
        for p in [Precision::Second, Precision::Millisecond] {
            // 1 mode bit + 10 node bits + sequence + timestamp
            assert_eq!(1 + 10 + p.sequence_bits() + p.timestamp_bits(), 64);
            assert_eq!(p.timestamp_shift(), 11 + p.sequence_bits());
        }
    }

    #[test]
    fn bounds() {
        assert_eq!(Precision::Second.max_sequence(), (1 << 21) - 1);
        assert_eq!(Precision::Millisecond.max_sequence(), (1 << 11) - 1);
        assert_eq!(Precision::Second.max_timestamp(), u64::from(u32::MAX));
        assert_eq!(Precision::Millisecond.max_timestamp(), (1 << 42) - 1);
    }

    #[test]
    fn mode_bit() {
        assert_eq!(Precision::Second.bit(), 0);
        assert_eq!(Precision::Millisecond.bit(), 1);
        assert_eq!(Precision::from_bit(0b10), Precision::Second);
        assert_eq!(Precision::from_bit(0b11), Precision::Millisecond);
    }

    #[test]
    fn unit_conversion() {
        assert_eq!(Precision::Second.units_from_millis(5_999), 5);
        assert_eq!(Precision::Second.millis_from_units(5), 5_000);
        assert_eq!(Precision::Millisecond.units_from_millis(5_999), 5_999);
        assert_eq!(Precision::Millisecond.millis_from_units(5_999), 5_999);
    }
}

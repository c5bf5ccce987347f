use super::Precision;
use crate::{Encoding, Error, Result, SEQUENTIAL_EPOCH, default_encoding};
use chrono::{DateTime, Utc};
use core::{fmt, num::IntErrorKind, str::FromStr, time::Duration};
use std::time::{SystemTime, UNIX_EPOCH};

/// A 64-bit time-ordered ID with a mode-dependent bit layout.
///
/// Second precision (mode 0):
///
/// ```text
///  Bit Index:  63             32 31            11 10         1  0
///              +----------------+----------------+------------+----+
///  Field:      | seconds (32)   | sequence (21)  | node (10)  | m  |
///              +----------------+----------------+------------+----+
/// ```
///
/// Millisecond precision (mode 1):
///
/// ```text
///  Bit Index:  63             22 21            11 10         1  0
///              +----------------+----------------+------------+----+
///  Field:      | millis (42)    | sequence (11)  | node (10)  | m  |
///              +----------------+----------------+------------+----+
/// ```
///
/// Timestamps count from [`SEQUENTIAL_EPOCH`]. Within one precision and node,
/// numeric order follows `(timestamp, sequence)` order.
///
/// # Example
///
/// ```
/// use flakeid::{Precision, SequentialId};
///
/// let id = SequentialId::from_components(Precision::Second, 5, 1, 7);
/// assert_eq!(id.timestamp(), 5);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.node_id(), 7);
/// assert_eq!(id.precision(), Precision::Second);
/// assert_eq!(id.render(), "2019-01-01-00-00-05-1-7-0");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequentialId {
    id: u64,
}

impl SequentialId {
    /// The all-zero ID: second precision, node 0, sequence 0, at the epoch.
    pub const NIL: Self = Self { id: 0 };

    /// Bitmask for the mode bit (bit 0).
    pub const MODE_MASK: u64 = 1;

    /// Bitmask for extracting the 10-bit node field. Occupies bits 1 through
    /// 10.
    pub const NODE_ID_MASK: u64 = (1 << 10) - 1;

    /// Number of bits to shift the node field to its position (bit 1).
    pub const NODE_ID_SHIFT: u32 = 1;

    /// Number of bits to shift the sequence field to its position (bit 11).
    pub const SEQUENCE_SHIFT: u32 = 11;

    /// Largest node ID representable in either layout.
    pub const MAX_NODE_ID: u64 = Self::NODE_ID_MASK;

    /// Packs the components into an ID. Values wider than their field are
    /// truncated to the field width.
    pub const fn from_components(
        precision: Precision,
        timestamp: u64,
        sequence: u64,
        node_id: u64,
    ) -> Self {
        let timestamp = (timestamp & precision.max_timestamp()) << precision.timestamp_shift();
        let sequence = (sequence & precision.max_sequence()) << Self::SEQUENCE_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        Self {
            id: timestamp | sequence | node_id | precision.bit(),
        }
    }

    /// Wraps a raw integer. Every `u64` is a well-formed ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// The raw integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Precision recorded in the mode bit.
    pub const fn precision(&self) -> Precision {
        Precision::from_bit(self.id & Self::MODE_MASK)
    }

    /// Alias of [`SequentialId::precision`].
    pub const fn mode(&self) -> Precision {
        self.precision()
    }

    /// Timestamp in the ID's own unit (seconds or milliseconds) since
    /// [`SEQUENTIAL_EPOCH`].
    pub const fn timestamp(&self) -> u64 {
        let precision = self.precision();
        (self.id >> precision.timestamp_shift()) & precision.max_timestamp()
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & self.precision().max_sequence()
    }

    /// Extracts the node ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Returns `true` for [`SequentialId::NIL`].
    pub const fn is_nil(&self) -> bool {
        self.id == 0
    }

    /// Milliseconds since [`SEQUENTIAL_EPOCH`] encoded in this ID.
    pub const fn elapsed_millis(&self) -> u64 {
        self.precision().millis_from_units(self.timestamp())
    }

    /// Wall-clock instant encoded in this ID.
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + SEQUENTIAL_EPOCH + Duration::from_millis(self.elapsed_millis())
    }

    /// Wall-clock instant encoded in this ID, as a UTC date-time.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.time())
    }

    /// Renders the ID as `YYYY-MM-DD-HH-MM-SS[-mmm]-sequence-node-mode` in
    /// UTC. The millisecond part is present only for millisecond precision.
    pub fn render(&self) -> String {
        let at = self.datetime();
        let date = at.format("%Y-%m-%d-%H-%M-%S");
        match self.precision() {
            Precision::Second => format!(
                "{date}-{}-{}-{}",
                self.sequence(),
                self.node_id(),
                self.precision().bit()
            ),
            Precision::Millisecond => format!(
                "{date}-{:03}-{}-{}-{}",
                at.timestamp_subsec_millis(),
                self.sequence(),
                self.node_id(),
                self.precision().bit()
            ),
        }
    }

    /// Encodes the raw integer with `encoding`.
    pub fn encode(&self, encoding: &Encoding) -> String {
        encoding.encode(self.id)
    }

    /// Decodes an ID previously produced by [`SequentialId::encode`].
    ///
    /// # Errors
    ///
    /// See [`Encoding::decode`].
    pub fn decode(encoding: &Encoding, s: &str) -> Result<Self> {
        encoding.decode(s).map(Self::from_raw)
    }

    /// Encodes the raw integer with the process-wide default encoding.
    pub fn to_radix_string(&self) -> String {
        self.encode(&default_encoding())
    }

    /// Decodes with the process-wide default encoding.
    ///
    /// # Errors
    ///
    /// See [`Encoding::decode`].
    pub fn from_radix_string(s: &str) -> Result<Self> {
        Self::decode(&default_encoding(), s)
    }
}

impl From<u64> for SequentialId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SequentialId> for u64 {
    fn from(id: SequentialId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialId")
            .field("id", &self.id)
            .field("precision", &self.precision())
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("node_id", &self.node_id())
            .finish()
    }
}

impl FromStr for SequentialId {
    type Err = Error;

    /// Parses the decimal form produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Self::from_raw)
            .map_err(|e| match e.kind() {
                IntErrorKind::Empty => Error::EmptyInput,
                IntErrorKind::PosOverflow => Error::DecodeOverflow,
                _ => {
                    let (index, byte) = s
                        .bytes()
                        .enumerate()
                        .find(|(_, b)| !b.is_ascii_digit())
                        .unwrap_or((0, 0));
                    Error::InvalidDigit { byte, index }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_positions_second() {
        let p = Precision::Second;
        assert_eq!(SequentialId::from_components(p, 0, 0, 0).to_raw(), 0);
        assert_eq!(SequentialId::from_components(p, 0, 0, 1).to_raw(), 1 << 1);
        assert_eq!(SequentialId::from_components(p, 0, 1, 0).to_raw(), 1 << 11);
        assert_eq!(SequentialId::from_components(p, 1, 0, 0).to_raw(), 1 << 32);
    }

    #[test]
    fn field_positions_millisecond() {
        let p = Precision::Millisecond;
        assert_eq!(SequentialId::from_components(p, 0, 0, 0).to_raw(), 1);
        assert_eq!(
            SequentialId::from_components(p, 0, 0, 1).to_raw(),
            (1 << 1) | 1
        );
        assert_eq!(
            SequentialId::from_components(p, 0, 1, 0).to_raw(),
            (1 << 11) | 1
        );
        assert_eq!(
            SequentialId::from_components(p, 1, 0, 0).to_raw(),
            (1 << 22) | 1
        );
    }

    #[test]
    fn max_components_round_trip() {
        for p in [Precision::Second, Precision::Millisecond] {
            let id = SequentialId::from_components(
                p,
                p.max_timestamp(),
                p.max_sequence(),
                SequentialId::MAX_NODE_ID,
            );
            assert_eq!(id.precision(), p);
            assert_eq!(id.timestamp(), p.max_timestamp());
            assert_eq!(id.sequence(), p.max_sequence());
            assert_eq!(id.node_id(), SequentialId::MAX_NODE_ID);
        }
        let all = SequentialId::from_components(
            Precision::Millisecond,
            Precision::Millisecond.max_timestamp(),
            Precision::Millisecond.max_sequence(),
            SequentialId::MAX_NODE_ID,
        );
        assert_eq!(all.to_raw(), u64::MAX);
    }

    #[test]
    fn oversized_components_are_truncated() {
        let id = SequentialId::from_components(Precision::Millisecond, 3, 1 << 11, 1 << 10);
        assert_eq!(id.timestamp(), 3);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.node_id(), 0);
    }

    #[test]
    fn nil() {
        assert!(SequentialId::NIL.is_nil());
        assert!(SequentialId::default().is_nil());
        assert!(!SequentialId::from_components(Precision::Millisecond, 0, 0, 0).is_nil());
    }

    #[test]
    fn time_is_relative_to_epoch() {
        let id = SequentialId::from_components(Precision::Second, 5, 0, 0);
        assert_eq!(
            id.time(),
            UNIX_EPOCH + Duration::from_secs(1_546_300_805)
        );

        let id = SequentialId::from_components(Precision::Millisecond, 5_123, 0, 0);
        assert_eq!(
            id.time(),
            UNIX_EPOCH + Duration::from_millis(1_546_300_805_123)
        );
    }

    #[test]
    fn render_second() {
        let id = SequentialId::from_components(Precision::Second, 5, 0, 0);
        assert_eq!(id.render(), "2019-01-01-00-00-05-0-0-0");

        // 2019-02-01 00:00:00 is 31 days after the epoch
        let id = SequentialId::from_components(Precision::Second, 31 * 86_400 + 3_661, 9, 1023);
        assert_eq!(id.render(), "2019-02-01-01-01-01-9-1023-0");
    }

    #[test]
    fn render_millisecond() {
        let id = SequentialId::from_components(Precision::Millisecond, 5_007, 3, 12);
        assert_eq!(id.render(), "2019-01-01-00-00-05-007-3-12-1");
    }

    #[test]
    fn display_and_from_str() {
        let id = SequentialId::from_components(Precision::Second, 5, 1, 2);
        let s = id.to_string();
        assert_eq!(s, ((5_u64 << 32) | (1 << 11) | (2 << 1)).to_string());
        assert_eq!(s.parse::<SequentialId>(), Ok(id));
    }

    #[test]
    fn from_str_errors() {
        assert_eq!("".parse::<SequentialId>(), Err(Error::EmptyInput));
        assert_eq!(
            "18446744073709551616".parse::<SequentialId>(),
            Err(Error::DecodeOverflow)
        );
        assert_eq!(
            "12x4".parse::<SequentialId>(),
            Err(Error::InvalidDigit {
                byte: b'x',
                index: 2
            })
        );
    }

    #[test]
    fn radix_round_trip() {
        let id = SequentialId::from_components(Precision::Millisecond, 1_000_000, 77, 512);
        for enc in [Encoding::DEFAULT, Encoding::BASE32] {
            let s = id.encode(&enc);
            assert_eq!(SequentialId::decode(&enc, &s), Ok(id));
        }
        assert_eq!(
            SequentialId::from_radix_string(&id.to_radix_string()),
            Ok(id)
        );
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let p = Precision::Millisecond;
        let a = SequentialId::from_components(p, 10, 2047, 5);
        let b = SequentialId::from_components(p, 11, 0, 5);
        let c = SequentialId::from_components(p, 11, 1, 5);
        assert!(a < b && b < c);
    }
}

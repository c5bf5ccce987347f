use crate::{DEFAULT_ABC, Precision};

/// Settings for a [`SequentialGenerator`].
///
/// [`SequentialGenerator`]: crate::SequentialGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequentialConfig {
    /// Node ID stamped into every ID; must be at most 1023.
    pub node_id: u64,
    /// Timestamp precision.
    pub precision: Precision,
}

/// Settings for a [`ShortGenerator`].
///
/// [`ShortGenerator`]: crate::ShortGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortConfig {
    /// Worker ID; must fit in one data symbol (below 16 for 32-symbol
    /// alphabets, below 32 for 64-symbol alphabets).
    pub worker: u8,
    /// Base alphabet, shuffled with `seed` before use.
    pub alphabet: String,
    /// Shuffle seed.
    pub seed: u64,
}

impl Default for ShortConfig {
    fn default() -> Self {
        Self {
            worker: 0,
            alphabet: DEFAULT_ABC.to_owned(),
            seed: 1,
        }
    }
}

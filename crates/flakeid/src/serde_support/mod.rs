use serde::{Deserializer, Serializer};

/// Serializes a [`SequentialId`] as a radix string over the process-wide
/// default encoding, for use with `#[serde(with = "as_radix")]`.
///
/// Without the adapter, [`SequentialId`] serializes as its raw integer.
///
/// [`SequentialId`]: crate::SequentialId
pub mod as_radix {
    use super::{Deserializer, Serializer};
    use crate::SequentialId;

    /// Serialize an ID as a radix string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SequentialId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_radix_string())
    }

    /// Deserialize an ID from a radix string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a valid encoding of a `u64`.
    pub fn deserialize<'de, D>(d: D) -> Result<SequentialId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RadixVisitor;

        impl serde::de::Visitor<'_> for RadixVisitor {
            type Value = SequentialId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a radix encoded id")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                SequentialId::from_radix_string(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(RadixVisitor)
    }
}

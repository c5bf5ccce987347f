use crate::{
    RandSource,
    mutex::{Mutex, lock_unpoisoned},
};
use rand::{RngCore, SeedableRng, TryRngCore, rngs::OsRng, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// A `RandSource` that reads the operating system's entropy source and falls
/// back to a clock-seeded [`StdRng`] when that source fails.
///
/// The fallback is created lazily on the first failure and reused afterwards.
/// Callers observe no difference between the two paths other than the quality
/// of the seed.
#[derive(Debug, Default)]
pub struct OsFallbackRandom {
    fallback: Mutex<Option<StdRng>>,
}

impl OsFallbackRandom {
    /// Creates a source that tries the OS first on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the OS source has failed at least once.
    pub fn is_degraded(&self) -> bool {
        lock_unpoisoned(&self.fallback).is_some()
    }

    #[cold]
    #[inline(never)]
    fn fallback_u64(&self) -> u64 {
        let mut fallback = lock_unpoisoned(&self.fallback);
        fallback
            .get_or_insert_with(|| {
                #[cfg(feature = "tracing")]
                tracing::warn!("OS entropy source failed; falling back to a clock-seeded PRNG");
                StdRng::seed_from_u64(clock_seed())
            })
            .next_u64()
    }
}

impl RandSource<u64> for OsFallbackRandom {
    fn rand(&self) -> u64 {
        match OsRng.try_next_u64() {
            Ok(value) => value,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_e, "OS entropy read failed");
                self.fallback_u64()
            }
        }
    }
}

fn clock_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    // processes started in the same nanosecond must still diverge
    (now.as_nanos() as u64) ^ (u64::from(std::process::id()) << 32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_vary() {
        let rng = OsFallbackRandom::new();
        let draws: Vec<u64> = (0..16).map(|_| rng.rand()).collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn fallback_produces_values() {
        let rng = OsFallbackRandom::new();
        let a = rng.fallback_u64();
        let b = rng.fallback_u64();
        assert!(rng.is_degraded());
        assert_ne!(a, b);
    }
}

use super::{SequentialGenerator, SequentialState};
use crate::{
    Precision, Result, SequentialId, SystemClock,
    mutex::{RwLock, read_cloned, replace},
};
use std::sync::{Arc, LazyLock};

static DEFAULT_GENERATOR: LazyLock<RwLock<Arc<SequentialGenerator>>> = LazyLock::new(|| {
    RwLock::new(Arc::new(SequentialGenerator::from_parts(
        0,
        Precision::Second,
        SystemClock::default(),
        SequentialState::new_shared(),
    )))
});

/// Returns the process-wide default generator (node 0, second precision until
/// replaced).
///
/// Prefer constructing a [`SequentialGenerator`] and passing it where it is
/// needed; the default exists for call sites without access to one.
pub fn default_generator() -> Arc<SequentialGenerator> {
    read_cloned(&DEFAULT_GENERATOR)
}

/// Publishes `generator` as the process-wide default and returns the previous
/// one.
///
/// Calls that already fetched the previous generator finish against it.
pub fn set_default(generator: SequentialGenerator) -> Arc<SequentialGenerator> {
    replace(&DEFAULT_GENERATOR, Arc::new(generator))
}

/// Issues an ID from the default generator.
///
/// # Errors
///
/// See [`SequentialGenerator::try_generate`].
pub fn generate() -> Result<SequentialId> {
    default_generator().try_generate()
}

/// Issues an ID from the default generator, panicking on error.
///
/// # Panics
///
/// Panics if [`generate`] fails.
#[track_caller]
pub fn must_generate() -> SequentialId {
    default_generator().must_generate()
}

use crate::Result;

/// A minimal interface shared by every ID generator in this crate.
///
/// Generators are passive, thread-safe objects: each call runs one short
/// critical section and returns immediately. Nothing sleeps or waits for the
/// clock.
pub trait IdGenerator {
    /// The issued ID type.
    type Id;

    /// Issues the next ID.
    ///
    /// # Errors
    ///
    /// Returns an error when the clock moved backwards, the current tick is
    /// exhausted, the timestamp budget is spent, or the lock was poisoned.
    fn try_generate(&self) -> Result<Self::Id>;

    /// Issues the next ID, panicking on error.
    ///
    /// Intended for start-up paths where a failure means the process is
    /// misconfigured.
    ///
    /// # Panics
    ///
    /// Panics with the error's message if [`IdGenerator::try_generate`]
    /// fails.
    #[track_caller]
    fn must_generate(&self) -> Self::Id {
        match self.try_generate() {
            Ok(id) => id,
            Err(e) => panic!("failed to generate id: {e}"),
        }
    }
}

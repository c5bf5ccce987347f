#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard, RwLock};
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard, RwLock};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// Only for state that stays consistent across a panic (a seeded RNG, a
/// published pointer). Generator state goes through `lock()?` instead so that
/// poisoning surfaces as [`crate::Error::LockPoisoned`].
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    #[cfg(feature = "parking-lot")]
    {
        mutex.lock()
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Clones the value behind `lock` under a short read lock.
pub(crate) fn read_cloned<T: Clone>(lock: &RwLock<T>) -> T {
    #[cfg(feature = "parking-lot")]
    {
        lock.read().clone()
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        lock.read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Replaces the value behind `lock`, returning the previous one.
pub(crate) fn replace<T>(lock: &RwLock<T>, value: T) -> T {
    #[cfg(feature = "parking-lot")]
    let mut guard = lock.write();
    #[cfg(not(feature = "parking-lot"))]
    let mut guard = lock
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    core::mem::replace(&mut *guard, value)
}

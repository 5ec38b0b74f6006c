//! Utilities.
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if another thread panicked while holding it.
///
/// Guarded values in this crate stay consistent across a panic, e.g., a buffer
/// swap or a join handle.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

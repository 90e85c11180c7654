//! Shared-ownership helpers

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, lockable value
pub type Shared<T> = Arc<Mutex<T>>;

/// Wrap a value for sharing
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Scene data is plain state with no cross-field invariants that a panic
/// could leave half-applied, so poisoning is not treated as fatal.
pub fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

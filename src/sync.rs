//! # Synchronization Utilities
//!
//! Mutex handling for the state egal shares between threads: the chroma
//! floor cache and the logger's output sink.
//!
//! A mutex is poisoned when a thread panics while holding it. Both guarded
//! values stay valid under poison: a floor cache holds only completed
//! `(key, floor)` pairs, and a sink at worst holds a partially written line.
//! So every lock in the crate recovers instead of propagating the poison.
//!
//! | Scenario | Function |
//! |----------|----------|
//! | Production code | [`lock_recover`] |
//! | Test code | `.lock().unwrap()` |
//!
//! ```rust
//! use std::sync::Mutex;
//! use egal::sync::lock_recover;
//!
//! let data = Mutex::new(vec![1, 2, 3]);
//! let guard = lock_recover(&data);
//! assert_eq!(guard.len(), 3);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering from poison if necessary.
///
/// # Panics
///
/// This function never panics. It always recovers from poison.
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Port implementations.
//!
//! `live` talks to the real backend, disk and clock; `memory` keeps
//! everything in process for tests and scripted sessions.

pub mod live;
pub mod memory;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

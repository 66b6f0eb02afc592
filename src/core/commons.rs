// src/core/commons.rs

// Handlers never run while any of these locks is held, so a poisoned lock still
// guards a consistent value and is recovered rather than propagated.

use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("Recovering from a poisoned lock (read)");
        PoisonError::into_inner(poisoned)
    })
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("Recovering from a poisoned lock (write)");
        PoisonError::into_inner(poisoned)
    })
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering from a poisoned lock");
        PoisonError::into_inner(poisoned)
    })
}

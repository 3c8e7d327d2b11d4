//! Synchronization primitives used across the crate.
//!
//! Thin wrapper so call sites stay uniform: `parking_lot` locks do not
//! poison, which matches how lock poisoning would have to be treated in a
//! real-time system anyway (not recoverable).

pub use std::sync::Arc;

pub type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

pub struct Mutex<T> {
    inner: parking_lot::Mutex<T>,
}

impl<T> Mutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: parking_lot::Mutex::new(value),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }
}

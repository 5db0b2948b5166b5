//! Reentrancy guard for plugin dispatch
//!
//! The lock has two states: idle and engaged. It is engaged for exactly the
//! dynamic extent of one in-flight dispatch and must be observed idle at
//! every other moment, including after a failed dispatch. Release is tied
//! to a guard value's `Drop`, so every exit path - normal return, early
//! `?`, plugin failure - releases it.

use std::cell::Cell;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Dispatch already in progress: nested invocation rejected")]
pub struct LockEngaged;

/// Binary execution lock serializing dispatch
///
/// "Concurrency" here is nested invocation within one logical call chain,
/// not parallel threads: a plugin may attempt to call back into the registry
/// before the outer dispatch completes. Engaging an already-engaged lock
/// fails, which is what defeats that callback.
#[derive(Debug, Default)]
pub struct DispatchLock {
    engaged: Cell<bool>,
}

impl DispatchLock {
    /// Creates a lock in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a dispatch is in flight
    pub fn is_engaged(&self) -> bool {
        self.engaged.get()
    }

    /// Engages the lock for the scope of the returned guard
    ///
    /// Fails with [`LockEngaged`] if a dispatch is already in flight. The
    /// lock returns to idle when the guard is dropped.
    pub fn engage(&self) -> Result<LockGuard<'_>, LockEngaged> {
        if self.engaged.get() {
            return Err(LockEngaged);
        }
        self.engaged.set(true);
        Ok(LockGuard { lock: self })
    }
}

/// Scoped acquisition of a [`DispatchLock`]
///
/// Holding the guard means the lock is engaged; dropping it releases the
/// lock unconditionally.
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a DispatchLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.engaged.set(false);
    }
}

//! # Exclusive State Access
//!
//! A fair mutex plus a same-thread reentrancy check. Waiters are admitted in
//! FIFO order; a thread that calls back in while it already holds the state
//! gets `ReentrantCall` instead of deadlocking.

use parking_lot::{FairMutex, FairMutexGuard, Mutex};
use shared_types::{HeraldError, HeraldResult};
use std::ops::{Deref, DerefMut};
use std::thread::{self, ThreadId};
use tracing::warn;

/// State guarded for one-operation-at-a-time access.
#[derive(Debug)]
pub struct Exclusive<T> {
    state: FairMutex<T>,
    holder: Mutex<Option<ThreadId>>,
}

impl<T> Exclusive<T> {
    /// Wraps `state`.
    pub fn new(state: T) -> Self {
        Self {
            state: FairMutex::new(state),
            holder: Mutex::new(None),
        }
    }

    /// Waits for exclusive access.
    ///
    /// # Errors
    /// `ReentrantCall` if the current thread already holds access.
    pub fn enter(&self) -> HeraldResult<Session<'_, T>> {
        let me = thread::current().id();
        if *self.holder.lock() == Some(me) {
            warn!("reentrant call rejected");
            return Err(HeraldError::ReentrantCall);
        }
        let guard = self.state.lock();
        *self.holder.lock() = Some(me);
        Ok(Session {
            guard,
            holder: &self.holder,
        })
    }
}

/// Exclusive access for the duration of one operation. Released on drop,
/// on every exit path.
pub struct Session<'a, T> {
    guard: FairMutexGuard<'a, T>,
    holder: &'a Mutex<Option<ThreadId>>,
}

impl<T> Drop for Session<'_, T> {
    fn drop(&mut self) {
        // Runs before `guard` is released.
        *self.holder.lock() = None;
    }
}

impl<T> Deref for Session<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for Session<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

//! Monitor: a mutex with attached condition variables.
//!
//! [`Monitor`] owns the data it protects; the only way to touch the data is
//! through a [`MonitorGuard`], so every access is serialized by
//! construction. [`Condition`] is the waiter-notification half: a thread
//! holding the guard can atomically release the lock and block until
//! notified, then re-acquire before continuing.
//!
//! Wakeups may be spurious or caused by an unrelated state change, so a
//! wait must always sit in a loop that re-checks its predicate:
//!
//! ```ignore
//! let ready = Monitor::new(false);
//! let cond = Condition::new();
//!
//! // Waiter:
//! let mut guard = ready.lock();
//! while !*guard {
//!     guard = cond.wait(guard);
//! }
//!
//! // Notifier:
//! *ready.lock() = true;
//! cond.notify_one();
//! ```
//!
//! A `Condition` must always be paired with the same `Monitor`; waiting on
//! one condition with guards from two different monitors is a usage error
//! and may panic.
//!
//! # Poisoning
//!
//! A panic while holding the lock poisons it. Tandem treats this as a fatal
//! host failure, not a recoverable error: subsequent lock attempts panic
//! rather than returning a poison result.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, TryLockError};

/// An exclusive lock owning the data it protects.
///
/// At most one thread holds the lock at any instant. Releasing happens on
/// guard drop; releasing a lock that is not held is unrepresentable.
#[derive(Debug, Default)]
pub struct Monitor<T> {
    data: Mutex<T>,
}

impl<T> Monitor<T> {
    /// Creates a new monitor protecting `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            data: Mutex::new(value),
        }
    }

    /// Blocks the calling thread until it is the sole holder of the lock.
    #[must_use]
    pub fn lock(&self) -> MonitorGuard<'_, T> {
        MonitorGuard {
            inner: self.data.lock().expect("monitor poisoned"),
        }
    }

    /// Attempts to take the lock without blocking.
    ///
    /// Returns `None` if another thread currently holds it.
    #[must_use]
    pub fn try_lock(&self) -> Option<MonitorGuard<'_, T>> {
        match self.data.try_lock() {
            Ok(inner) => Some(MonitorGuard { inner }),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(_)) => panic!("monitor poisoned"),
        }
    }

    /// Consumes the monitor and returns the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner().expect("monitor poisoned")
    }
}

/// Exclusive access to the data protected by a [`Monitor`].
///
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct MonitorGuard<'a, T> {
    inner: MutexGuard<'a, T>,
}

impl<T> Deref for MonitorGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for MonitorGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

/// A waiter-notification mechanism bound to a [`Monitor`] at its use sites.
///
/// Several logical wait conditions can be derived from one lock by pairing
/// it with several `Condition` values (for a channel: "space available" and
/// "item available").
#[derive(Debug, Default)]
pub struct Condition {
    cv: Condvar,
}

impl Condition {
    /// Creates a new condition with no waiters.
    #[must_use]
    pub const fn new() -> Self {
        Self { cv: Condvar::new() }
    }

    /// Atomically releases the guard's lock and blocks until notified,
    /// then re-acquires the lock before returning.
    ///
    /// Callers must re-check their predicate after this returns: wakeups
    /// may be spurious or triggered by an unrelated state change.
    #[must_use]
    pub fn wait<'a, T>(&self, guard: MonitorGuard<'a, T>) -> MonitorGuard<'a, T> {
        MonitorGuard {
            inner: self.cv.wait(guard.inner).expect("monitor poisoned"),
        }
    }

    /// Blocks until `condition` returns `false`, re-checking it after every
    /// wakeup.
    #[must_use]
    pub fn wait_while<'a, T, F>(&self, guard: MonitorGuard<'a, T>, condition: F) -> MonitorGuard<'a, T>
    where
        F: FnMut(&mut T) -> bool,
    {
        MonitorGuard {
            inner: self
                .cv
                .wait_while(guard.inner, condition)
                .expect("monitor poisoned"),
        }
    }

    /// Wakes one thread blocked in [`wait`](Self::wait) on this condition.
    ///
    /// Has no effect if no thread is waiting.
    pub fn notify_one(&self) {
        self.cv.notify_one();
    }

    /// Wakes every thread blocked in [`wait`](Self::wait) on this condition.
    pub fn notify_all(&self) {
        self.cv.notify_all();
    }
}

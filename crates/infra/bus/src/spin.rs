//! Thread-identity spin lock
//!
//! Busy-wait mutual exclusion for very short, rarely contended critical
//! sections. The lock cell holds the owning thread's token (0 = unowned),
//! so release is a compare-exchange from the owner's own identity: a
//! release attempt by any other thread changes nothing.
//!
//! There is no backoff and no yielding; never hold this lock across I/O or
//! anything that can block. Re-locking from the owning thread deadlocks.

use std::cell::UnsafeCell;
use std::hint;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

const UNOWNED: u64 = 0;

/// Process-unique nonzero token for the calling thread.
///
/// `std::thread::ThreadId` has no atomic representation, so tokens are
/// handed out lazily from a global counter starting at 1.
fn thread_token() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static TOKEN: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    TOKEN.with(|token| *token)
}

/// Busy-wait mutual exclusion lock guarding a value of type `T`.
pub struct SpinLock<T> {
    owner: AtomicU64,
    value: UnsafeCell<T>,
}

// Mutual exclusion through `owner` makes the inner value safe to share.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Create an unowned lock around `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            owner: AtomicU64::new(UNOWNED),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquire the lock, spinning until it is free.
    ///
    /// Unbounded spin: the call returns only once the CAS from unowned to
    /// this thread's token succeeds.
    pub fn lock(&self) -> SpinGuard<'_, T> {
        let token = thread_token();
        while self
            .owner
            .compare_exchange_weak(UNOWNED, token, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }
        SpinGuard { lock: self, token }
    }

    /// Try to acquire the lock with a single CAS attempt.
    pub fn try_lock(&self) -> Option<SpinGuard<'_, T>> {
        let token = thread_token();
        self.owner
            .compare_exchange(UNOWNED, token, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinGuard { lock: self, token })
    }

    /// True while any thread holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.owner.load(Ordering::Relaxed) != UNOWNED
    }

    /// Direct access when holding the only reference; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consume the lock and return the guarded value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.try_lock() {
            Some(guard) => f.debug_struct("SpinLock").field("value", &*guard).finish(),
            None => f.debug_struct("SpinLock").field("value", &"<locked>").finish(),
        }
    }
}

/// RAII guard; releases the lock on drop.
pub struct SpinGuard<'a, T> {
    lock: &'a SpinLock<T>,
    token: u64,
}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Exclusive ownership for the guard's lifetime is established by
        // the acquire CAS in lock()/try_lock().
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    fn drop(&mut self) {
        // Release only succeeds from the owner's own token.
        let _ = self.lock.owner.compare_exchange(
            self.token,
            UNOWNED,
            Ordering::Release,
            Ordering::Relaxed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_guards_value() {
        let lock = SpinLock::new(41);
        {
            let mut guard = lock.lock();
            *guard += 1;
        }
        assert_eq!(*lock.lock(), 42);
    }

    #[test]
    fn test_try_lock_while_held() {
        let lock = SpinLock::new(());
        let guard = lock.lock();
        assert!(lock.is_locked());

        std::thread::scope(|s| {
            s.spawn(|| {
                assert!(lock.try_lock().is_none());
            });
        });

        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.try_lock().is_some());
    }

    #[test]
    fn test_get_mut_and_into_inner() {
        let mut lock = SpinLock::new(String::from("a"));
        lock.get_mut().push('b');
        assert_eq!(lock.into_inner(), "ab");
    }

    #[test]
    fn test_contended_counter() {
        let lock = SpinLock::new(0u64);
        let threads = 4u64;
        let per_thread = 10_000u64;

        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    for _ in 0..per_thread {
                        *lock.lock() += 1;
                    }
                });
            }
        });

        assert_eq!(*lock.lock(), threads * per_thread);
    }
}

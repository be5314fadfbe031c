//! Fixed-capacity single-producer/single-consumer ring
//!
//! - Zero allocations after construction
//! - Capacity rounds up to the next power of two; slots are addressed by
//!   bitmask over two monotonically increasing counters
//! - Producer writes `back`, consumer writes `front`; each side publishes
//!   with a release store and observes the other with an acquire load, so a
//!   consumer that sees an advanced `back` also sees the slot write
//! - Each side keeps a cached copy of the opposite counter to avoid
//!   touching a contended cache line on every call
//!
//! The two-fixed-threads contract is enforced by ownership: the queue is
//! split into a [`Producer`] and a [`Consumer`] handle, neither of which is
//! `Clone`.

use crossbeam::utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Error returned by [`Producer::push`] on a full ring; carries the
/// rejected value back so the producer can retry or drop it.
#[derive(Error)]
#[error("queue full")]
pub struct Full<T>(pub T);

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

struct Shared<T> {
    front: CachePadded<AtomicUsize>,
    back: CachePadded<AtomicUsize>,
    mask: usize,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// The ring is shared by exactly one producer and one consumer thread; slot
// ownership is handed over through the release/acquire counter protocol.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Shared<T> {
    fn capacity(&self) -> usize {
        self.mask + 1
    }

    fn slot(&self, index: usize) -> *mut T {
        self.slots[index & self.mask].get().cast()
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let mut front = *self.front.get_mut();
        let back = *self.back.get_mut();
        while front != back {
            // Slots in [front, back) hold initialized values nobody popped.
            unsafe { ptr::drop_in_place(self.slot(front)) };
            front = front.wrapping_add(1);
        }
    }
}

/// Factory for SPSC ring queues.
pub struct SpscQueue;

impl SpscQueue {
    /// Create a ring with at least `min_capacity` slots, rounded up to the
    /// next power of two (minimum 1), split into its two thread handles.
    #[must_use]
    pub fn with_capacity<T>(min_capacity: usize) -> (Producer<T>, Consumer<T>) {
        let capacity = min_capacity.max(1).next_power_of_two();
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        let shared = Arc::new(Shared {
            front: CachePadded::new(AtomicUsize::new(0)),
            back: CachePadded::new(AtomicUsize::new(0)),
            mask: capacity - 1,
            slots,
        });
        (
            Producer {
                shared: Arc::clone(&shared),
                cached_front: 0,
            },
            Consumer {
                shared,
                cached_back: 0,
            },
        )
    }
}

/// Producing half of the ring; owned by exactly one thread.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
    cached_front: usize,
}

impl<T> Producer<T> {
    /// Enqueue a value.
    ///
    /// # Errors
    /// Returns [`Full`] with the value when the ring is at capacity; no
    /// slot is written in that case. Never blocks.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        let back = self.shared.back.load(Ordering::Relaxed);
        if back.wrapping_sub(self.cached_front) == self.shared.capacity() {
            self.cached_front = self.shared.front.load(Ordering::Acquire);
            if back.wrapping_sub(self.cached_front) == self.shared.capacity() {
                return Err(Full(value));
            }
        }
        unsafe { ptr::write(self.shared.slot(back), value) };
        self.shared.back.store(back.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Values currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        let back = self.shared.back.load(Ordering::Acquire);
        back.wrapping_sub(self.shared.front.load(Ordering::Acquire))
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the next `push` would fail.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Effective (rounded-up) slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }
}

/// Consuming half of the ring; owned by exactly one thread.
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
    cached_back: usize,
}

impl<T> Consumer<T> {
    /// True when a value is visible at the front, refreshing the cached
    /// producer counter once if needed.
    #[inline]
    fn occupied(&mut self, front: usize) -> bool {
        if self.cached_back == front {
            self.cached_back = self.shared.back.load(Ordering::Acquire);
            if self.cached_back == front {
                return false;
            }
        }
        true
    }

    /// Dequeue the oldest value, or `None` when the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let front = self.shared.front.load(Ordering::Relaxed);
        if !self.occupied(front) {
            return None;
        }
        let value = unsafe { ptr::read(self.shared.slot(front)) };
        self.shared
            .front
            .store(front.wrapping_add(1), Ordering::Release);
        Some(value)
    }

    /// Borrow the oldest value without consuming it.
    #[inline]
    pub fn front(&mut self) -> Option<&T> {
        let front = self.shared.front.load(Ordering::Relaxed);
        if !self.occupied(front) {
            return None;
        }
        Some(unsafe { &*self.shared.slot(front) })
    }

    /// Drop the oldest value in place without returning it.
    ///
    /// Returns the number of values still queued afterwards; 0 when the
    /// ring was already empty.
    pub fn discard(&mut self) -> usize {
        match self.pop() {
            Some(value) => {
                drop(value);
                self.len()
            }
            None => 0,
        }
    }

    /// Values currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        let back = self.shared.back.load(Ordering::Acquire);
        back.wrapping_sub(self.shared.front.load(Ordering::Acquire))
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effective (rounded-up) slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as Counter;

    #[test]
    fn test_basic_push_pop() {
        let (mut tx, mut rx) = SpscQueue::with_capacity::<i32>(4);

        assert!(rx.is_empty());
        assert_eq!(tx.capacity(), 4);

        assert!(tx.push(1).is_ok());
        assert!(tx.push(2).is_ok());
        assert!(tx.push(3).is_ok());
        assert!(tx.push(4).is_ok());
        assert!(tx.is_full());
        assert!(matches!(tx.push(5), Err(Full(5))));

        assert_eq!(rx.pop(), Some(1));
        assert_eq!(rx.pop(), Some(2));
        assert_eq!(rx.pop(), Some(3));
        assert_eq!(rx.pop(), Some(4));
        assert_eq!(rx.pop(), None);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_capacity_rounds_up() {
        let (mut tx, rx) = SpscQueue::with_capacity::<u8>(5);
        assert_eq!(rx.capacity(), 8);

        let mut pushed = 0;
        for i in 0..9u8 {
            if tx.push(i).is_ok() {
                pushed += 1;
            }
        }
        assert_eq!(pushed, 8);

        let (tx_min, _rx_min) = SpscQueue::with_capacity::<u8>(0);
        assert_eq!(tx_min.capacity(), 1);
    }

    #[test]
    fn test_wrap_around() {
        let (mut tx, mut rx) = SpscQueue::with_capacity::<usize>(4);

        // Fill and empty multiple times to exercise index wrapping
        for round in 0..10 {
            for i in 0..3 {
                assert!(tx.push(round * 10 + i).is_ok());
            }
            for i in 0..3 {
                assert_eq!(rx.pop(), Some(round * 10 + i));
            }
        }
    }

    #[test]
    fn test_front_and_discard() {
        let (mut tx, mut rx) = SpscQueue::with_capacity::<i32>(4);
        assert!(rx.front().is_none());
        assert_eq!(rx.discard(), 0);

        tx.push(10).unwrap();
        tx.push(20).unwrap();
        assert_eq!(rx.front(), Some(&10));
        assert_eq!(rx.front(), Some(&10)); // peeking does not consume
        assert_eq!(rx.discard(), 1);
        assert_eq!(rx.pop(), Some(20));
    }

    #[test]
    fn test_drops_exactly_once() {
        static DROPS: Counter = Counter::new(0);

        struct Tracked;
        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::Relaxed);
            }
        }

        let (mut tx, mut rx) = SpscQueue::with_capacity::<Tracked>(4);
        for _ in 0..3 {
            tx.push(Tracked).unwrap();
        }
        drop(rx.pop());
        assert_eq!(DROPS.load(Ordering::Relaxed), 1);

        drop(tx);
        drop(rx);
        assert_eq!(DROPS.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_concurrent_fifo() {
        let (mut tx, mut rx) = SpscQueue::with_capacity::<usize>(1024);
        let count = 100_000usize;

        let producer = std::thread::spawn(move || {
            for i in 0..count {
                let mut value = i;
                while let Err(Full(v)) = tx.push(value) {
                    value = v;
                    std::thread::yield_now();
                }
            }
        });

        let consumer = std::thread::spawn(move || {
            let mut received = Vec::with_capacity(count);
            while received.len() < count {
                match rx.pop() {
                    Some(value) => received.push(value),
                    None => std::thread::yield_now(),
                }
            }
            received
        });

        producer.join().unwrap();
        let received = consumer.join().unwrap();

        for (i, value) in received.iter().enumerate() {
            assert_eq!(*value, i);
        }
    }
}

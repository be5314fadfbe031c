//! Integration tests for the SPSC ring and spin lock

use bus::{Full, SpinLock, SpscQueue};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(1, 1)]
#[case(2, 2)]
#[case(3, 4)]
#[case(5, 8)]
#[case(8, 8)]
#[case(1000, 1024)]
fn capacity_rounds_to_power_of_two(#[case] requested: usize, #[case] effective: usize) {
    let (tx, rx) = SpscQueue::with_capacity::<u64>(requested);
    assert_eq!(tx.capacity(), effective);
    assert_eq!(rx.capacity(), effective);
}

#[test]
fn size_tracks_pushes_minus_pops() {
    let (mut tx, mut rx) = SpscQueue::with_capacity::<u32>(8);

    for i in 0..5 {
        tx.push(i).unwrap();
    }
    assert_eq!(tx.len(), 5);
    assert_eq!(rx.len(), 5);

    rx.pop().unwrap();
    rx.pop().unwrap();
    assert_eq!(tx.len(), 3);

    tx.push(99).unwrap();
    assert_eq!(rx.len(), 4);
}

#[test]
fn full_queue_hands_the_value_back() {
    let (mut tx, _rx) = SpscQueue::with_capacity::<String>(1);
    tx.push("first".to_string()).unwrap();

    match tx.push("second".to_string()) {
        Err(Full(rejected)) => assert_eq!(rejected, "second"),
        Ok(()) => panic!("push into a full queue must fail"),
    }
}

#[test]
fn cross_thread_handoff_preserves_order() {
    let (mut tx, mut rx) = SpscQueue::with_capacity::<u64>(16);
    let total = 50_000u64;

    let producer = std::thread::spawn(move || {
        for i in 0..total {
            let mut value = i;
            while let Err(Full(v)) = tx.push(value) {
                value = v;
                std::thread::yield_now();
            }
        }
    });

    let mut expected = 0u64;
    while expected < total {
        match rx.pop() {
            Some(value) => {
                assert_eq!(value, expected);
                expected += 1;
            }
            None => std::thread::yield_now(),
        }
    }
    producer.join().unwrap();
}

proptest! {
    /// Any single-threaded interleaving of pushes and pops is FIFO with
    /// failures exactly on full/empty.
    #[test]
    fn fifo_under_arbitrary_interleaving(ops in prop::collection::vec(any::<bool>(), 1..200)) {
        let (mut tx, mut rx) = SpscQueue::with_capacity::<u32>(4);
        let mut model = std::collections::VecDeque::new();
        let mut next = 0u32;

        for is_push in ops {
            if is_push {
                match tx.push(next) {
                    Ok(()) => {
                        prop_assert!(model.len() < tx.capacity());
                        model.push_back(next);
                    }
                    Err(Full(_)) => prop_assert_eq!(model.len(), tx.capacity()),
                }
                next += 1;
            } else {
                prop_assert_eq!(rx.pop(), model.pop_front());
            }
            prop_assert_eq!(rx.len(), model.len());
        }
    }
}

#[test]
fn spin_lock_excludes_second_thread() {
    let lock = SpinLock::new(0u32);
    let guard = lock.lock();

    std::thread::scope(|s| {
        s.spawn(|| {
            assert!(lock.try_lock().is_none());
        });
    });

    drop(guard);

    std::thread::scope(|s| {
        s.spawn(|| {
            assert!(lock.try_lock().is_some());
        });
    });
}

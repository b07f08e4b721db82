#![cfg(test)]

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::util::alloc::{CountedDrop, PanicOnClone};
use crate::util::panic::assert_panics;

#[test]
fn test_empty_does_not_allocate() {
    let a: SharedArray<u32> = SharedArray::new();
    let b: SharedArray<u32> = SharedArray::default();
    assert!(a.ptr_eq(&b), "Empty arrays should share the sentinel.");
    assert!(a.is_shared());
    assert_eq!(a.capacity(), 0);

    let c: SharedArray<u32> = SharedArray::with_capacity(0);
    assert!(c.ptr_eq(&a));
}

#[test]
fn test_clone_shares_until_write() {
    let a = SharedArray::from_slice(&[1, 2, 3]);
    let mut b = a.clone();
    assert_eq!(a.as_ptr(), b.as_ptr());
    assert!(a.is_shared() && b.is_shared());
    assert_eq!(a.inner.buf.refs(), 2);

    b.push(4);
    assert_ne!(a.as_ptr(), b.as_ptr(), "Writing should detach the buffer.");
    assert_eq!(a, [1, 2, 3]);
    assert_eq!(b, [1, 2, 3, 4]);
    assert!(!a.is_shared() && !b.is_shared());
}

#[test]
fn test_reads_never_detach() {
    let a = SharedArray::from_slice(&[1, 2, 3]);
    let b = a.clone();
    assert_eq!(b[1], 2);
    assert_eq!(b.iter().sum::<i32>(), 6);
    assert_eq!(b.slice(1, 2).len(), 2);
    assert!(a.ptr_eq(&b));
}

#[test]
fn test_growth_policy() {
    let mut arr = SharedArray::new();
    arr.push(0);
    assert_eq!(arr.capacity(), 5);
    for i in 1..5 {
        arr.push(i);
    }
    assert_eq!(arr.capacity(), 5, "Pushing within capacity shouldn't reallocate.");
    arr.push(5);
    assert_eq!(arr.capacity(), 10);

    let arr = SharedArray::from_slice(&[0u8; 100]);
    assert_eq!(arr.capacity(), 112);

    let mut arr = SharedArray::<u8>::new();
    arr.reserve_exact(3);
    assert_eq!(arr.capacity(), 3);
    arr.reserve(1);
    assert_eq!(arr.capacity(), 3, "Reserving within capacity shouldn't reallocate.");
    arr.append(&[1, 2, 3, 4]);
    assert_eq!(arr.capacity(), 8);
    arr.shrink_to_fit();
    assert_eq!(arr.capacity(), 4);
}

#[test]
fn test_insert() {
    let mut arr = SharedArray::from_slice(&[1, 2, 3]);
    arr.insert(1, &[42]);
    assert_eq!(arr, [1, 42, 2, 3]);
    arr.insert(4, &[5, 6]);
    assert_eq!(arr, [1, 42, 2, 3, 5, 6]);
    arr.insert(0, &[]);
    assert_eq!(arr.len(), 6);
    arr.insert_one(0, 0);
    assert_eq!(arr, [0, 1, 42, 2, 3, 5, 6]);

    assert_panics!({ arr.insert(8, &[1]) });
    assert_eq!(arr.len(), 7, "A rejected insert shouldn't change anything.");
}

#[test]
fn test_insert_into_shared() {
    let a = SharedArray::from_slice(&[1, 2, 3]);
    let mut b = a.clone();
    b.insert(1, &[42]);
    assert_eq!(a, [1, 2, 3]);
    assert_eq!(b, [1, 42, 2, 3]);
}

#[test]
fn test_insert_remove_round_trip() {
    let original = SharedArray::from_slice(&[1, 2, 3, 4, 5]);
    for index in 0..=original.len() {
        let mut arr = original.clone();
        arr.insert(index, &[10, 20, 30]);
        assert_eq!(arr.len(), 8);
        arr.remove(index, 3);
        assert_eq!(arr, original);
    }
}

#[test]
fn test_remove() {
    let mut arr = SharedArray::from_slice(&[1, 2, 3, 4, 5]);
    arr.remove(0, 0);
    assert_eq!(arr.len(), 5);
    arr.remove(1, 2);
    assert_eq!(arr, [1, 4, 5]);
    arr.remove(3, 10);
    assert_eq!(arr, [1, 4, 5], "Removing at the end should do nothing.");
    arr.remove(1, usize::MAX);
    assert_eq!(arr, [1]);

    assert_panics!({ arr.remove(2, 1) });
}

#[test]
fn test_remove_all_of_shared() {
    let a = SharedArray::from_slice(&[1, 2, 3]);
    let mut b = a.clone();
    b.remove(0, 3);
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 0, "Should release the shared buffer for the sentinel.");
    assert_eq!(a.inner.buf.refs(), 1);
}

#[test]
fn test_assign_and_overwrite() {
    let mut arr = SharedArray::with_capacity(8);
    arr.assign(&[1, 2, 3, 4]);
    let ptr = arr.as_ptr();
    arr.assign(&[9, 8]);
    assert_eq!(arr, [9, 8]);
    assert_eq!(arr.as_ptr(), ptr, "Assigning within capacity should reuse the buffer.");

    arr.overwrite(1, &[7, 6, 5]);
    assert_eq!(arr, [9, 7, 6, 5]);
    arr.overwrite(4, &[4]);
    assert_eq!(arr, [9, 7, 6, 5, 4]);
    arr.overwrite(0, &[0]);
    assert_eq!(arr, [0, 7, 6, 5, 4]);

    let shared = arr.clone();
    arr.overwrite(3, &[1, 2, 3]);
    assert_eq!(arr, [0, 7, 6, 1, 2, 3]);
    assert_eq!(shared, [0, 7, 6, 5, 4]);

    assert_panics!({ arr.overwrite(7, &[1]) });

    arr.assign(&[]);
    assert!(arr.is_empty());
}

#[test]
fn test_pop_and_truncate() {
    let mut arr = SharedArray::from_slice(&[1, 2, 3, 4]);
    assert_eq!(arr.pop(), Some(4));

    let shared = arr.clone();
    assert_eq!(arr.pop(), Some(3));
    assert_eq!(arr, [1, 2]);
    assert_eq!(shared, [1, 2, 3]);

    arr.truncate(5);
    assert_eq!(arr.len(), 2);
    arr.truncate(0);
    assert_eq!(arr.pop(), None);
}

#[test]
fn test_clear_is_idempotent() {
    let mut arr = SharedArray::from_slice(&[1, 2, 3]);
    let cap = arr.capacity();
    arr.clear();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), cap, "An unshared clear should keep the capacity.");
    arr.clear();
    assert!(arr.is_empty());

    let mut a = SharedArray::from_slice(&[1, 2, 3]);
    let b = a.clone();
    a.clear();
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 0);
    assert_eq!(b, [1, 2, 3]);
}

#[test]
fn test_drops_once() {
    let counter = CountedDrop::new(0);
    {
        let mut arr = SharedArray::new();
        for _ in 0..10 {
            arr.push(counter.clone());
        }
        let shared = arr.clone();
        arr.remove(0, 5);
        assert_eq!(counter.drops(), 0, "The shared buffer should still hold every value.");
        drop(shared);
        assert_eq!(counter.drops(), 10);
        arr.truncate(2);
        assert_eq!(counter.drops(), 13);
    }
    assert_eq!(counter.drops(), 15);
}

#[test]
fn test_clear_drops_values() {
    let counter = CountedDrop::new(0);
    let mut arr = SharedArray::from_slice(&[counter.clone(), counter.clone(), counter.clone()]);
    // The three temporaries above have been dropped.
    assert_eq!(counter.drops(), 3);
    arr.clear();
    assert_eq!(counter.drops(), 6);
    drop(arr);
    assert_eq!(counter.drops(), 6);
}

#[test]
fn test_panicking_clone_leaves_array_intact() {
    let budget = Rc::new(RefCell::new(usize::MAX));
    let value = |value| PanicOnClone {
        value,
        budget: budget.clone(),
    };

    let mut arr = SharedArray::from([value(1), value(2), value(3)]);
    let shared = arr.clone();

    *budget.borrow_mut() = 1;
    assert_panics!({ arr.push(value(4)) });
    assert!(arr.ptr_eq(&shared), "A failed copy should keep the old buffer.");
    assert_eq!(arr.iter().map(|v| v.value).collect::<Vec<_>>(), [1, 2, 3]);

    drop(shared);
    arr.reserve(4);
    *budget.borrow_mut() = 1;
    let source = [value(7), value(8), value(9)];
    assert_panics!({ arr.insert(1, &source) });
    assert_eq!(
        arr.iter().map(|v| v.value).collect::<Vec<_>>(),
        [1, 2, 3],
        "A partial in-place insert should be rolled back."
    );
}

#[test]
fn test_lock() {
    let mut arr = SharedArray::from_slice(&[5, 3, 1]);
    let shared = arr.clone();
    {
        let mut locked = arr.lock();
        assert_eq!(locked.len(), 3);
        locked.sort();
        assert_eq!(&*locked, &[1, 3, 5]);
        while locked.push(7).is_ok() {}
        assert_eq!(locked.len(), locked.capacity());
        locked.truncate(4);
    }
    assert_eq!(arr, [1, 3, 5, 7]);
    assert_eq!(shared, [5, 3, 1], "Locking should detach a shared buffer first.");
    assert_eq!(arr.inner.buf.refs(), 1, "Unlocking should restore the count.");
}

#[test]
fn test_lock_fill_spare_capacity() {
    let mut arr = SharedArray::<u32>::with_capacity(4);
    let mut locked = arr.lock();
    for (i, slot) in locked.spare_capacity_mut().iter_mut().enumerate() {
        slot.write(i as u32 * 10);
    }
    // SAFETY: All 4 slots were just initialized.
    unsafe { locked.unlock_with_len(4) };
    assert_eq!(arr, [0, 10, 20, 30]);
}

#[test]
fn test_lock_empty() {
    let mut arr = SharedArray::<u32>::new();
    let mut locked = arr.lock();
    assert_eq!(locked.capacity(), 0);
    assert_eq!(locked.push(1), Err(1));
    locked.unlock();
    assert!(arr.is_empty());
}

#[test]
fn test_leaked_lock_refuses_to_share() {
    let mut a = SharedArray::from_slice(&[1, 2, 3]);
    mem::forget(a.lock());
    assert!(a.inner.buf.is_locked());

    assert_panics!({
        let _ = a.clone();
    });
    assert_eq!(a.inner.buf.refs(), 0, "A refused clone leaves the count alone.");

    a.make_mut()[0] = 99;
    assert_eq!(a, [99, 2, 3]);
}

#[test]
fn test_into_iter() {
    let counter = CountedDrop::new(0);
    let arr = SharedArray::from([counter.clone(), counter.clone(), counter.clone()]);
    let mut iter = arr.into_iter();
    drop(iter.next());
    assert_eq!(counter.drops(), 1);
    drop(iter);
    assert_eq!(counter.drops(), 3, "Remaining values should be dropped with the iterator.");

    let a = SharedArray::from([1, 2, 3]);
    let b = a.clone();
    assert_eq!(b.into_iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!(a, [1, 2, 3]);

    let mut iter = SharedArray::from([1, 2, 3, 4]).into_iter();
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next_back(), Some(4));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.collect::<Vec<_>>(), [2, 3]);
}

#[test]
fn test_concatenation() {
    let a = SharedArray::from([1, 2]);
    let b = SharedArray::from([3]);
    let c = &a + &b;
    assert_eq!(c, [1, 2, 3]);
    let c = &c + &[4, 5][..];
    assert_eq!(c, [1, 2, 3, 4, 5]);

    let mut empty: SharedArray<i32> = SharedArray::new();
    empty += &a;
    assert!(empty.ptr_eq(&a), "Appending to an empty array should share.");
    empty += &b;
    assert_eq!(empty, [1, 2, 3]);
    assert_eq!(a, [1, 2]);
}

#[test]
fn test_deref_mut_detaches() {
    let a = SharedArray::from([1, 2, 3]);
    let mut b = a.clone();
    b[0] = 10;
    *b.get_mut(2).unwrap() = 30;
    assert_eq!(a, [1, 2, 3]);
    assert_eq!(b, [10, 2, 30]);
}

#[test]
fn test_ordering() {
    let a = SharedArray::from([1, 2]);
    let b = SharedArray::from([1, 2, 0]);
    let c = SharedArray::from([2]);
    assert!(a < b && b < c);
    assert_eq!(a.cmp(&a.clone()), std::cmp::Ordering::Equal);
}

#[test]
fn test_equality_of_shared_nan() {
    let a = SharedArray::from([1.0, f64::NAN]);
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(a != b, "NAN isn't equal to itself, even in a shared buffer.");
    assert!(a.as_slice() != b.as_slice());

    let c = SharedArray::from([1.0, 2.0]);
    assert!(c == c.clone());
}

#[test]
fn test_iterators() {
    let arr: SharedArray<_> = (1..=5).collect();
    assert_eq!(arr, [1, 2, 3, 4, 5]);
    let mut doubled: SharedArray<i32> = SharedArray::new();
    doubled.extend(arr.iter().map(|v| v * 2));
    doubled.extend(&arr);
    assert_eq!(doubled, [2, 4, 6, 8, 10, 1, 2, 3, 4, 5]);
    assert_eq!((&arr).into_iter().count(), 5);
}

#[test]
fn test_repeat() {
    let arr = SharedArray::repeat(&"x", 4);
    assert_eq!(arr, ["x"; 4]);
    assert_eq!(arr.capacity(), 4);
    assert!(SharedArray::repeat(&1, 0).is_empty());
}

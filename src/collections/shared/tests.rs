#![cfg(test)]

use pretty_assertions::assert_eq;

use super::*;
use crate::util::alloc::CountedDrop;
use crate::util::error::AllocError;

#[test]
fn test_extra_capacity() {
    assert_eq!(extra_capacity(0), 4);
    assert_eq!(extra_capacity(1), 5);
    assert_eq!(extra_capacity(31), 35);
    assert_eq!(extra_capacity(32), 36);
    assert_eq!(extra_capacity(40), 45);
    assert_eq!(extra_capacity(8192), 9216);
    assert_eq!(extra_capacity(8200), 9224);
    assert_eq!(extra_capacity(usize::MAX), usize::MAX);
}

#[test]
fn test_sentinel() {
    let a: Buffer<u64> = Buffer::empty();
    let b: Buffer<u64> = Buffer::empty();
    assert!(a.is_sentinel());
    assert!(a.is_shared());
    assert!(!a.is_locked());
    assert!(a.ptr_eq(&b));
    assert_eq!(a.len(), 0);
    assert_eq!(a.cap(), 0);
    assert!(a.as_slice().is_empty());

    let string: Buffer<u8, 1> = Buffer::empty();
    // SAFETY: The sentinel always has a readable, zeroed byte at its payload offset.
    assert_eq!(unsafe { *string.as_ptr() }, 0);

    let refs = a.refs();
    let copy = a.clone();
    drop(copy);
    assert_eq!(a.refs(), refs, "The sentinel's count is never modified.");
}

#[test]
fn test_zero_capacity_is_sentinel() {
    let buf: Buffer<String> = Buffer::try_allocate(0).unwrap();
    assert!(buf.is_sentinel());
}

#[test]
fn test_refs() {
    let a: Buffer<i32> = Buffer::try_allocate(4).unwrap();
    assert_eq!(a.refs(), 1);
    assert!(!a.is_shared());
    assert_eq!(a.cap(), 4);

    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.refs(), 2);
    assert!(a.is_shared() && b.is_shared());

    drop(b);
    assert_eq!(a.refs(), 1);
    assert!(!a.is_shared());
}

#[test]
fn test_release_drops_values() {
    let counter = CountedDrop::new(0);
    let mut buf: Buffer<CountedDrop> = Buffer::try_allocate(3).unwrap();
    // SAFETY: buf is unshared with capacity for all three values.
    unsafe { buf.extend_cloned(&[counter.clone(), counter.clone(), counter.clone()]) };
    assert_eq!(counter.drops(), 3, "Only the temporaries have been dropped.");

    let shared = buf.clone();
    drop(buf);
    assert_eq!(counter.drops(), 3);
    drop(shared);
    assert_eq!(counter.drops(), 6);
}

#[test]
fn test_capacity_overflow() {
    let result = Buffer::<u64>::try_allocate(usize::MAX / 4);
    assert!(matches!(result, Err(AllocError::CapacityOverflow)));

    let result = Buffer::<u8, 1>::try_allocate(usize::MAX);
    assert!(matches!(result, Err(AllocError::CapacityOverflow)));
}

#[test]
fn test_ref_count() {
    let count = RefCount::new(2);
    count.increment();
    assert_eq!(count.get(), 3);
    assert!(count.decrement());
    assert!(count.decrement());
    assert!(!count.decrement());
    count.set(5);
    assert_eq!(count.get(), 5);
}

#![cfg(test)]

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::collections::contiguous::SharedArray;

#[test]
fn test_push_pop_order() {
    let mut heap = BinaryHeap::new();
    for value in [4, 9, 1, 7, 7, 3] {
        heap.push(value);
    }
    assert_eq!(heap.len(), 6);
    assert_eq!(heap.peek(), Some(&9));

    let mut popped = Vec::new();
    while let Some(value) = heap.pop() {
        popped.push(value);
    }
    assert_eq!(popped, [9, 7, 7, 4, 3, 1]);
    assert!(heap.is_empty());
    assert_eq!(heap.pop(), None);
}

#[test]
fn test_clone_shares_storage() {
    let mut heap: BinaryHeap<_> = [3, 1, 4, 1, 5].into_iter().collect();
    let snapshot = heap.clone();
    assert_eq!(heap.as_slice().as_ptr(), snapshot.as_slice().as_ptr());

    assert_eq!(heap.pop(), Some(5));
    assert_ne!(heap.as_slice().as_ptr(), snapshot.as_slice().as_ptr());
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.peek(), Some(&5));
    assert_eq!(snapshot.into_sorted(), [1, 1, 3, 4, 5]);
}

#[test]
fn test_from_array() {
    let arr = SharedArray::from([2, 8, 5, 3, 9, 1]);
    let shared = arr.clone();
    let heap = BinaryHeap::from(arr);
    assert_eq!(heap.peek(), Some(&9));
    assert_eq!(shared, [2, 8, 5, 3, 9, 1], "Heapifying should copy a shared array.");
    assert_eq!(heap.into_sorted(), [1, 2, 3, 5, 8, 9]);
}

#[test]
fn test_heap_sort_random() {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [0, 1, 2, 3, 10, 257] {
        let values: Vec<i32> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
        let mut arr = SharedArray::from_slice(&values);
        heap_sort(&mut arr);

        let mut expected = values.clone();
        expected.sort();
        assert_eq!(arr.as_slice(), expected.as_slice());
    }
}

#[test]
fn test_heap_sort_keeps_capacity() {
    let mut arr = SharedArray::with_capacity(16);
    arr.append(&[3, 2, 1]);
    let ptr = arr.as_ptr();
    heap_sort(&mut arr);
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr.as_ptr(), ptr, "Sorting an unshared array shouldn't reallocate.");
    assert_eq!(arr.capacity(), 16);
}

#[test]
fn test_extend() {
    let mut heap = BinaryHeap::with_capacity(2);
    heap.extend([1, 5, 2]);
    heap.extend(vec![9, 0]);
    assert_eq!(heap.len(), 5);
    assert_eq!(heap.pop(), Some(9));
    assert_eq!(heap.pop(), Some(5));
    heap.clear();
    assert!(heap.is_empty());
}

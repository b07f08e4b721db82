#![cfg(test)]

use std::cmp::Ordering;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::*;
use crate::util::alloc::CountedDrop;

fn walk_forward<T: Clone, X>(tree: &BinaryTree<T, X>) -> Vec<T> {
    let mut values = Vec::new();
    let mut current = tree.first();
    while let Some(id) = current {
        values.extend(tree.get(id).cloned());
        current = tree.next(id);
    }
    values
}

fn walk_backward<T: Clone, X>(tree: &BinaryTree<T, X>) -> Vec<T> {
    let mut values = Vec::new();
    let mut current = tree.last();
    while let Some(id) = current {
        values.extend(tree.get(id).cloned());
        current = tree.prev(id);
    }
    values
}

#[test]
fn test_walk_with_duplicates() {
    let mut tree = BinaryTree::new();
    for key in [20, 40, 20, 30, 10, 20] {
        tree.insert(key);
    }
    assert_eq!(tree.len(), 6);

    let forward = walk_forward(&tree);
    assert_eq!(forward, [10, 20, 20, 20, 30, 40]);

    let mut backward = walk_backward(&tree);
    backward.reverse();
    assert_eq!(backward, forward);

    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), forward);
    assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [40, 30, 20, 20, 20, 10]);
}

#[test]
fn test_duplicates_keep_insertion_order() {
    let mut tree = BinaryTree::with_extractor(PairKey);
    for (i, key) in [2, 1, 2, 2, 3].into_iter().enumerate() {
        tree.insert((key, i));
    }
    let order: Vec<_> = tree.iter().map(|(_, i)| *i).collect();
    assert_eq!(order, [1, 0, 2, 3, 4]);
}

#[test]
fn test_first_and_last() {
    let mut tree = BinaryTree::new();
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);

    let mid = tree.insert(5);
    assert_eq!(tree.first(), Some(mid));
    assert_eq!(tree.last(), Some(mid));

    let low = tree.insert(1);
    let high = tree.insert(9);
    assert_eq!(tree.first(), Some(low));
    assert_eq!(tree.last(), Some(high));

    tree.remove(low);
    assert_eq!(tree.first(), Some(mid));
    tree.remove(high);
    assert_eq!(tree.last(), Some(mid));
    tree.remove(mid);
    assert!(tree.is_empty());
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
}

#[test]
fn test_find_and_search() {
    let tree: BinaryTree<_> = [50, 30, 70, 20, 40].into_iter().collect();

    let id = tree.find(&40).unwrap();
    assert_eq!(tree.get(id), Some(&40));
    assert_eq!(tree.find(&45), None);
    assert!(tree.contains(&20));

    assert_eq!(tree.search(&30), Search::Found(tree.find(&30).unwrap()));
    match tree.search(&45) {
        Search::Vacant(hint) => {
            assert_eq!(hint.parent(), tree.find(&40));
            assert_eq!(hint.ordering(), Ordering::Greater);
        },
        Search::Found(_) => panic!("45 isn't in the tree."),
    }
    match tree.search(&10) {
        Search::Vacant(hint) => {
            assert_eq!(hint.parent(), tree.find(&20));
            assert_eq!(hint.ordering(), Ordering::Less);
        },
        Search::Found(_) => panic!("10 isn't in the tree."),
    }

    let empty = BinaryTree::<i32>::new();
    match empty.search(&1) {
        Search::Vacant(hint) => {
            assert_eq!(hint.parent(), None);
            assert_eq!(hint.ordering(), Ordering::Equal);
        },
        Search::Found(_) => panic!("The tree is empty."),
    }
}

#[test]
fn test_insert_after_search() {
    let mut tree = BinaryTree::new();
    let Search::Vacant(hint) = tree.search(&10) else {
        panic!("The tree is empty.")
    };
    let root = tree.insert_after_search(10, hint);
    assert_eq!(tree.first(), Some(root));

    let Search::Vacant(hint) = tree.search(&5) else {
        panic!("5 isn't in the tree.")
    };
    let five = tree.insert_after_search(5, hint);
    assert_eq!(tree.first(), Some(five));
    assert_eq!(tree.prev(root), Some(five));

    let Search::Vacant(hint) = tree.search(&15) else {
        panic!("15 isn't in the tree.")
    };
    tree.insert_after_search(15, hint);
    assert_eq!(walk_forward(&tree), [5, 10, 15]);
}

#[test]
fn test_insert_after_stale_hint() {
    let mut tree = BinaryTree::new();
    tree.insert(10);
    let Search::Vacant(hint) = tree.search(&12) else {
        panic!("12 isn't in the tree.")
    };

    // Two inserts with the same hint. The second finds the slot taken and descends from there.
    tree.insert_after_search(12, hint);
    tree.insert_after_search(11, hint);
    tree.insert_after_search(13, hint);
    assert_eq!(walk_forward(&tree), [10, 11, 12, 13]);
    assert_eq!(tree.last(), tree.find(&13));

    // A hint whose parent has been removed starts again from the root.
    let Search::Vacant(hint) = tree.search(&14) else {
        panic!("14 isn't in the tree.")
    };
    let parent = hint.parent().unwrap();
    tree.remove(parent);
    tree.insert_after_search(14, hint);
    assert_eq!(walk_forward(&tree), [10, 11, 12, 14]);
}

#[test]
fn test_remove_cases() {
    //         50
    //       /    \
    //     30      70
    //    /  \    /  \
    //   20  40  60  80
    //              /
    //             75
    let build = || {
        let tree: BinaryTree<_> = [50, 30, 70, 20, 40, 60, 80, 75].into_iter().collect();
        tree
    };

    // Leaf.
    let mut tree = build();
    assert_eq!(tree.remove(tree.find(&20).unwrap()), Some(20));
    assert_eq!(walk_forward(&tree), [30, 40, 50, 60, 70, 75, 80]);

    // Only a left child.
    let mut tree = build();
    tree.remove(tree.find(&80).unwrap());
    assert_eq!(walk_forward(&tree), [20, 30, 40, 50, 60, 70, 75]);
    assert_eq!(tree.get(tree.last().unwrap()), Some(&75));

    // Only a right child.
    let mut tree = build();
    tree.remove(tree.find(&20).unwrap());
    tree.remove(tree.find(&30).unwrap());
    assert_eq!(walk_forward(&tree), [40, 50, 60, 70, 75, 80]);
    assert_eq!(tree.get(tree.first().unwrap()), Some(&40));

    // Two children, where the successor is the right child.
    let mut tree = build();
    tree.remove(tree.find(&30).unwrap());
    assert_eq!(walk_forward(&tree), [20, 40, 50, 60, 70, 75, 80]);

    // Two children, where the successor is deeper in the right subtree.
    let mut tree = build();
    tree.remove(tree.find(&50).unwrap());
    assert_eq!(walk_forward(&tree), [20, 30, 40, 60, 70, 75, 80]);
    assert_eq!(walk_backward(&tree), [80, 75, 70, 60, 40, 30, 20]);

    // The root, with one child.
    let mut tree = BinaryTree::new();
    let root = tree.insert(1);
    tree.insert(2);
    tree.remove(root);
    assert_eq!(walk_forward(&tree), [2]);
    assert_eq!(tree.first(), tree.last());
}

#[test]
fn test_random_insert_remove() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut keys: Vec<u32> = (0..500).map(|k| k / 2).collect();
    keys.shuffle(&mut rng);

    let mut tree = BinaryTree::new();
    let mut ids: Vec<_> = keys.iter().map(|k| (*k, tree.insert(*k))).collect();
    assert_eq!(tree.len(), 500);

    ids.shuffle(&mut rng);
    let mut remaining: Vec<u32> = keys.clone();
    remaining.sort();

    for (count, (key, id)) in ids.into_iter().enumerate() {
        assert_eq!(tree.remove(id), Some(key));
        let position = remaining.binary_search(&key).unwrap();
        remaining.remove(position);

        assert_eq!(tree.len(), 500 - count - 1);
        if count % 25 == 0 || tree.len() < 10 {
            assert_eq!(walk_forward(&tree), remaining);
            let mut backward = walk_backward(&tree);
            backward.reverse();
            assert_eq!(backward, remaining);
        }
        assert_eq!(tree.first().and_then(|id| tree.get(id)), remaining.first());
        assert_eq!(tree.last().and_then(|id| tree.get(id)), remaining.last());
    }
    assert!(tree.is_empty());
}

#[test]
fn test_stale_ids() {
    let mut tree = BinaryTree::new();
    let a = tree.insert(1);
    let b = tree.insert(2);
    assert_eq!(tree.remove(a), Some(1));

    assert_eq!(tree.get(a), None);
    assert_eq!(tree.remove(a), None);
    assert_eq!(tree.next(a), None);
    assert!(!tree.contains_id(a));

    // The freed slot is reused, but the old id must not see the new value.
    let c = tree.insert(3);
    assert_ne!(a, c);
    assert_eq!(tree.get(a), None);
    assert_eq!(tree.get(c), Some(&3));
    assert_eq!(tree.next(b), Some(c));

    tree.clear();
    assert_eq!(tree.get(b), None);
    assert!(tree.is_empty());
}

#[test]
fn test_get_mut() {
    let mut tree = BinaryTree::with_extractor(PairKey);
    let id = tree.insert(("k", 1));
    tree.get_mut(id).unwrap().1 = 10;
    assert_eq!(tree.get(id), Some(&("k", 10)));
}

#[test]
fn test_custom_extractor() {
    #[derive(Debug, Clone, PartialEq)]
    struct Employee {
        name: &'static str,
        age: u32,
    }

    struct ByAge;

    impl KeyExtractor<Employee> for ByAge {
        type Key = u32;

        fn key<'a>(&self, value: &'a Employee) -> &'a u32 {
            &value.age
        }
    }

    let mut tree = BinaryTree::with_extractor(ByAge);
    for (name, age) in [("ann", 41), ("bob", 25), ("cat", 33)] {
        tree.insert(Employee { name, age });
    }

    let names: Vec<_> = tree.iter().map(|e| e.name).collect();
    assert_eq!(names, ["bob", "cat", "ann"]);
    let id = tree.find(&33).unwrap();
    assert_eq!(tree.get(id).map(|e| e.name), Some("cat"));
}

#[test]
fn test_drops() {
    let counter = CountedDrop::new(0);
    let mut tree = BinaryTree::with_extractor(PairKey);
    for key in 0..10 {
        tree.insert((key, counter.clone()));
    }
    drop(tree.pop_first());
    assert_eq!(counter.drops(), 1);
    tree.clear();
    assert_eq!(counter.drops(), 10);

    for key in 0..4 {
        tree.insert((key, counter.clone()));
    }
    drop(tree);
    assert_eq!(counter.drops(), 14);
}

#[test]
fn test_into_iter() {
    let tree: BinaryTree<_> = [3, 1, 2].into_iter().collect();
    let mut iter = tree.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next_back(), Some(3));
    assert_eq!(iter.collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn test_set() {
    let mut set: TreeSet<_> = [5, 1, 4, 1, 5].into_iter().collect();
    assert_eq!(set.len(), 3);
    assert!(!set.insert(4));
    assert!(set.insert(2));
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 4, 5]);
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&5));

    assert!(set.remove(&4));
    assert!(!set.remove(&4));
    assert_eq!(set.take(&2), Some(2));
    assert!(set.contains(&1));
    assert_eq!(format!("{set:?}"), "{1, 5}");

    let words: TreeSet<String> = ["pear", "apple"].into_iter().map(String::from).collect();
    assert!(words.contains("apple"));
    assert_eq!(words.get("pear").map(String::as_str), Some("pear"));
    assert_eq!(words.into_iter().collect::<Vec<_>>(), ["apple", "pear"]);
}

#[test]
fn test_map() {
    let mut map = TreeMap::new();
    assert_eq!(map.insert(String::from("b"), 2), None);
    assert_eq!(map.insert(String::from("a"), 1), None);
    assert_eq!(map.insert(String::from("c"), 3), None);
    assert_eq!(map.insert(String::from("b"), 20), Some(2));
    assert_eq!(map.len(), 3);

    assert_eq!(map.get("b"), Some(&20));
    assert!(map.contains_key("c"));
    *map.get_mut("c").unwrap() += 1;
    assert_eq!(map.get_key_value("c"), Some((&String::from("c"), &4)));

    assert_eq!(map.first_key_value(), Some((&String::from("a"), &1)));
    assert_eq!(map.last_key_value(), Some((&String::from("c"), &4)));
    assert_eq!(map.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 20, 4]);

    assert_eq!(map.remove("a"), Some(1));
    assert_eq!(map.remove("a"), None);
    assert_eq!(map.pop_last(), Some((String::from("c"), 4)));
    assert_eq!(format!("{map:?}"), "{\"b\": 20}");
}

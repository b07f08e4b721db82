/// Extracts the ordering key from a value stored in a [`BinaryTree`](super::BinaryTree).
///
/// The tree only ever compares keys with `<`: two keys are equal when neither is less than the
/// other. This lets the same tree back both [`TreeSet`](super::TreeSet) (the value is the key) and
/// [`TreeMap`](super::TreeMap) (the key is the first half of a pair), as well as trees keyed on a
/// field of a larger record.
///
/// # Examples
/// ```
/// # use shared_lib::collections::binary_tree::{BinaryTree, KeyExtractor};
/// struct Task {
///     priority: u8,
///     name: &'static str,
/// }
///
/// struct ByPriority;
///
/// impl KeyExtractor<Task> for ByPriority {
///     type Key = u8;
///
///     fn key<'a>(&self, value: &'a Task) -> &'a u8 {
///         &value.priority
///     }
/// }
///
/// let mut tree = BinaryTree::with_extractor(ByPriority);
/// tree.insert(Task { priority: 3, name: "c" });
/// tree.insert(Task { priority: 1, name: "a" });
/// let names: Vec<_> = tree.iter().map(|t| t.name).collect();
/// assert_eq!(names, ["a", "c"]);
/// ```
pub trait KeyExtractor<T> {
    type Key: Ord + ?Sized;

    fn key<'a>(&self, value: &'a T) -> &'a Self::Key;
}

/// Uses the whole value as its key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T: Ord> KeyExtractor<T> for Identity {
    type Key = T;

    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// Uses the first element of a `(key, value)` pair as the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairKey;

impl<K: Ord, V> KeyExtractor<(K, V)> for PairKey {
    type Key = K;

    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

//! A wrapper around a sorted vector of tuples used to hold dynamic objects.
//!
//! Objects keep their pairs sorted and unique at all times. Building a [`VecMap`] from
//! unsorted pairs sorts them and, when a key occurs more than once, keeps the pair that
//! was inserted last.
//!
//! # Example
//!
//! ```
//! use dynval::prelude::*;
//!
//! // from a vector of tuples, duplicates resolved last-wins
//! let vm = VecMap::from(vec![(Key::from("b"), 2), (Key::from("a"), 1), (Key::from("b"), 3)]);
//!
//! assert_eq!(vm.len(), 2);
//! assert_eq!(vm.get(&Key::from("b")), Some(&3));
//!
//! // From a vector of tuples we know is sorted by the keys.
//! // This is still checked and the function panics if it is not sorted.
//! let sorted = VecMap::from_sorted(vec![(Key::from("a"), 1), (Key::from("bb"), 2)]);
//! assert_eq!(sorted.len(), 2);
//! ```

use std::{collections::BTreeMap, iter::FromIterator, slice::Iter, vec::IntoIter};

#[derive(Eq, PartialEq, Clone, Hash, Debug, Default)]
/// A map implemented as a sorted [`Vec`] of pairs.
///
/// See also: [module level documentation](`crate::vecmap`).
pub struct VecMap<K: Ord, V>(Vec<(K, V)>);

impl<K: Ord, V> VecMap<K, V> {
    /// Creates a [`VecMap`] from a vector of key-value pairs sorted by their first
    /// elements.
    ///
    /// # Arguments
    ///
    /// * `v: Vec<(K, V)>` - A vector of key-value pairs sorted by their first element.
    ///
    /// # Panics
    ///
    /// This function will panic if `v` is not strictly sorted by its first element.
    ///
    /// ```should_panic
    /// use dynval::prelude::*;
    ///
    /// let vmap = VecMap::from_sorted(vec![("a", ""), ("a", "")]);
    /// ```
    pub fn from_sorted(v: Vec<(K, V)>) -> Self {
        for i in 1..v.len() {
            if v[i - 1].0 >= v[i].0 {
                panic!("`Vec` is not sorted by key")
            }
        }
        VecMap(v)
    }

    /// Creates a [`VecMap`] from pairs in insertion order, keeping the last pair for each
    /// key. Returns the map and the number of pairs dropped as duplicates.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::vecmap::VecMap;
    ///
    /// let (vm, dropped) = VecMap::from_pairs(vec![(2, "x"), (1, "y"), (2, "z")]);
    ///
    /// assert_eq!(dropped, 1);
    /// assert_eq!(vm.iter().collect::<Vec<_>>(), vec![&(1, "y"), &(2, "z")]);
    /// ```
    pub fn from_pairs(v: Vec<(K, V)>) -> (Self, usize) {
        let before = v.len();
        let mut indexed: Vec<(usize, (K, V))> = v.into_iter().enumerate().collect();
        // equal keys end up newest first, so dedup keeps the last insertion
        indexed.sort_by(|(i1, (k1, _)), (i2, (k2, _))| k1.cmp(k2).then(i2.cmp(i1)));
        indexed.dedup_by(|(_, (next, _)), (_, (kept, _))| next == kept);
        let pairs: Vec<(K, V)> = indexed.into_iter().map(|(_, kv)| kv).collect();
        let dropped = before - pairs.len();
        (VecMap(pairs), dropped)
    }

    /// Returns length.
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`VecMap`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key value pairs.
    pub fn iter(&self) -> Iter<(K, V)> { self.0.iter() }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> { self.0.iter().map(|(k, _)| k) }

    /// Iterates over the values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> { self.0.iter().map(|(_, v)| v) }

    /// Looks up `k` by binary search.
    pub fn get(&self, k: &K) -> Option<&V> {
        self.0
            .binary_search_by(|(probe, _)| probe.cmp(k))
            .ok()
            .map(|i| &self.0[i].1)
    }

    /// Whether `k` is present.
    pub fn contains_key(&self, k: &K) -> bool { self.get(k).is_some() }

    /// Inserts a pair, replacing and returning the previous value for the same key.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        match self.0.binary_search_by(|(probe, _)| probe.cmp(&k)) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i].1, v)),
            Err(i) => {
                self.0.insert(i, (k, v));
                None
            }
        }
    }

    /// Merges `other` into `self`; on a shared key the value from `other` wins.
    pub fn extend_right_wins(&mut self, other: VecMap<K, V>) {
        for (k, v) in other {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> From<Vec<(K, V)>> for VecMap<K, V> {
    fn from(v: Vec<(K, V)>) -> Self { VecMap::from_pairs(v).0 }
}

impl<K: Ord, V> IntoIterator for VecMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> { self.0.into_iter() }
}

impl<'a, K: Ord, V> IntoIterator for &'a VecMap<K, V> {
    type IntoIter = Iter<'a, (K, V)>;
    type Item = &'a (K, V);

    fn into_iter(self) -> Iter<'a, (K, V)> { self.0.iter() }
}

impl<K: Ord, V> FromIterator<(K, V)> for VecMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        VecMap::from(Vec::from_iter(iter))
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for VecMap<K, V> {
    fn from(bt: BTreeMap<K, V>) -> Self { VecMap(bt.into_iter().collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_insert_wins() {
        let (vm, dropped) = VecMap::from_pairs(vec![("b", 2), ("a", 1), ("b", 3), ("b", 4)]);
        assert_eq!(dropped, 2);
        assert_eq!(vm.get(&"b"), Some(&4));
        assert_eq!(vm.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn insert_keeps_order() {
        let mut vm = VecMap::from(vec![(3, 'c'), (1, 'a')]);
        assert_eq!(vm.insert(2, 'b'), None);
        assert_eq!(vm.insert(3, 'C'), Some('c'));
        assert_eq!(vm.values().cloned().collect::<String>(), "abC");
    }

    #[test]
    fn right_wins_merge() {
        let mut left = VecMap::from(vec![("a", 1), ("c", 3)]);
        left.extend_right_wins(VecMap::from(vec![("a", 2), ("b", 5)]));
        assert_eq!(left.into_iter().collect::<Vec<_>>(), vec![("a", 2), ("b", 5), ("c", 3)]);
    }

    #[test]
    #[should_panic]
    fn from_sorted_checks() { VecMap::from_sorted(vec![(2, ()), (1, ())]); }
}

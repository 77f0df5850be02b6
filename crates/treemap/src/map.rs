use crate::OrderedMap;
use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::iter::Iter;
use crate::tree::RbTree;

/// Map with upsert semantics on top of [`RbTree`], driven through the
/// [`OrderedMap`] contract.
///
/// Unlike the tree, [`put`](Self::put) overwrites the value of an existing
/// key. Enumeration is always in ascending comparator order.
#[derive(Clone, Debug)]
pub struct TreeMap<K, V, C = NaturalOrder> {
    tree: RbTree<K, V, C>,
}

impl<K: Ord, V> Default for TreeMap<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    pub fn new(cmp: C) -> Self {
        Self {
            tree: RbTree::new(cmp),
        }
    }

    pub fn try_new(cmp: Option<C>) -> Result<Self, TreeError> {
        RbTree::try_new(cmp).map(|tree| Self { tree })
    }

    /// Builds a map from `entries`; a later entry replaces the value of an
    /// earlier one with an equal key.
    pub fn with_entries<I>(cmp: C, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new(cmp);
        map.extend(entries);
        map
    }

    /// Inserts or overwrites, returning the previous value if there was one.
    ///
    /// `add` consumes the value even when it fails, so an existing key is
    /// looked up first and updated with `set`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if OrderedMap::find(&self.tree, &key).is_ok() {
            return OrderedMap::set(&mut self.tree, &key, value).ok();
        }
        let inserted = OrderedMap::add(&mut self.tree, key, value);
        debug_assert!(inserted.is_ok());
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        OrderedMap::find(&self.tree, key).ok()
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        OrderedMap::find(&self.tree, key).is_ok()
    }

    pub fn delete(&mut self, key: &K) -> Option<V> {
        OrderedMap::delete(&mut self.tree, key)
    }

    pub fn len(&self) -> usize {
        OrderedMap::size(&self.tree)
    }

    pub fn is_empty(&self) -> bool {
        OrderedMap::is_empty(&self.tree)
    }

    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        OrderedMap::keys(&self.tree)
    }

    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        OrderedMap::values(&self.tree)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn into_tree(self) -> RbTree<K, V, C> {
        self.tree
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_entries(NaturalOrder, iter)
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TreeMap;
    use crate::compare::NaturalOrder;
    use crate::error::TreeError;
    use std::collections::HashMap;

    #[test]
    fn put_overwrites_existing_values() {
        let mut map = TreeMap::default();
        assert_eq!(map.put(3, "c"), None);
        assert_eq!(map.put(1, "a"), None);
        assert_eq!(map.put(3, "C"), Some("c"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys(), vec![1, 3]);
        assert_eq!(map.values(), vec!["a", "C"]);
        map.tree.check_invariants();
    }

    #[test]
    fn with_entries_collapses_equal_keys() {
        let map = TreeMap::with_entries(
            NaturalOrder,
            vec![(5, 50), (1, 10), (5, 55), (3, 30), (1, 11)],
        );
        assert_eq!(map.keys(), vec![1, 3, 5]);
        assert_eq!(map.values(), vec![11, 30, 55]);
    }

    #[test]
    fn with_entries_from_hash_map_is_sorted() {
        let source: HashMap<String, usize> = ["pear", "apple", "fig", "kiwi"]
            .into_iter()
            .map(|s| (s.to_string(), s.len()))
            .collect();
        let map = TreeMap::with_entries(NaturalOrder, source);
        assert_eq!(map.keys(), vec!["apple", "fig", "kiwi", "pear"]);
        assert_eq!(map.values(), vec![5, 3, 4, 4]);
    }

    #[test]
    fn get_and_delete() {
        let mut map: TreeMap<i32, i32> = (0..10).map(|k| (k, k * k)).collect();
        assert_eq!(map.get(&7), Some(&49));
        assert_eq!(map.get(&70), None);
        assert_eq!(map.delete(&7), Some(49));
        assert_eq!(map.delete(&7), None);
        assert!(!map.contains_key(&7));
        if let Some(v) = map.get_mut(&2) {
            *v = -4;
        }
        assert_eq!(map.get(&2), Some(&-4));
        assert_eq!(map.len(), 9);
        map.tree.check_invariants();
    }

    #[test]
    fn empty_map() {
        let map: TreeMap<u8, u8> = TreeMap::default();
        assert!(map.is_empty());
        assert!(map.keys().is_empty());
        assert!(map.values().is_empty());
        assert_eq!(map.get(&0), None);
    }

    #[test]
    fn try_new_requires_comparator() {
        let map = TreeMap::<i32, i32, NaturalOrder>::try_new(None);
        assert_eq!(map.err(), Some(TreeError::ComparatorRequired));
    }

    #[test]
    fn case_insensitive_keys() {
        let mut map = TreeMap::new(|a: &String, b: &String| {
            a.to_lowercase().cmp(&b.to_lowercase())
        });
        map.put("Beta".to_string(), 1);
        map.put("alpha".to_string(), 2);
        assert_eq!(map.put("BETA".to_string(), 3), Some(1));
        // the first spelling of a key is kept
        assert_eq!(map.keys(), vec!["alpha".to_string(), "Beta".to_string()]);
        assert_eq!(map.into_tree().len(), 2);
    }
}

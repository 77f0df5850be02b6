use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::OrderedMap;
use crate::error::TreeError;

/// [`OrderedMap`] over the standard library's B-tree, for comparison with
/// [`RbTree`](crate::RbTree). Keys are ordered by [`Ord`].
#[derive(Clone, Debug, Default)]
pub struct StdBTreeMap<K: Ord, V> {
    inner: BTreeMap<K, V>,
}

impl<K: Ord, V> StdBTreeMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.inner
    }
}

impl<K: Ord, V> OrderedMap for StdBTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn size(&self) -> usize {
        self.inner.len()
    }

    fn add(&mut self, key: K, value: V) -> Result<(), TreeError> {
        match self.inner.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(_) => Err(TreeError::DuplicateKey),
        }
    }

    fn set(&mut self, key: &K, value: V) -> Result<V, TreeError> {
        let slot = self.inner.get_mut(key).ok_or(TreeError::KeyNotFound)?;
        Ok(std::mem::replace(slot, value))
    }

    fn find(&self, key: &K) -> Result<&V, TreeError> {
        self.inner.get(key).ok_or(TreeError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.keys().cloned().collect()
    }

    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.values().cloned().collect()
    }

    fn key_values(&self) -> (Vec<K>, Vec<V>)
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .unzip()
    }
}

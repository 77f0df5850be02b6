//! Ordered map backed by an arena-allocated red-black tree.
//!
//! [`RbTree`] is the core: unique keys ordered by an injected [`Comparator`],
//! `O(log n)` insert, lookup and delete, and in-order enumeration.
//! [`TreeMap`] and [`TreeSet`] are thin collections on top of it, and
//! [`StdBTreeMap`] puts the standard B-tree behind the same [`OrderedMap`]
//! contract for comparison.
//!
//! ```
//! use treemap::{NaturalOrder, RbTree, TreeError};
//!
//! let mut tree = RbTree::new(NaturalOrder);
//! tree.add(2, "two")?;
//! tree.add(1, "one")?;
//! assert_eq!(tree.add(2, "again"), Err(TreeError::DuplicateKey));
//! assert_eq!(tree.keys(), vec![1, 2]);
//! # Ok::<(), TreeError>(())
//! ```
//!
//! The tree does no locking. Wrap it in a `RwLock` to share it between
//! threads; lookups and enumeration only need `&self`.

mod compare;
mod error;
mod iter;
mod map;
mod set;
mod std_btree;
mod tree;

pub use compare::{Comparator, NaturalOrder};
pub use error::TreeError;
pub use iter::Iter;
pub use map::TreeMap;
pub use set::TreeSet;
pub use std_btree::StdBTreeMap;
pub use tree::RbTree;

/// Ordered map interface.
///
/// - Keys are unique; `add` never overwrites and `set` never inserts.
/// - `keys`, `values` and `key_values` return fresh vectors in ascending
///   key order.
pub trait OrderedMap {
    type Key;
    type Value;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn add(&mut self, key: Self::Key, value: Self::Value) -> Result<(), TreeError>;

    fn set(&mut self, key: &Self::Key, value: Self::Value) -> Result<Self::Value, TreeError>;

    fn find(&self, key: &Self::Key) -> Result<&Self::Value, TreeError>;

    fn delete(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn keys(&self) -> Vec<Self::Key>
    where
        Self::Key: Clone;

    fn values(&self) -> Vec<Self::Value>
    where
        Self::Value: Clone;

    fn key_values(&self) -> (Vec<Self::Key>, Vec<Self::Value>)
    where
        Self::Key: Clone,
        Self::Value: Clone;
}

impl<K, V, C: Comparator<K>> OrderedMap for RbTree<K, V, C> {
    type Key = K;
    type Value = V;

    fn size(&self) -> usize {
        self.len()
    }

    fn add(&mut self, key: K, value: V) -> Result<(), TreeError> {
        RbTree::insert(self, key, value)
    }

    fn set(&mut self, key: &K, value: V) -> Result<V, TreeError> {
        RbTree::set(self, key, value)
    }

    fn find(&self, key: &K) -> Result<&V, TreeError> {
        RbTree::find(self, key)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        RbTree::delete(self, key)
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        RbTree::keys(self)
    }

    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        RbTree::values(self)
    }

    fn key_values(&self) -> (Vec<K>, Vec<V>)
    where
        K: Clone,
        V: Clone,
    {
        RbTree::key_values(self)
    }
}

use crate::OrderedMap;
use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::tree::RbTree;

/// Ordered set of distinct elements.
#[derive(Clone, Debug)]
pub struct TreeSet<T, C = NaturalOrder> {
    tree: RbTree<T, (), C>,
}

impl<T: Ord> Default for TreeSet<T, NaturalOrder> {
    fn default() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> TreeSet<T, C> {
    pub fn new(cmp: C) -> Self {
        Self {
            tree: RbTree::new(cmp),
        }
    }

    pub fn try_new(cmp: Option<C>) -> Result<Self, TreeError> {
        RbTree::try_new(cmp).map(|tree| Self { tree })
    }

    /// Returns `false` if an equal element was already present.
    pub fn add(&mut self, value: T) -> bool {
        OrderedMap::add(&mut self.tree, value, ()).is_ok()
    }

    /// Returns `true` if the element was present.
    pub fn delete(&mut self, value: &T) -> bool {
        OrderedMap::delete(&mut self.tree, value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.remove_entry(value).map(|(k, ())| k)
    }

    pub fn contains(&self, value: &T) -> bool {
        OrderedMap::find(&self.tree, value).is_ok()
    }

    pub fn len(&self) -> usize {
        OrderedMap::size(&self.tree)
    }

    pub fn is_empty(&self) -> bool {
        OrderedMap::is_empty(&self.tree)
    }

    /// Elements in ascending comparator order.
    pub fn keys(&self) -> Vec<T>
    where
        T: Clone,
    {
        OrderedMap::keys(&self.tree)
    }
}

impl<T, C> TreeSet<T, C> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tree.iter().map(|(k, _)| k)
    }
}

impl<T, C: Comparator<T>> Extend<T> for TreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for TreeSet<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

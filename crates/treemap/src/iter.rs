use std::iter::FusedIterator;

use crate::tree::{Id, LEFT, Node, RIGHT};

/// In-order iterator over the entries of an [`RbTree`](crate::RbTree).
///
/// Walks the tree with an explicit stack of pending ancestors, so deep trees
/// never recurse.
pub struct Iter<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    stack: Vec<Id>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(nodes: &'a [Option<Node<K, V>>], root: Id, len: usize) -> Self {
        let mut iter = Self {
            nodes,
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn node(&self, x: Id) -> &'a Node<K, V> {
        let nodes = self.nodes;
        nodes[x.idx()]
            .as_ref()
            .expect("node id refers to a vacant slot")
    }

    fn push_left_spine(&mut self, mut x: Id) {
        while !x.is_nil() {
            self.stack.push(x);
            x = self.node(x).ch[LEFT];
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let node = self.node(x);
        self.push_left_spine(node.ch[RIGHT]);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

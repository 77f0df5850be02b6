use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::mem;

use log::trace;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::iter::Iter;

/// Index of a node slot in the arena. `NIL` stands for an absent child or parent.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Arena slots are addressed by `u32`; `u32::MAX` is reserved for `NIL`.
pub(crate) const MAX_NODES: usize = u32::MAX as usize;

fn id(v: usize) -> Id {
    match u32::try_from(v) {
        Ok(raw) if raw != u32::MAX => Id(raw),
        _ => panic!("arena slot {v} exceeds the {MAX_NODES} node limit"),
    }
}

/// Child index of the left subtree. Rotating in direction `LEFT` moves the
/// node down to the left of its right child.
pub(crate) const LEFT: usize = 0;
/// Child index of the right subtree.
pub(crate) const RIGHT: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    color: Color,
    parent: Id,
    pub(crate) ch: [Id; 2],
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Id) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            ch: [Id::NIL, Id::NIL],
        }
    }
}

/// Red-black tree map with an injected comparator.
///
/// Nodes live in a single arena and refer to each other by index, so parent
/// links do not create ownership cycles. Vacated slots go on a free list and
/// are reused by later insertions.
///
/// Keys are unique: [`insert`](Self::insert) rejects a key that is already
/// present, and [`set`](Self::set) only updates existing keys.
#[derive(Clone)]
pub struct RbTree<K, V, C = NaturalOrder> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<Id>,
    root: Id,
    len: usize,
    cmp: C,
}

impl<K: Ord, V> Default for RbTree<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<K, V, C> RbTree<K, V, C> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Removes every entry and releases all arena slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = Id::NIL;
        self.len = 0;
    }

    /// In-order iterator over `(&key, &value)`.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    /// Keys in ascending comparator order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Values ordered by their keys.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn key_values(&self) -> (Vec<K>, Vec<V>)
    where
        K: Clone,
        V: Clone,
    {
        let mut keys = Vec::with_capacity(self.len);
        let mut values = Vec::with_capacity(self.len);
        for (k, v) in self.iter() {
            keys.push(k.clone());
            values.push(v.clone());
        }
        (keys, values)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.extreme(LEFT)
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.extreme(RIGHT)
    }

    fn extreme(&self, dir: usize) -> Option<(&K, &V)> {
        if self.root.is_nil() {
            return None;
        }
        let mut x = self.root;
        while !self.node(x).ch[dir].is_nil() {
            x = self.node(x).ch[dir];
        }
        let node = self.node(x);
        Some((&node.key, &node.value))
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node<K, V> {
        debug_assert!(!x.is_nil());
        self.nodes[x.idx()]
            .as_ref()
            .expect("node id refers to a vacant slot")
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<K, V> {
        debug_assert!(!x.is_nil());
        self.nodes[x.idx()]
            .as_mut()
            .expect("node id refers to a vacant slot")
    }

    /// Nil reads as black.
    #[inline(always)]
    fn color_of(&self, x: Id) -> Color {
        if x.is_nil() {
            Color::Black
        } else {
            self.node(x).color
        }
    }

    #[inline(always)]
    fn set_color(&mut self, x: Id, color: Color) {
        if !x.is_nil() {
            self.node_mut(x).color = color;
        }
    }

    #[inline(always)]
    fn parent(&self, x: Id) -> Id {
        if x.is_nil() { Id::NIL } else { self.node(x).parent }
    }

    #[inline(always)]
    fn child(&self, x: Id, dir: usize) -> Id {
        if x.is_nil() { Id::NIL } else { self.node(x).ch[dir] }
    }

    /// Which side of `p` holds `x`. `x` may be nil when `p` has exactly one
    /// real child.
    #[inline(always)]
    fn side(&self, p: Id, x: Id) -> usize {
        usize::from(self.node(p).ch[RIGHT] == x)
    }

    fn alloc(&mut self, node: Node<K, V>) -> Id {
        if let Some(x) = self.free.pop() {
            trace!("reusing arena slot {}", x.0);
            self.nodes[x.idx()] = Some(node);
            x
        } else {
            let x = id(self.nodes.len());
            self.nodes.push(Some(node));
            x
        }
    }

    /// Vacates the slot of an already unlinked node.
    fn dealloc(&mut self, x: Id) -> Node<K, V> {
        let mut node = self.nodes[x.idx()]
            .take()
            .expect("node id refers to a vacant slot");
        node.parent = Id::NIL;
        node.ch = [Id::NIL, Id::NIL];
        self.free.push(x);
        node
    }

    /// Puts `new` where `old` hangs under `p`, or makes it the root.
    fn replace_child(&mut self, p: Id, old: Id, new: Id) {
        if p.is_nil() {
            self.root = new;
        } else {
            let d = self.side(p, old);
            self.node_mut(p).ch[d] = new;
        }
    }

    /// Moves `x` down in direction `dir`; its child on the other side takes
    /// its place. Colors are left alone. No-op if that child is nil.
    fn rotate(&mut self, x: Id, dir: usize) {
        let y = self.child(x, dir ^ 1);
        if y.is_nil() {
            return;
        }
        let b = self.node(y).ch[dir];
        let p = self.node(x).parent;

        self.node_mut(x).ch[dir ^ 1] = b;
        if !b.is_nil() {
            self.node_mut(b).parent = x;
        }

        self.node_mut(y).parent = p;
        self.replace_child(p, x, y);

        self.node_mut(y).ch[dir] = x;
        self.node_mut(x).parent = y;
    }

    fn leftmost(&self, mut x: Id) -> Id {
        while !self.node(x).ch[LEFT].is_nil() {
            x = self.node(x).ch[LEFT];
        }
        x
    }

    /// Node holding the next greater key, or nil.
    fn successor(&self, x: Id) -> Id {
        let r = self.node(x).ch[RIGHT];
        if !r.is_nil() {
            return self.leftmost(r);
        }
        let mut x = x;
        let mut p = self.node(x).parent;
        while !p.is_nil() && self.node(p).ch[RIGHT] == x {
            x = p;
            p = self.node(p).parent;
        }
        p
    }

    fn swap_entries(&mut self, a: Id, b: Id) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi.idx());
        let x = head[lo.idx()]
            .as_mut()
            .expect("node id refers to a vacant slot");
        let y = tail[0].as_mut().expect("node id refers to a vacant slot");
        mem::swap(&mut x.key, &mut y.key);
        mem::swap(&mut x.value, &mut y.value);
    }

    fn insert_fixup(&mut self, mut x: Id) {
        while x != self.root && self.color_of(self.parent(x)) == Color::Red {
            let mut p = self.parent(x);
            // A red parent is never the root, so the grandparent is real.
            let g = self.parent(p);
            let dir = self.side(g, p);
            let uncle = self.node(g).ch[dir ^ 1];

            if self.color_of(uncle) == Color::Red {
                trace!("insert fixup: red uncle, pushing violation up");
                self.set_color(p, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(g, Color::Red);
                x = g;
                continue;
            }

            if self.node(p).ch[dir ^ 1] == x {
                trace!("insert fixup: inner child, rotating at parent");
                self.rotate(p, dir);
                x = p;
                p = self.parent(x);
            }

            trace!("insert fixup: outer child, rotating at grandparent");
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            self.rotate(g, dir ^ 1);
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores black height after a black node was spliced out. `x` is the
    /// replacement (possibly nil) and `parent` its parent.
    fn delete_fixup(&mut self, mut x: Id, mut parent: Id) {
        while x != self.root && self.color_of(x) == Color::Black {
            let dir = self.side(parent, x);
            let mut w = self.node(parent).ch[dir ^ 1];

            if self.color_of(w) == Color::Red {
                trace!("delete fixup: red sibling, rotating at parent");
                self.set_color(w, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, dir);
                w = self.node(parent).ch[dir ^ 1];
            }

            if self.color_of(self.child(w, LEFT)) == Color::Black
                && self.color_of(self.child(w, RIGHT)) == Color::Black
            {
                trace!("delete fixup: black nephews, moving deficit up");
                self.set_color(w, Color::Red);
                x = parent;
                parent = self.parent(x);
                continue;
            }

            if self.color_of(self.child(w, dir ^ 1)) == Color::Black {
                trace!("delete fixup: red near nephew, rotating at sibling");
                let near = self.child(w, dir);
                self.set_color(near, Color::Black);
                self.set_color(w, Color::Red);
                self.rotate(w, dir ^ 1);
                w = self.node(parent).ch[dir ^ 1];
            }

            trace!("delete fixup: red far nephew, rotating at parent");
            let parent_color = self.node(parent).color;
            self.set_color(w, parent_color);
            self.set_color(parent, Color::Black);
            let far = self.child(w, dir ^ 1);
            self.set_color(far, Color::Black);
            self.rotate(parent, dir);
            x = self.root;
            break;
        }
        self.set_color(x, Color::Black);
    }

    /// Unlinks `z`, rebalances, and returns the removed entry.
    fn remove_node(&mut self, mut z: Id) -> Node<K, V> {
        let [l, r] = self.node(z).ch;
        if !l.is_nil() && !r.is_nil() {
            let s = self.successor(z);
            self.swap_entries(z, s);
            z = s;
        }

        let [l, r] = self.node(z).ch;
        let child = if l.is_nil() { r } else { l };
        let parent = self.node(z).parent;
        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, z, child);

        let color = self.node(z).color;
        let node = self.dealloc(z);
        self.len -= 1;
        if color == Color::Black {
            self.delete_fixup(child, parent);
        }
        node
    }
}

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    pub fn new(cmp: C) -> Self {
        Self::with_capacity(cmp, 0)
    }

    /// Pre-sizes the arena for `capacity` entries.
    ///
    /// A tree holds at most `u32::MAX` nodes; inserting beyond that panics.
    pub fn with_capacity(cmp: C, capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: Id::NIL,
            len: 0,
            cmp,
        }
    }

    /// Builds a tree from a comparator that may be missing.
    pub fn try_new(cmp: Option<C>) -> Result<Self, TreeError> {
        match cmp {
            Some(cmp) => Ok(Self::new(cmp)),
            None => {
                log::debug!("rejecting ordered map construction without a comparator");
                Err(TreeError::ComparatorRequired)
            }
        }
    }

    fn find_id(&self, key: &K) -> Id {
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.ch[LEFT],
                Ordering::Greater => node.ch[RIGHT],
                Ordering::Equal => return cur,
            };
        }
        Id::NIL
    }

    /// Adds a new binding. Fails with [`TreeError::DuplicateKey`] if the key
    /// is already present; the tree is then unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        let mut parent = Id::NIL;
        let mut dir = LEFT;
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            dir = match self.cmp.compare(&key, &node.key) {
                Ordering::Less => LEFT,
                Ordering::Greater => RIGHT,
                Ordering::Equal => return Err(TreeError::DuplicateKey),
            };
            parent = cur;
            cur = node.ch[dir];
        }

        let x = self.alloc(Node::new(key, value, parent));
        if parent.is_nil() {
            self.root = x;
        } else {
            self.node_mut(parent).ch[dir] = x;
        }
        self.len += 1;
        self.insert_fixup(x);
        Ok(())
    }

    /// Same as [`insert`](Self::insert).
    #[inline]
    pub fn add(&mut self, key: K, value: V) -> Result<(), TreeError> {
        self.insert(key, value)
    }

    /// Replaces the value of an existing key and returns the old one.
    ///
    /// Never moves or recolors a node.
    pub fn set(&mut self, key: &K, value: V) -> Result<V, TreeError> {
        let slot = self.get_mut(key).ok_or(TreeError::KeyNotFound)?;
        Ok(mem::replace(slot, value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let x = self.find_id(key);
        if x.is_nil() {
            None
        } else {
            Some(&self.node(x).value)
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let x = self.find_id(key);
        if x.is_nil() {
            None
        } else {
            Some(&mut self.node_mut(x).value)
        }
    }

    pub fn find(&self, key: &K) -> Result<&V, TreeError> {
        self.get(key).ok_or(TreeError::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        !self.find_id(key).is_nil()
    }

    /// Removes the binding for `key`, returning its value.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the binding for `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let z = self.find_id(key);
        if z.is_nil() {
            return None;
        }
        let node = self.remove_node(z);
        Some((node.key, node.value))
    }
}

impl<K: Debug, V: Debug, C> Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Panics unless every red-black and bookkeeping invariant holds.
    pub(crate) fn check_invariants(&self) {
        if self.root.is_nil() {
            assert_eq!(self.len, 0, "empty tree with nonzero len");
        } else {
            assert_eq!(self.color_of(self.root), Color::Black, "red root");
            assert!(self.node(self.root).parent.is_nil(), "root has a parent");
        }
        let (count, _) = self.check_subtree(self.root);
        assert_eq!(count, self.len, "len does not match reachable nodes");

        let occupied = self.nodes.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len, "arena holds unreachable nodes");
        assert_eq!(occupied + self.free.len(), self.nodes.len(), "free list out of sync");

        let mut prev: Option<&K> = None;
        for (k, _) in self.iter() {
            if let Some(p) = prev {
                assert_eq!(self.cmp.compare(p, k), Ordering::Less, "keys out of order");
            }
            prev = Some(k);
        }
    }

    /// Returns (node count, black height) of the subtree at `x`.
    fn check_subtree(&self, x: Id) -> (usize, usize) {
        if x.is_nil() {
            return (0, 1);
        }
        let node = self.node(x);
        for &c in &node.ch {
            if !c.is_nil() {
                assert_eq!(self.node(c).parent, x, "broken parent link");
                assert!(
                    !(node.color == Color::Red && self.node(c).color == Color::Red),
                    "red node with red child"
                );
            }
        }
        let (ln, lh) = self.check_subtree(node.ch[LEFT]);
        let (rn, rh) = self.check_subtree(node.ch[RIGHT]);
        assert_eq!(lh, rh, "black height mismatch");
        (ln + rn + 1, lh + usize::from(node.color == Color::Black))
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        (!self.root.is_nil()).then(|| &self.node(self.root).key)
    }

    /// Key, color, parent key and child keys of every node, in key order.
    #[allow(clippy::type_complexity)]
    pub(crate) fn shape(&self) -> Vec<(K, Color, Option<K>, [Option<K>; 2])>
    where
        K: Clone,
    {
        let key_of = |x: Id| (!x.is_nil()).then(|| self.node(x).key.clone());
        let mut out = Vec::with_capacity(self.len);
        for k in self.keys() {
            let x = self.find_id(&k);
            let node = self.node(x);
            out.push((
                k,
                node.color,
                key_of(node.parent),
                [key_of(node.ch[LEFT]), key_of(node.ch[RIGHT])],
            ));
        }
        out
    }
}

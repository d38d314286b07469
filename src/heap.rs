//! Fibonacci heap.
//!
//! The heap is a forest of heap-ordered trees whose roots sit in one
//! circular sibling ring, with a pointer at the minimum root. Insert and
//! meld just splice into the root ring; the real work is deferred:
//!
//! - **extract_min** promotes the minimum's children to roots and then
//!   *consolidates*, repeatedly linking roots of equal degree until every
//!   remaining root degree is unique. This is where the O(log n) is paid.
//! - **decrease_key** cuts the node loose if it now orders before its
//!   parent, and *cascading cuts* walk up through marked ancestors: a node
//!   that has already lost one child is cut as soon as it loses a second.
//!
//! The marking rule is what bounds tree degrees: a tree whose root has
//! degree k holds at least F(k+2) nodes, so the maximum degree is at most
//! log_φ(n) ≈ 1.44·log₂(n). The consolidation table is sized from that
//! bound.
//!
//! Keys are ordered by a [`Compare`] value stored in the heap. Equal keys
//! are fine; every tie is broken the same way, so extraction order is
//! reproducible.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use compare::{natural, Compare, Natural};

use crate::error::HeapError;
use crate::node::{Handle, Node, NodeRef};
use crate::ring;

/// A mergeable min-priority queue with O(1) amortized `decrease_key`.
///
/// `K` is the key (priority) type, `V` the payload, and `C` the comparator
/// defining the total order on keys, defaulting to `K`'s natural order.
///
/// # Example
///
/// ```rust
/// use fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.peek(), Some((&1, &"item")));
/// ```
pub struct FibonacciHeap<K, V, C: Compare<K> = Natural<K>> {
    /// The minimum root, `None` iff the heap is empty
    min: Option<NodeRef<K, V>>,
    /// Number of elements
    len: usize,
    /// Total order on keys
    cmp: C,
}

impl<K: Ord, V> FibonacciHeap<K, V> {
    /// Creates an empty heap ordered by `K`'s natural order.
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<K, V, C: Compare<K> + Default> Default for FibonacciHeap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K>> FibonacciHeap<K, V, C> {
    /// Creates an empty heap ordered by the given comparator.
    pub fn with_comparator(cmp: C) -> Self {
        FibonacciHeap {
            min: None,
            len: 0,
            cmp,
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap contains no elements.
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Removes every element, invalidating all outstanding handles.
    ///
    /// The sibling rings are strong reference cycles; this severs them so
    /// the nodes can be reclaimed.
    pub fn clear(&mut self) {
        if let Some(min) = self.min.take() {
            ring::tear_down(min);
        }
        self.len = 0;
    }

    /// Inserts an element, returning a handle for later `decrease_key`,
    /// `delete`, or value access.
    ///
    /// # Time Complexity
    /// O(1): the new node is spliced into the root ring as its own tree.
    pub fn insert(&mut self, key: K, value: V) -> Handle<K, V> {
        let node = Node::new(key, value);
        let handle = Handle::new(&node);
        ring::make(&node);
        match self.min.clone() {
            Some(min) => {
                ring::splice(&min, &node);
                if self.key_less(&node, &min) {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }
        self.len += 1;
        handle
    }

    /// Inserts an element, returning a handle.
    ///
    /// Alias for [`insert`](Self::insert), for consistency with
    /// `BinaryHeap::push`.
    #[inline]
    pub fn push(&mut self, key: K, value: V) -> Handle<K, V> {
        self.insert(key, value)
    }

    /// Inserts a fresh copy of the key/value held by an existing handle.
    ///
    /// The referenced node is left untouched (it may even belong to another
    /// heap); the returned handle refers to the new node only.
    pub fn insert_from(&mut self, handle: &Handle<K, V>) -> Result<Handle<K, V>, HeapError>
    where
        K: Clone,
        V: Clone,
    {
        let key = handle.key()?;
        let value = handle.value()?;
        Ok(self.insert(key, value))
    }

    /// Returns the minimum key and its value without removing them.
    ///
    /// [`min_handle`](Self::min_handle) is the handle-returning form of
    /// this query.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.min.as_ref().map(|min| {
            // SAFETY: We bypass RefCell's dynamic borrow checking to return
            // references with lifetime tied to `&self`. This is safe because:
            // 1. The Rc in `self.min` keeps the node alive for `&self`'s
            //    lifetime.
            // 2. Every mutation of a node's key or value goes through a
            //    `&mut self` method of the owning heap, which the borrow
            //    checker rules out while these references exist.
            // 3. A node reachable from `self.min` always holds its payload;
            //    key/value are only taken at removal, which unlinks first.
            unsafe {
                let ptr = min.as_ptr();
                (
                    (*ptr).key.as_ref().unwrap_unchecked(),
                    (*ptr).value.as_ref().unwrap_unchecked(),
                )
            }
        })
    }

    /// Returns the minimum key and its value without removing them.
    ///
    /// Alias for [`peek`](Self::peek).
    #[inline]
    pub fn find_min(&self) -> Option<(&K, &V)> {
        self.peek()
    }

    /// Returns a handle to the current minimum element, or `None` if the
    /// heap is empty.
    ///
    /// This is the handle-returning form of [`peek`](Self::peek): the
    /// handle reads the minimum's key and value and can be passed to
    /// [`decrease_key`](Self::decrease_key) or [`delete`](Self::delete).
    pub fn min_handle(&self) -> Option<Handle<K, V>> {
        self.min.as_ref().map(Handle::new)
    }

    /// Removes and returns the minimum key and its value.
    ///
    /// # Time Complexity
    /// O(log n) amortized: the minimum's children become roots and the root
    /// ring is consolidated until all root degrees are distinct.
    pub fn extract_min(&mut self) -> Option<(K, V)> {
        let z = self.min.clone()?;
        let out = self.remove_root(z);
        #[cfg(debug_assertions)]
        self.debug_validate();
        Some(out)
    }

    /// Removes and returns the minimum key and its value.
    ///
    /// Alias for [`extract_min`](Self::extract_min), for consistency with
    /// `BinaryHeap::pop`.
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.extract_min()
    }

    /// Moves every element of `other` into this heap, leaving `other` empty.
    ///
    /// Handles into `other` become handles into this heap. Both heaps must
    /// order keys identically (they share the comparator type); the
    /// surviving heap keeps using its own comparator value.
    ///
    /// # Time Complexity
    /// O(1): the two root rings are spliced together.
    pub fn meld(&mut self, other: &mut Self) {
        let Some(other_min) = other.min.take() else {
            return;
        };
        let other_len = std::mem::take(&mut other.len);
        match self.min.clone() {
            Some(min) => {
                ring::splice(&min, &other_min);
                if self.key_less(&other_min, &min) {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }
        self.len += other_len;
    }

    /// Moves every element of `other` into this heap, consuming it.
    ///
    /// Alias for [`meld`](Self::meld).
    #[inline]
    pub fn merge(&mut self, mut other: Self) {
        self.meld(&mut other);
    }

    /// Lowers the key of the element behind `handle` to `new_key`.
    ///
    /// The new key must not order after the current one; an equal key is
    /// accepted and leaves the structure unchanged.
    ///
    /// # Errors
    /// [`HeapError::KeyNotDecreased`] if `new_key` orders after the current
    /// key (the heap is unchanged), [`HeapError::StaleHandle`] if the
    /// element has been removed.
    ///
    /// # Time Complexity
    /// O(1) amortized. If the new key orders before the parent's, the node
    /// is cut to the root ring and cascading cuts run up through marked
    /// ancestors.
    pub fn decrease_key(&mut self, handle: &Handle<K, V>, new_key: K) -> Result<(), HeapError> {
        let node = handle.live()?;
        {
            let mut n = node.borrow_mut();
            let current = n.key.as_ref().expect("live node holds a key");
            if self.cmp.compares_gt(&new_key, current) {
                return Err(HeapError::KeyNotDecreased);
            }
            n.key = Some(new_key);
        }
        let parent = node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            if self.key_less(&node, &parent) {
                self.cut(&node);
                self.cascading_cut(parent);
            }
        }
        // only a root can undercut the minimum; a node still below its
        // parent is bounded by the chain up to its tree's root
        if node.borrow().parent.upgrade().is_none() {
            if let Some(min) = self.min.clone() {
                if !Rc::ptr_eq(&min, &node) && self.key_less(&node, &min) {
                    self.min = Some(node);
                }
            }
        }
        #[cfg(debug_assertions)]
        self.debug_validate();
        Ok(())
    }

    /// Removes the element behind `handle`, returning its key and value.
    ///
    /// The removal is structural: a non-root node is first cut (with the
    /// usual cascading cuts), then removed exactly like an extracted
    /// minimum. No sentinel key is involved, so `K` needs no notion of
    /// minus infinity.
    ///
    /// # Errors
    /// [`HeapError::StaleHandle`] if the element has already been removed.
    ///
    /// # Time Complexity
    /// O(log n) amortized.
    pub fn delete(&mut self, handle: &Handle<K, V>) -> Result<(K, V), HeapError> {
        let node = handle.live()?;
        let parent = node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            self.cut(&node);
            self.cascading_cut(parent);
        }
        let out = self.remove_root(node);
        #[cfg(debug_assertions)]
        self.debug_validate();
        Ok(out)
    }

    /// Replaces the value of the element behind `handle`, returning the old
    /// value.
    ///
    /// Reading goes through [`Handle::value`]; writing requires the owning
    /// heap so that all mutation is serialized through `&mut self`.
    pub fn set_value(&mut self, handle: &Handle<K, V>, value: V) -> Result<V, HeapError> {
        let node = handle.live()?;
        let mut n = node.borrow_mut();
        match n.value.take() {
            Some(old) => {
                n.value = Some(value);
                Ok(old)
            }
            None => Err(HeapError::StaleHandle),
        }
    }

    /// True if `a`'s key orders strictly before `b`'s.
    ///
    /// Callers must pass distinct nodes and hold no borrow on either.
    fn key_less(&self, a: &NodeRef<K, V>, b: &NodeRef<K, V>) -> bool {
        let a = a.borrow();
        let b = b.borrow();
        self.cmp.compares_lt(
            a.key.as_ref().expect("live node holds a key"),
            b.key.as_ref().expect("live node holds a key"),
        )
    }

    /// Removes the root `z` from the forest and consolidates what remains.
    ///
    /// `z`'s children are promoted to roots (parents cleared, marks
    /// cleared) and join the surviving roots in one consolidation pass that
    /// also locates the new minimum.
    fn remove_root(&mut self, z: NodeRef<K, V>) -> (K, V) {
        let entry = self.min.take().expect("remove_root on an empty heap");
        let mut roots: Vec<NodeRef<K, V>> = ring::collect(&entry)
            .into_iter()
            .filter(|n| !Rc::ptr_eq(n, &z))
            .collect();
        let children = z.borrow_mut().child.take();
        if let Some(child) = children {
            for c in ring::collect(&child) {
                {
                    let mut cb = c.borrow_mut();
                    cb.parent = Weak::new();
                    cb.marked = false;
                }
                roots.push(c);
            }
        }
        let (key, value) = {
            let mut zb = z.borrow_mut();
            zb.right = None;
            zb.left = Weak::new();
            (
                zb.key.take().expect("live node holds a key"),
                zb.value.take().expect("live node holds a value"),
            )
        };
        self.len -= 1;
        if !roots.is_empty() {
            self.consolidate(roots);
        }
        (key, value)
    }

    /// Links equal-degree roots until every degree appears at most once,
    /// then rebuilds the root ring and the minimum pointer.
    ///
    /// Works like binary addition with carries: each root is filed into a
    /// table slot by degree; a collision links the two trees (the smaller
    /// key on top) and carries the result into the next slot. The table is
    /// sized from the Fibonacci degree bound and grown if a pathological
    /// comparator exceeds it.
    fn consolidate(&mut self, roots: Vec<NodeRef<K, V>>) {
        let mut table: Vec<Option<NodeRef<K, V>>> = vec![None; self.len.ilog2() as usize + 2];
        for root in roots {
            let mut x = root;
            let mut d = x.borrow().degree;
            loop {
                if d >= table.len() {
                    table.resize(d + 1, None);
                }
                let Some(y) = table[d].take() else {
                    table[d] = Some(x);
                    break;
                };
                // the strictly smaller key becomes the parent; on a tie the
                // root being filed stays on top, keeping ties deterministic
                let (parent, child) = if self.key_less(&y, &x) { (y, x) } else { (x, y) };
                Self::link(&parent, &child);
                x = parent;
                d += 1;
            }
        }
        let mut min: Option<NodeRef<K, V>> = None;
        for node in table.into_iter().flatten() {
            ring::make(&node);
            min = match min {
                None => Some(node),
                Some(cur) => {
                    ring::splice(&cur, &node);
                    if self.key_less(&node, &cur) {
                        Some(node)
                    } else {
                        Some(cur)
                    }
                }
            };
        }
        self.min = min;
    }

    /// Makes `child` a child of `parent`.
    ///
    /// Both must be roots of the working set with `parent`'s key ordering
    /// no later than `child`'s. The child's mark is cleared: it starts a
    /// fresh life under its new parent.
    fn link(parent: &NodeRef<K, V>, child: &NodeRef<K, V>) {
        ring::make(child);
        {
            let mut cb = child.borrow_mut();
            cb.parent = Rc::downgrade(parent);
            cb.marked = false;
        }
        let head = parent.borrow().child.clone();
        match head {
            Some(head) => ring::splice(&head, child),
            None => parent.borrow_mut().child = Some(Rc::clone(child)),
        }
        parent.borrow_mut().degree += 1;
    }

    /// Detaches `node` from its parent and promotes it to the root ring,
    /// clearing its mark.
    fn cut(&mut self, node: &NodeRef<K, V>) {
        let parent = node.borrow().parent.upgrade();
        let Some(parent) = parent else {
            return;
        };
        let rest = ring::unlink(node);
        {
            let mut pb = parent.borrow_mut();
            pb.degree -= 1;
            let points_here = pb.child.as_ref().map_or(false, |c| Rc::ptr_eq(c, node));
            if points_here {
                pb.child = rest;
            }
        }
        ring::make(node);
        if let Some(min) = self.min.clone() {
            ring::splice(&min, node);
        } else {
            self.min = Some(Rc::clone(node));
        }
        let mut nb = node.borrow_mut();
        nb.parent = Weak::new();
        nb.marked = false;
    }

    /// Propagates a cut upward: an unmarked ancestor is marked and the
    /// cascade stops; a marked ancestor is cut too and the cascade
    /// continues. Roots absorb the cascade unchanged.
    fn cascading_cut(&mut self, node: NodeRef<K, V>) {
        let parent = node.borrow().parent.upgrade();
        let Some(parent) = parent else {
            return;
        };
        let marked = node.borrow().marked;
        if !marked {
            node.borrow_mut().marked = true;
        } else {
            self.cut(&node);
            self.cascading_cut(parent);
        }
    }

    /// Deep structural copy of a sibling ring and everything below it.
    ///
    /// Returns the copy of `head`; since cloning starts at the ring member
    /// `min` points to, the copied heap's minimum is the image of the
    /// original's.
    fn clone_ring(head: &NodeRef<K, V>, parent: Option<&NodeRef<K, V>>) -> NodeRef<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let originals = ring::collect(head);
        let copies: Vec<NodeRef<K, V>> = originals
            .iter()
            .map(|orig| {
                let ob = orig.borrow();
                let copy = Rc::new(RefCell::new(Node {
                    key: ob.key.clone(),
                    value: ob.value.clone(),
                    degree: ob.degree,
                    marked: ob.marked,
                    parent: parent.map_or_else(Weak::new, Rc::downgrade),
                    child: None,
                    left: Weak::new(),
                    right: None,
                }));
                if let Some(child) = &ob.child {
                    let child_copy = Self::clone_ring(child, Some(&copy));
                    copy.borrow_mut().child = Some(child_copy);
                }
                copy
            })
            .collect();
        for (i, node) in copies.iter().enumerate() {
            let next = &copies[(i + 1) % copies.len()];
            node.borrow_mut().right = Some(Rc::clone(next));
            next.borrow_mut().left = Rc::downgrade(node);
        }
        Rc::clone(&copies[0])
    }

    /// Full structural check, run after the restructuring operations in
    /// debug builds: heap order, ring and parent/child consistency,
    /// degrees, marks, the minimum, the element count, and the Fibonacci
    /// degree bound.
    #[cfg(debug_assertions)]
    fn debug_validate(&self) {
        let Some(min) = &self.min else {
            assert_eq!(self.len, 0, "empty heap with nonzero len");
            return;
        };
        let degree_bound = self.len.ilog2() as usize * 3 / 2 + 2;
        let mut count = 0;
        for root in ring::collect(min) {
            {
                let rb = root.borrow();
                assert!(rb.parent.upgrade().is_none(), "root with a parent");
                assert!(!rb.marked, "marked root");
            }
            if !Rc::ptr_eq(&root, min) {
                assert!(!self.key_less(&root, min), "min pointer is not minimal");
            }
            count += self.validate_tree(&root, degree_bound);
        }
        assert_eq!(count, self.len, "len disagrees with reachable nodes");
    }

    #[cfg(debug_assertions)]
    fn validate_tree(&self, node: &NodeRef<K, V>, degree_bound: usize) -> usize {
        let (right, left, child, degree) = {
            let nb = node.borrow();
            assert!(!nb.is_removed(), "removed node still linked");
            (
                nb.right.clone().expect("linked node"),
                nb.left.upgrade().expect("linked node"),
                nb.child.clone(),
                nb.degree,
            )
        };
        assert!(degree <= degree_bound, "degree exceeds the Fibonacci bound");
        let right_back = right.borrow().left.upgrade();
        assert!(
            right_back.map_or(false, |l| Rc::ptr_eq(&l, node)),
            "broken ring: right neighbor does not point back"
        );
        let left_back = left.borrow().right.clone();
        assert!(
            left_back.map_or(false, |r| Rc::ptr_eq(&r, node)),
            "broken ring: left neighbor does not point back"
        );
        let mut size = 1;
        match child {
            None => assert_eq!(degree, 0, "leaf with nonzero degree"),
            Some(child) => {
                let kids = ring::collect(&child);
                assert_eq!(kids.len(), degree, "degree disagrees with child ring");
                for kid in &kids {
                    let parent_ok = kid
                        .borrow()
                        .parent
                        .upgrade()
                        .map_or(false, |p| Rc::ptr_eq(&p, node));
                    assert!(parent_ok, "child with a wrong parent pointer");
                    assert!(!self.key_less(kid, node), "heap order violated");
                    size += self.validate_tree(kid, degree_bound);
                }
            }
        }
        size
    }
}

impl<K, V, C: Compare<K>> Drop for FibonacciHeap<K, V, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone, V: Clone, C: Compare<K> + Clone> Clone for FibonacciHeap<K, V, C> {
    /// Deep copy: duplicates every node of the forest.
    ///
    /// The clone is fully independent: operations on either heap leave the
    /// other untouched, and handles stay bound to the heap that issued
    /// them. Fresh handles for the clone come from its own operations.
    fn clone(&self) -> Self {
        FibonacciHeap {
            min: self.min.as_ref().map(|min| Self::clone_ring(min, None)),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for FibonacciHeap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut heap = Self::with_comparator(C::default());
        heap.extend(iter);
        heap
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for FibonacciHeap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

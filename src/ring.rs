//! Circular doubly-linked sibling rings.
//!
//! Both the root list and every child list are rings: a lone node points to
//! itself, and any member serves as an entry point. Splicing two rings and
//! unlinking one node are O(1) pointer swaps, which is what makes insert and
//! meld constant-time.
//!
//! `right` links are strong and `left` links weak, so a live ring is a
//! strong cycle. [`collect`] snapshots a ring into a `Vec` before any
//! rewrite that would invalidate the walk, and [`tear_down`] severs the
//! strong links of a dead forest so reference counting can reclaim it.

use std::rc::{Rc, Weak};

use crate::node::NodeRef;

/// Closes `node` into a one-element ring.
pub(crate) fn make<K, V>(node: &NodeRef<K, V>) {
    let mut n = node.borrow_mut();
    n.right = Some(Rc::clone(node));
    n.left = Rc::downgrade(node);
}

/// Concatenates the ring containing `a` with the ring containing `b`.
///
/// The rings must be distinct. Afterwards `a`'s successor is `b`, and the
/// rest of both rings follows in order.
pub(crate) fn splice<K, V>(a: &NodeRef<K, V>, b: &NodeRef<K, V>) {
    let a_next = a.borrow().right.clone().expect("splice of unlinked node");
    let b_prev = b
        .borrow()
        .left
        .upgrade()
        .expect("splice of unlinked node");
    a.borrow_mut().right = Some(Rc::clone(b));
    b.borrow_mut().left = Rc::downgrade(a);
    b_prev.borrow_mut().right = Some(Rc::clone(&a_next));
    a_next.borrow_mut().left = Rc::downgrade(&b_prev);
}

/// Removes `x` from its ring, leaving `x` unlinked.
///
/// Returns a surviving member of the ring, or `None` if `x` was the only
/// element.
pub(crate) fn unlink<K, V>(x: &NodeRef<K, V>) -> Option<NodeRef<K, V>> {
    let right = x.borrow_mut().right.take().expect("unlink of unlinked node");
    let left = x.borrow().left.upgrade().expect("unlink of unlinked node");
    x.borrow_mut().left = Weak::new();
    if Rc::ptr_eq(&right, x) {
        return None;
    }
    left.borrow_mut().right = Some(Rc::clone(&right));
    right.borrow_mut().left = Rc::downgrade(&left);
    Some(right)
}

/// Snapshots the members of the ring containing `head`, starting at `head`.
pub(crate) fn collect<K, V>(head: &NodeRef<K, V>) -> Vec<NodeRef<K, V>> {
    let mut out = vec![Rc::clone(head)];
    let mut cur = head.borrow().right.clone().expect("walk of unlinked node");
    while !Rc::ptr_eq(&cur, head) {
        let next = cur.borrow().right.clone().expect("walk of unlinked node");
        out.push(cur);
        cur = next;
    }
    out
}

/// Severs every strong link in the forest rooted at `head`'s ring.
///
/// The rings are strong cycles, so dropping the last external reference is
/// not enough to free them; this walk breaks each ring once and recurses
/// into child rings. Recursion depth is bounded by the deepest tree.
pub(crate) fn tear_down<K, V>(head: NodeRef<K, V>) {
    for node in collect(&head) {
        let child = {
            let mut n = node.borrow_mut();
            n.right = None;
            n.left = Weak::new();
            n.parent = Weak::new();
            n.child.take()
        };
        if let Some(child) = child {
            tear_down(child);
        }
    }
}

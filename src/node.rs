//! Node store and external handles.
//!
//! Every element lives in one reference-counted cell. The heap holds strong
//! references along the ownership spine (each node owns its successor in the
//! sibling ring and one of its children); back-edges (`parent`, `left`) are
//! weak so the spine stays acyclic for reference counting. Handles hold a
//! weak reference too: they never extend a node's lifetime, and once the
//! node has been removed an upgrade fails and the operation reports
//! [`HeapError::StaleHandle`].
//!
//! The key and value sit in `Option`s so removal can move them out while
//! stray strong references are still in scope; a node with `key == None` is
//! treated as removed regardless of its reference count.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::HeapError;

/// Strong reference to a node
pub(crate) type NodeRef<K, V> = Rc<RefCell<Node<K, V>>>;
/// Weak reference to a node (parent and left-sibling back-edges, handles)
pub(crate) type WeakNodeRef<K, V> = Weak<RefCell<Node<K, V>>>;

/// One element of the heap.
///
/// `left`/`right` link the node into the circular sibling ring it currently
/// belongs to (the root list, or some node's child ring). `right` is the
/// owning direction; `left` mirrors it weakly.
pub(crate) struct Node<K, V> {
    /// Key, `None` once the node has been removed
    pub(crate) key: Option<K>,
    /// Value, `None` once the node has been removed
    pub(crate) value: Option<V>,
    /// Number of direct children
    pub(crate) degree: usize,
    /// Set when a non-root node loses a child; a second loss cuts the node
    pub(crate) marked: bool,
    /// Parent node, dead if this is a root
    pub(crate) parent: WeakNodeRef<K, V>,
    /// Any one member of the child ring, `None` for a leaf
    pub(crate) child: Option<NodeRef<K, V>>,
    /// Predecessor in the sibling ring
    pub(crate) left: WeakNodeRef<K, V>,
    /// Successor in the sibling ring
    pub(crate) right: Option<NodeRef<K, V>>,
}

impl<K, V> Node<K, V> {
    /// Allocates a fresh unlinked node. The caller must place it into a ring
    /// before the heap uses it.
    pub(crate) fn new(key: K, value: V) -> NodeRef<K, V> {
        Rc::new(RefCell::new(Node {
            key: Some(key),
            value: Some(value),
            degree: 0,
            marked: false,
            parent: Weak::new(),
            child: None,
            left: Weak::new(),
            right: None,
        }))
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.key.is_none()
    }
}

/// Stable, opaque reference to an element of a [`FibonacciHeap`].
///
/// A handle is returned by `insert` and stays usable across any sequence of
/// operations on the heap, including melds (handles into the melded-away
/// heap become handles into the surviving one). It does not keep the
/// element alive: after `extract_min` or `delete` removes the node, every
/// operation through the handle reports [`HeapError::StaleHandle`].
///
/// Handles compare by node identity, not by key or value.
///
/// A handle must only be used with the heap that currently owns its node.
/// Passing it to a different heap's `decrease_key`/`delete`/`set_value` is
/// not detected and leaves the ordering of both heaps unspecified.
///
/// [`FibonacciHeap`]: crate::FibonacciHeap
pub struct Handle<K, V> {
    pub(crate) node: WeakNodeRef<K, V>,
}

impl<K, V> Handle<K, V> {
    pub(crate) fn new(node: &NodeRef<K, V>) -> Self {
        Handle {
            node: Rc::downgrade(node),
        }
    }

    /// Upgrades to the live node, reporting staleness both when the
    /// allocation is gone and when the payload has been taken.
    pub(crate) fn live(&self) -> Result<NodeRef<K, V>, HeapError> {
        let node = self.node.upgrade().ok_or(HeapError::StaleHandle)?;
        if node.borrow().is_removed() {
            return Err(HeapError::StaleHandle);
        }
        Ok(node)
    }

    /// Returns a copy of the element's current key.
    pub fn key(&self) -> Result<K, HeapError>
    where
        K: Clone,
    {
        let node = self.live()?;
        let key = node.borrow().key.clone();
        key.ok_or(HeapError::StaleHandle)
    }

    /// Returns a copy of the element's current value.
    ///
    /// Writing the value requires mutable access to the owning heap; see
    /// [`FibonacciHeap::set_value`](crate::FibonacciHeap::set_value).
    pub fn value(&self) -> Result<V, HeapError>
    where
        V: Clone,
    {
        let node = self.live()?;
        let value = node.borrow().value.clone();
        value.ok_or(HeapError::StaleHandle)
    }

    /// Returns true if the element has been removed from its heap.
    pub fn is_stale(&self) -> bool {
        self.live().is_err()
    }
}

impl<K, V> Clone for Handle<K, V> {
    fn clone(&self) -> Self {
        Handle {
            node: self.node.clone(),
        }
    }
}

impl<K, V> PartialEq for Handle<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<K, V> Eq for Handle<K, V> {}

impl<K, V> fmt::Debug for Handle<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.node.as_ptr()).finish()
    }
}

//! A mergeable min-priority queue implemented as a Fibonacci heap.
//!
//! Fibonacci heaps support the classic mergeable-heap interface with the
//! best known amortized bounds:
//!
//! - **insert**: O(1)
//! - **peek**: O(1)
//! - **extract_min**: O(log n) amortized
//! - **meld**: O(1)
//! - **decrease_key**: O(1) amortized
//! - **delete**: O(log n) amortized
//!
//! The heap hands out a stable [`Handle`] for every inserted element. A
//! handle stays valid across arbitrary operations on its heap (including
//! melds, which carry handles over to the surviving heap) and is the way to
//! address an element for [`decrease_key`](FibonacciHeap::decrease_key) and
//! [`delete`](FibonacciHeap::delete). Once the element has been removed,
//! operations through the handle report [`HeapError::StaleHandle`].
//!
//! The key ordering is supplied by a [`compare::Compare`] value stored in
//! the heap, defaulting to the natural `Ord` order of the key type, so the
//! same heap type serves as a max-heap or any other total order without
//! newtype wrappers.
//!
//! Cloning a heap performs a full structural deep copy: the clone owns fresh
//! nodes and hands out fresh handles, and operations on either heap leave
//! the other untouched.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let slow = heap.insert(30, "slow");
//! heap.insert(10, "fast");
//!
//! heap.decrease_key(&slow, 1).unwrap();
//! assert_eq!(heap.peek(), Some((&1, &"slow")));
//! assert_eq!(heap.extract_min(), Some((1, "slow")));
//! assert_eq!(heap.extract_min(), Some((10, "fast")));
//! assert!(heap.is_empty());
//! ```

pub mod error;
pub mod heap;
mod node;
mod ring;

pub use error::HeapError;
pub use heap::FibonacciHeap;
pub use node::Handle;

//! Error type for heap operations.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The new key passed to `decrease_key` orders after the current key
    KeyNotDecreased,
    /// The handle refers to a node that has already been removed
    StaleHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::KeyNotDecreased => {
                write!(f, "new key orders after the current key")
            }
            HeapError::StaleHandle => {
                write!(f, "handle refers to a removed element")
            }
        }
    }
}

impl std::error::Error for HeapError {}

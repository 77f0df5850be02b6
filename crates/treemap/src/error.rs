use std::fmt::{self, Display, Formatter};

/// Errors reported by the ordered map and the collections built on it.
///
/// A failed operation never changes the tree: no node is linked, unlinked,
/// recolored or rotated, and the length stays the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// Construction was attempted without a comparator.
    ComparatorRequired,
    /// `add` found a node whose key compares equal to the new key.
    DuplicateKey,
    /// No node holds the requested key.
    KeyNotFound,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComparatorRequired => write!(f, "a comparator is required to build an ordered map"),
            Self::DuplicateKey => write!(f, "key is already present in the tree"),
            Self::KeyNotFound => write!(f, "key is not present in the tree"),
        }
    }
}

impl std::error::Error for TreeError {}

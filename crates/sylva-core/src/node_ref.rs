//! Tagged references into the forest arenas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference from a decision node (or tree root) to its target.
///
/// Serialized tables use a single signed integer: `Internal(i)` encodes as
/// `i`, `Leaf(i)` as `-(i + 1)`. Leaf 0 therefore encodes as `-1`, keeping
/// `0` unambiguous for "decision node 0".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRef {
    Internal(u32),
    Leaf(u32),
}

impl NodeRef {
    /// Signed table encoding.
    #[inline]
    pub fn encode(self) -> i64 {
        match self {
            Self::Internal(i) => i as i64,
            Self::Leaf(i) => -(i as i64) - 1,
        }
    }

    /// Inverse of [`encode`](Self::encode).
    ///
    /// Returns `None` for values outside the `u32` index range.
    pub fn decode(value: i64) -> Option<Self> {
        if value >= 0 {
            u32::try_from(value).ok().map(Self::Internal)
        } else {
            u32::try_from(-(value + 1)).ok().map(Self::Leaf)
        }
    }

    /// Encoding narrowed to `int16_t`, the child field width of the loadable table.
    pub fn encode_i16(self) -> Option<i16> {
        i16::try_from(self.encode()).ok()
    }

    /// Shift into a larger arena: internal references by `nodes`, leaf references by `leaves`.
    ///
    /// Shifting a leaf index by `k` is the same as subtracting `k` in encoded space,
    /// so the `-(index + 1)` convention survives concatenation.
    #[inline]
    pub fn offset(self, nodes: u32, leaves: u32) -> Self {
        match self {
            Self::Internal(i) => Self::Internal(i + nodes),
            Self::Leaf(i) => Self::Leaf(i + leaves),
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_internal(self) -> Option<u32> {
        match self {
            Self::Internal(i) => Some(i),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(self) -> Option<u32> {
        match self {
            Self::Leaf(i) => Some(i),
            Self::Internal(_) => None,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

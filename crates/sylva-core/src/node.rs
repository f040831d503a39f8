//! Decision nodes and leaf payloads.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::NodeRef;

/// Internal node: `features[feature] < threshold` goes left, otherwise right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub feature: u32,
    pub threshold: f64,
    pub left: NodeRef,
    pub right: NodeRef,
}

impl DecisionNode {
    pub fn new(feature: u32, threshold: f64, left: NodeRef, right: NodeRef) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Both child references, left first.
    #[inline]
    pub fn children(&self) -> [NodeRef; 2] {
        [self.left, self.right]
    }

    /// Apply `f` to both child references.
    pub fn map_children(self, mut f: impl FnMut(NodeRef) -> NodeRef) -> Self {
        Self {
            left: f(self.left),
            right: f(self.right),
            ..self
        }
    }
}

/// Terminal payload of a tree.
///
/// Equality and hashing are structural: floats compare by bit pattern, so the
/// relation is reflexive (needed for deduplication) and `0.0 != -0.0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LeafPayload {
    /// Majority class id (classification).
    MajorityClass(u32),
    /// Scalar output (regression).
    RegressionValue(f64),
    /// One quantized code per class.
    QuantizedProbabilities(Vec<u8>),
}

impl LeafPayload {
    /// Number of scalars this payload contributes to a serialized leaf table.
    pub fn scalar_count(&self) -> usize {
        match self {
            Self::MajorityClass(_) | Self::RegressionValue(_) => 1,
            Self::QuantizedProbabilities(codes) => codes.len(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MajorityClass(_) => "majority class",
            Self::RegressionValue(_) => "regression value",
            Self::QuantizedProbabilities(_) => "quantized probabilities",
        }
    }
}

impl PartialEq for LeafPayload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MajorityClass(a), Self::MajorityClass(b)) => a == b,
            (Self::RegressionValue(a), Self::RegressionValue(b)) => a.to_bits() == b.to_bits(),
            (Self::QuantizedProbabilities(a), Self::QuantizedProbabilities(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LeafPayload {}

impl Hash for LeafPayload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::MajorityClass(c) => c.hash(state),
            Self::RegressionValue(v) => v.to_bits().hash(state),
            Self::QuantizedProbabilities(codes) => codes.hash(state),
        }
    }
}

impl fmt::Display for LeafPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MajorityClass(c) => write!(f, "{c}"),
            Self::RegressionValue(v) => write!(f, "{v:?}"),
            Self::QuantizedProbabilities(codes) => {
                write!(f, "[")?;
                for (i, code) in codes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{code}")?;
                }
                write!(f, "]")
            }
        }
    }
}

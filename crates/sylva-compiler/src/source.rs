//! Input contract: one trained tree as parallel per-node arrays.
//!
//! Matches the layout tree learners export: node `i` is a leaf when both
//! `children_left[i]` and `children_right[i]` are `-1`, and node 0 is the root.

use serde::{Deserialize, Serialize};

/// Sentinel child id meaning "no child".
pub const NO_CHILD: i64 = -1;

/// One source tree as exported by the tree learner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node statistics, shape `[node][output][class]`. Exactly one output is supported.
    pub value: Vec<Vec<Vec<f64>>>,
}

/// A source tree whose arrays cannot be flattened.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("tree has no nodes")]
    Empty,

    #[error("ensemble has no trees")]
    EmptyEnsemble,

    #[error("`{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("node {node} has {outputs} outputs, only single-output trees are supported")]
    MultipleOutputs { node: usize, outputs: usize },

    #[error("node {node} has exactly one child")]
    HalfLeaf { node: usize },

    #[error("node {node} references child {child}, outside the tree")]
    ChildOutOfRange { node: usize, child: i64 },

    #[error("node {node} tests invalid feature {feature}")]
    InvalidFeature { node: usize, feature: i64 },

    #[error("leaf {node} has an empty value vector")]
    EmptyValue { node: usize },

    #[error("leaf {node} has {len} values, regression needs exactly one")]
    NotScalar { node: usize, len: usize },
}

impl SourceTree {
    /// Parse one tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse an ensemble (JSON array of trees).
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Whether source node `node` is a leaf (both children absent).
    #[inline]
    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == NO_CHILD && self.children_right[node] == NO_CHILD
    }

    /// Statistics of the single output of `node`.
    #[inline]
    pub fn output(&self, node: usize) -> &[f64] {
        &self.value[node][0]
    }

    /// Check array lengths, output count, child ids and features.
    ///
    /// After this succeeds every accessor above is in range for every node.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let n = self.node_count();
        if n == 0 {
            return Err(ShapeError::Empty);
        }

        let lengths = [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ];
        for (field, actual) in lengths {
            if actual != n {
                return Err(ShapeError::LengthMismatch {
                    field,
                    expected: n,
                    actual,
                });
            }
        }

        for node in 0..n {
            let outputs = self.value[node].len();
            if outputs != 1 {
                return Err(ShapeError::MultipleOutputs { node, outputs });
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            match (left == NO_CHILD, right == NO_CHILD) {
                (true, true) => continue,
                (false, false) => {}
                _ => return Err(ShapeError::HalfLeaf { node }),
            }
            for child in [left, right] {
                if child < 0 || child as usize >= n {
                    return Err(ShapeError::ChildOutOfRange { node, child });
                }
            }

            let feature = self.feature[node];
            if u32::try_from(feature).is_err() {
                return Err(ShapeError::InvalidFeature { node, feature });
            }
        }

        Ok(())
    }
}

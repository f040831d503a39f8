//! Single-tree flattening into decision-node and leaf arrays.
//!
//! Source trees interleave decision nodes and leaves in one id space. Leaves
//! move to their own array, so decision nodes are renumbered:
//! - decision nodes take output positions in ascending source-id order
//! - leaves take positions as their parents are visited (ascending source id,
//!   left child before right)

use sylva_core::verify::{Region, verify_region};
use sylva_core::{DecisionNode, LeafPayload, NodeRef, ValidationError};

use crate::SourceTree;

use super::LeafMode;

/// One flattened tree with tree-local references.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatTree {
    pub nodes: Vec<DecisionNode>,
    pub leaves: Vec<LeafPayload>,
    /// `Internal(0)`, or `Leaf(0)` when the source root is itself a leaf.
    pub root: NodeRef,
}

/// Flatten `tree`, building leaf payloads with `mode`.
///
/// The result satisfies the reference invariants of a single-tree forest and
/// holds exactly as many nodes and leaves as the source tree has nodes.
pub fn flatten_tree(tree: &SourceTree, mode: LeafMode) -> crate::Result<FlatTree> {
    tree.check_shape()?;

    if tree.is_leaf(0) {
        return flatten_leaf_root(tree, mode);
    }

    // Pass 1: output position of every decision node.
    let mut position: Vec<Option<u32>> = vec![None; tree.node_count()];
    let mut next = 0u32;
    for (node, slot) in position.iter_mut().enumerate() {
        if !tree.is_leaf(node) {
            *slot = Some(next);
            next += 1;
        }
    }

    // Pass 2: emit decision nodes, materializing leaves as they are referenced.
    let mut nodes = Vec::with_capacity(next as usize);
    let mut leaves = Vec::new();
    for node in 0..tree.node_count() {
        if tree.is_leaf(node) {
            continue;
        }
        let mut child_ref = |child: i64| -> crate::Result<NodeRef> {
            let child = child as usize;
            match position[child] {
                Some(index) => Ok(NodeRef::Internal(index)),
                None => {
                    let leaf = mode.leaf(child, tree.output(child))?;
                    leaves.push(leaf);
                    Ok(NodeRef::Leaf(leaves.len() as u32 - 1))
                }
            }
        };
        let left = child_ref(tree.children_left[node])?;
        let right = child_ref(tree.children_right[node])?;
        nodes.push(DecisionNode::new(
            tree.feature[node] as u32,
            tree.threshold[node],
            left,
            right,
        ));
    }

    let flat = FlatTree {
        nodes,
        leaves,
        root: NodeRef::Internal(0),
    };
    flat.check(tree.node_count())?;
    Ok(flat)
}

/// A tree that is a single leaf: no decision nodes, root points at leaf 0.
fn flatten_leaf_root(tree: &SourceTree, mode: LeafMode) -> crate::Result<FlatTree> {
    let leaf = mode.leaf(0, tree.output(0))?;
    let flat = FlatTree {
        nodes: Vec::new(),
        leaves: vec![leaf],
        root: NodeRef::Leaf(0),
    };
    flat.check(tree.node_count())?;
    Ok(flat)
}

impl FlatTree {
    /// Node-count conservation plus the single-tree reference invariants.
    fn check(&self, source_nodes: usize) -> Result<(), ValidationError> {
        let actual = self.nodes.len() + self.leaves.len();
        if actual != source_nodes {
            return Err(ValidationError::NodeCountMismatch {
                expected: source_nodes,
                actual,
            });
        }
        let roots = [self.root];
        let region = Region::all(self.nodes.len(), self.leaves.len(), roots.len());
        verify_region(&self.nodes, &self.leaves, &roots, &region)
    }
}

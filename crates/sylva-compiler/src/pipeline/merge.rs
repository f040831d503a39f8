//! Concatenation of flattened trees into one forest.

use sylva_core::verify::{Region, check_node_capacity, verify_region};
use sylva_core::{Forest, ForestConfig, NodeRef};

use crate::{Error, ShapeError};

use super::FlatTree;

/// Append every tree to shared arenas, shifting its references by the sizes
/// of the arenas before it.
///
/// Each appended tree is verified on its own (so a failure names the tree),
/// and the finished forest is verified as a whole.
pub fn merge_trees(trees: &[FlatTree], config: ForestConfig) -> crate::Result<Forest> {
    if trees.is_empty() {
        return Err(ShapeError::EmptyEnsemble.into());
    }

    let mut roots = Vec::with_capacity(trees.len());
    let mut nodes = Vec::with_capacity(trees.iter().map(|t| t.nodes.len()).sum());
    let mut leaves = Vec::with_capacity(trees.iter().map(|t| t.leaves.len()).sum());

    for (index, tree) in trees.iter().enumerate() {
        let node_offset = nodes.len();
        let leaf_offset = leaves.len();
        let shift = |r: NodeRef| r.offset(node_offset as u32, leaf_offset as u32);

        nodes.extend(tree.nodes.iter().map(|n| n.map_children(shift)));
        leaves.extend(tree.leaves.iter().cloned());
        roots.push(shift(tree.root));

        check_node_capacity(nodes.len())?;
        let region = Region {
            nodes: node_offset..nodes.len(),
            leaves: leaf_offset..leaves.len(),
            trees: index..index + 1,
        };
        verify_region(&nodes, &leaves, &roots, &region)
            .map_err(|e| Error::from(e).at_tree(index))?;

        tracing::debug!(tree = index, node_offset, leaf_offset, "merged tree");
    }

    Ok(Forest::new(roots, nodes, leaves, config)?)
}

//! Reference and capacity invariants.
//!
//! Checks run over a [`Region`] of the shared arenas so that merging can verify
//! each appended tree in time proportional to that tree alone. A full check is a
//! region covering everything.

use std::ops::Range;

use crate::{
    CapacityError, CapacityKind, ConfigError, DecisionNode, ForestConfig, LeafPayload,
    MAX_DECISION_NODES, MAX_ENCODED_LEAVES, ModelKind, NodeRef, ValidationError,
};

/// Slice of the arenas (and of the root list) owned by a group of trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub nodes: Range<usize>,
    pub leaves: Range<usize>,
    pub trees: Range<usize>,
}

impl Region {
    /// Region covering whole arenas.
    pub fn all(nodes: usize, leaves: usize, trees: usize) -> Self {
        Self {
            nodes: 0..nodes,
            leaves: 0..leaves,
            trees: 0..trees,
        }
    }
}

/// Decision-node count must fit the `int16_t` child encoding.
pub fn check_node_capacity(count: usize) -> Result<(), CapacityError> {
    if count > MAX_DECISION_NODES {
        return Err(CapacityError {
            kind: CapacityKind::DecisionNodes,
            count,
            limit: MAX_DECISION_NODES,
        });
    }
    Ok(())
}

/// Leaf count must fit the negative half of the `int16_t` child encoding.
pub fn check_leaf_capacity(count: usize) -> Result<(), CapacityError> {
    if count > MAX_ENCODED_LEAVES {
        return Err(CapacityError {
            kind: CapacityKind::Leaves,
            count,
            limit: MAX_ENCODED_LEAVES,
        });
    }
    Ok(())
}

/// Verify references and reachability for `region`.
///
/// Every reference held by a node in the region, and every root of a tree in
/// the region, must resolve within the full arenas. Walking from the region's
/// roots must stay inside the region, reach every node and leaf in it, and
/// reach each decision node exactly once (trees do not share decision nodes;
/// leaves may be shared).
pub fn verify_region(
    nodes: &[DecisionNode],
    leaves: &[LeafPayload],
    roots: &[NodeRef],
    region: &Region,
) -> Result<(), ValidationError> {
    for idx in region.nodes.clone() {
        for child in nodes[idx].children() {
            match child {
                NodeRef::Internal(target) if target as usize >= nodes.len() => {
                    return Err(ValidationError::DanglingInternal {
                        node: idx as u32,
                        target,
                        len: nodes.len(),
                    });
                }
                NodeRef::Leaf(target) if target as usize >= leaves.len() => {
                    return Err(ValidationError::DanglingLeaf {
                        node: idx as u32,
                        target,
                        len: leaves.len(),
                    });
                }
                _ => {}
            }
        }
    }

    let mut stack = Vec::with_capacity(region.trees.len());
    for tree in region.trees.clone() {
        let root = roots[tree];
        let resolves = match root {
            NodeRef::Internal(i) => (i as usize) < nodes.len(),
            NodeRef::Leaf(i) => (i as usize) < leaves.len(),
        };
        if !resolves {
            return Err(ValidationError::DanglingRoot { tree, root });
        }
        stack.push(root);
    }

    let mut node_seen = vec![false; region.nodes.len()];
    let mut leaf_seen = vec![false; region.leaves.len()];
    while let Some(target) = stack.pop() {
        match target {
            NodeRef::Internal(i) => {
                let slot = slot_in(&region.nodes, i).ok_or(ValidationError::Escapes(target))?;
                if node_seen[slot] {
                    return Err(ValidationError::SharedNode(i));
                }
                node_seen[slot] = true;
                stack.extend(nodes[i as usize].children());
            }
            NodeRef::Leaf(i) => {
                let slot = slot_in(&region.leaves, i).ok_or(ValidationError::Escapes(target))?;
                leaf_seen[slot] = true;
            }
        }
    }

    if let Some(slot) = node_seen.iter().position(|seen| !seen) {
        return Err(ValidationError::OrphanNode((region.nodes.start + slot) as u32));
    }
    if let Some(slot) = leaf_seen.iter().position(|seen| !seen) {
        return Err(ValidationError::OrphanLeaf((region.leaves.start + slot) as u32));
    }

    Ok(())
}

/// Verify the whole forest.
pub fn verify_all(
    nodes: &[DecisionNode],
    leaves: &[LeafPayload],
    roots: &[NodeRef],
) -> Result<(), ValidationError> {
    let region = Region::all(nodes.len(), leaves.len(), roots.len());
    verify_region(nodes, leaves, roots, &region)
}

/// Every tested feature must be below `feature_count`. A count of `0` skips the check.
pub fn verify_features(nodes: &[DecisionNode], feature_count: u32) -> Result<(), ValidationError> {
    if feature_count == 0 {
        return Ok(());
    }
    match nodes.iter().position(|n| n.feature >= feature_count) {
        Some(idx) => Err(ValidationError::FeatureOutOfRange {
            node: idx as u32,
            feature: nodes[idx].feature,
            feature_count,
        }),
        None => Ok(()),
    }
}

/// Leaf payloads must fit the model: class ids below `class_count` for
/// classifiers (which need at least one class), scalar values for regressors.
///
/// Probability payloads are accepted for classifiers.
pub fn check_leaf_payloads(
    leaves: &[LeafPayload],
    config: &ForestConfig,
) -> Result<(), ConfigError> {
    if config.kind.is_classifier() && config.class_count == 0 {
        return Err(ConfigError::NoClasses);
    }
    for (index, leaf) in leaves.iter().enumerate() {
        match (config.kind, leaf) {
            (ModelKind::Classifier, LeafPayload::MajorityClass(class)) => {
                if *class >= config.class_count {
                    return Err(ConfigError::ClassOutOfRange {
                        leaf: index as u32,
                        class: *class,
                        class_count: config.class_count,
                    });
                }
            }
            (ModelKind::Classifier, LeafPayload::QuantizedProbabilities(_))
            | (ModelKind::Regressor, LeafPayload::RegressionValue(_)) => {}
            (kind, leaf) => {
                return Err(ConfigError::LeafKindMismatch {
                    expected: kind.name(),
                    found: leaf.kind_name(),
                });
            }
        }
    }
    Ok(())
}

fn slot_in(range: &Range<usize>, index: u32) -> Option<usize> {
    let index = index as usize;
    range.contains(&index).then(|| index - range.start)
}

//! Verified forest value shared by all pipeline stages.

use serde::{Deserialize, Serialize};

use crate::verify::{check_node_capacity, verify_all, verify_features};
use crate::{DecisionNode, ForestConfig, ForestError, LeafPayload, NodeRef};

/// Merged trees over shared decision-node and leaf arenas.
///
/// A `Forest` only exists in a state satisfying every reference and capacity
/// invariant: construction verifies, and there are no mutators. Stages that
/// rewrite references build a new value from [`into_parts`](Self::into_parts).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForest", into = "RawForest")]
pub struct Forest {
    roots: Vec<NodeRef>,
    nodes: Vec<DecisionNode>,
    leaves: Vec<LeafPayload>,
    config: ForestConfig,
}

/// What a [`NodeRef`] points at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target<'a> {
    Node(&'a DecisionNode),
    Leaf(&'a LeafPayload),
}

impl Forest {
    /// Build a forest, verifying capacity, references and feature indices.
    pub fn new(
        roots: Vec<NodeRef>,
        nodes: Vec<DecisionNode>,
        leaves: Vec<LeafPayload>,
        config: ForestConfig,
    ) -> Result<Self, ForestError> {
        check_node_capacity(nodes.len())?;
        verify_all(&nodes, &leaves, &roots)?;
        verify_features(&nodes, config.feature_count)?;
        Ok(Self {
            roots,
            nodes,
            leaves,
            config,
        })
    }

    /// Per-tree entry references, in tree order.
    #[inline]
    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    #[inline]
    pub fn nodes(&self) -> &[DecisionNode] {
        &self.nodes
    }

    #[inline]
    pub fn leaves(&self) -> &[LeafPayload] {
        &self.leaves
    }

    #[inline]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.roots.len()
    }

    /// Decision node at `index`.
    ///
    /// # Panics
    /// If `index` is out of range. References taken from this forest never are.
    pub fn node(&self, index: u32) -> &DecisionNode {
        self.ensure_node(index)
    }

    /// Leaf payload at `index`.
    ///
    /// # Panics
    /// If `index` is out of range. References taken from this forest never are.
    pub fn leaf(&self, index: u32) -> &LeafPayload {
        self.ensure_leaf(index)
    }

    /// Follow a reference taken from this forest.
    pub fn resolve(&self, target: NodeRef) -> Target<'_> {
        match target {
            NodeRef::Internal(i) => Target::Node(self.node(i)),
            NodeRef::Leaf(i) => Target::Leaf(self.leaf(i)),
        }
    }

    /// Replace the scalar configuration, re-checking feature indices.
    pub fn with_config(self, config: ForestConfig) -> Result<Self, ForestError> {
        verify_features(&self.nodes, config.feature_count)?;
        Ok(Self { config, ..self })
    }

    /// Decompose into `(roots, nodes, leaves, config)`.
    pub fn into_parts(self) -> (Vec<NodeRef>, Vec<DecisionNode>, Vec<LeafPayload>, ForestConfig) {
        (self.roots, self.nodes, self.leaves, self.config)
    }
}

/// Unverified wire shape of [`Forest`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct RawForest {
    pub roots: Vec<NodeRef>,
    pub nodes: Vec<DecisionNode>,
    pub leaves: Vec<LeafPayload>,
    pub config: ForestConfig,
}

impl TryFrom<RawForest> for Forest {
    type Error = ForestError;

    fn try_from(raw: RawForest) -> Result<Self, Self::Error> {
        Forest::new(raw.roots, raw.nodes, raw.leaves, raw.config)
    }
}

impl From<Forest> for RawForest {
    fn from(forest: Forest) -> Self {
        let (roots, nodes, leaves, config) = forest.into_parts();
        Self {
            roots,
            nodes,
            leaves,
            config,
        }
    }
}

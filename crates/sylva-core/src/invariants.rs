//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{DecisionNode, Forest, LeafPayload};

impl Forest {
    pub(crate) fn ensure_node(&self, index: u32) -> &DecisionNode {
        self.nodes().get(index as usize).unwrap_or_else(|| {
            panic!(
                "Forest: decision node {index} not found among {} \
                 (references must come from the same verified forest)",
                self.nodes().len()
            )
        })
    }

    pub(crate) fn ensure_leaf(&self, index: u32) -> &LeafPayload {
        self.leaves().get(index as usize).unwrap_or_else(|| {
            panic!(
                "Forest: leaf {index} not found among {} \
                 (references must come from the same verified forest)",
                self.leaves().len()
            )
        })
    }
}

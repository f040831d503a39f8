//! Leaf deduplication.
//!
//! Merged forests repeat the same payload many times (a classifier has at most
//! `class_count` distinct majority leaves). Structurally equal payloads collapse
//! into one entry, kept in first-seen order, and every leaf reference is
//! remapped to it.

use indexmap::IndexSet;
use sylva_core::{Forest, NodeRef};

/// Informational summary of one deduplication pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DedupReport {
    pub original_leaves: usize,
    pub unique_leaves: usize,
    /// `(original - unique) / decision nodes`, `0.0` without decision nodes.
    pub wasted_ratio: f64,
}

/// Collapse structurally equal leaves. Idempotent.
pub fn dedup_leaves(forest: &Forest) -> crate::Result<(Forest, DedupReport)> {
    let mut unique = IndexSet::with_capacity(forest.leaves().len());
    let remap: Vec<u32> = forest
        .leaves()
        .iter()
        .map(|leaf| unique.insert_full(leaf).0 as u32)
        .collect();

    let relink = |r: NodeRef| match r {
        NodeRef::Leaf(i) => NodeRef::Leaf(remap[i as usize]),
        internal => internal,
    };

    let report = DedupReport {
        original_leaves: forest.leaves().len(),
        unique_leaves: unique.len(),
        wasted_ratio: match forest.nodes().len() {
            0 => 0.0,
            n => (forest.leaves().len() - unique.len()) as f64 / n as f64,
        },
    };

    let roots = forest.roots().iter().copied().map(relink).collect();
    let nodes = forest.nodes().iter().map(|n| n.map_children(relink)).collect();
    let leaves = unique.into_iter().cloned().collect();
    let deduped = Forest::new(roots, nodes, leaves, *forest.config())?;

    tracing::debug!(
        original = report.original_leaves,
        unique = report.unique_leaves,
        wasted_ratio = report.wasted_ratio,
        "deduplicated leaves"
    );
    Ok((deduped, report))
}

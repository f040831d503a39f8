//! Forest construction stages.
//!
//! `flatten` turns each source tree into node and leaf arrays, `merge`
//! concatenates them into one forest, and `dedup` collapses equal leaves.
//! Every stage returns a new verified [`Forest`](sylva_core::Forest).

mod dedup;
mod flatten;
mod leaf;
mod merge;

#[cfg(test)]
mod flatten_tests;

pub use dedup::{DedupReport, dedup_leaves};
pub use flatten::{FlatTree, flatten_tree};
pub use leaf::{LeafMode, argmax, quantize_probabilities};
pub use merge::merge_trees;

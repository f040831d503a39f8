//! Human-readable forest listing for debugging and snapshot tests.

use std::fmt::Write as _;

use crate::{Forest, NodeRef};

impl Forest {
    /// Render config, roots, decision nodes and leaves as sectioned text.
    ///
    /// Decision nodes print as `N#`, leaves as `L#`, trees as `T#`; indices are
    /// zero-padded to the width of the largest index in their section.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let widths = Widths {
            tree: width_for_count(self.n_trees()),
            node: width_for_count(self.nodes().len()),
            leaf: width_for_count(self.leaves().len()),
        };

        let config = self.config();
        writeln!(out, "[config]").unwrap();
        writeln!(
            out,
            "{:?} features={} classes={} leaf_bits={} numeric={}",
            config.kind, config.feature_count, config.class_count, config.leaf_bits, config.numeric_type
        )
        .unwrap();
        out.push('\n');

        writeln!(out, "[roots]").unwrap();
        for (i, &root) in self.roots().iter().enumerate() {
            writeln!(out, "T{i:0w$} = {}", widths.reference(root), w = widths.tree).unwrap();
        }
        out.push('\n');

        writeln!(out, "[nodes]").unwrap();
        for (i, node) in self.nodes().iter().enumerate() {
            writeln!(
                out,
                "N{i:0w$} = f{} < {:?} ? {} : {}",
                node.feature,
                node.threshold,
                widths.reference(node.left),
                widths.reference(node.right),
                w = widths.node
            )
            .unwrap();
        }
        out.push('\n');

        writeln!(out, "[leaves]").unwrap();
        for (i, leaf) in self.leaves().iter().enumerate() {
            writeln!(out, "L{i:0w$} = {leaf}", w = widths.leaf).unwrap();
        }

        out
    }
}

struct Widths {
    tree: usize,
    node: usize,
    leaf: usize,
}

impl Widths {
    fn reference(&self, target: NodeRef) -> String {
        match target {
            NodeRef::Internal(i) => format!("N{i:0w$}", w = self.node),
            NodeRef::Leaf(i) => format!("L{i:0w$}", w = self.leaf),
        }
    }
}

/// Digits needed to print every index below `count`.
fn width_for_count(count: usize) -> usize {
    count.saturating_sub(1).max(1).ilog10() as usize + 1
}

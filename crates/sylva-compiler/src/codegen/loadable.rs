//! Loadable strategy: the forest as data tables for a generic runtime.
//!
//! Output layout for prefix `P`:
//! - `SylvaTreesNode P_nodes[]` - `{ feature, threshold, left, right }` records
//! - `int32_t P_tree_roots[]` - encoded root of each tree
//! - `static const uint8_t P_leaves[]` - serialized leaf table
//! - `SylvaTrees P` - lengths, pointers, leaf bit width, feature and class counts

use std::fmt::Write as _;

use sylva_core::verify::{check_leaf_capacity, check_leaf_payloads};
use sylva_core::{
    CapacityError, CapacityKind, Forest, MAX_DECISION_NODES, MAX_ENCODED_LEAVES, NodeRef,
};

use crate::serialize::serialize_leaves;

use super::cgen;

const BANNER: &str = "// Generated by sylva. Do not edit.";
const LEAF_BYTES_PER_LINE: usize = 16;

pub struct LoadableEmitter<'a> {
    forest: &'a Forest,
    name: &'a str,
    output: String,
}

impl<'a> LoadableEmitter<'a> {
    pub fn new(forest: &'a Forest, name: &'a str) -> Self {
        Self {
            forest,
            name,
            output: String::new(),
        }
    }

    pub fn emit(mut self) -> crate::Result<String> {
        let forest = self.forest;
        let config = forest.config();
        check_leaf_capacity(forest.leaves().len())?;
        check_leaf_payloads(forest.leaves(), config)?;
        let leaves = serialize_leaves(forest.leaves(), config.leaf_bits)?;

        self.output.push_str(BANNER);
        self.output.push_str("\n\n#include <sylva_trees.h>\n\n");
        let nodes = self.emit_nodes()?;
        self.emit_roots()?;
        self.emit_leaves(&leaves);

        let name = self.name;
        let nodes_length = forest.nodes().len();
        let trees = forest.n_trees();
        let _ = writeln!(self.output, "SylvaTrees {name} = {{");
        let fields = [
            nodes_length.to_string(),
            nodes,
            trees.to_string(),
            format!("{name}_tree_roots"),
            leaves.len().to_string(),
            format!("{name}_leaves"),
            config.leaf_bits.to_string(),
            config.feature_count.to_string(),
            config.class_count.to_string(),
        ];
        for field in fields {
            let _ = writeln!(self.output, "  {field},");
        }
        self.output.push_str("};\n");
        Ok(self.output)
    }

    /// Returns the expression the header uses for the node pointer.
    fn emit_nodes(&mut self) -> crate::Result<String> {
        let nodes = self.forest.nodes();
        // A forest of single-leaf trees has no records; C has no empty arrays.
        if nodes.is_empty() {
            return Ok("NULL".to_string());
        }

        let numeric = self.forest.config().numeric_type;
        let mut records = Vec::with_capacity(nodes.len());
        for node in nodes {
            records.push(format!(
                "  {{ {}, {}, {}, {} }},",
                node.feature,
                cgen::threshold(node.threshold, numeric),
                self.child(node.left)?,
                self.child(node.right)?,
            ));
        }
        let nodes_name = format!("{}_nodes", self.name);
        let _ = writeln!(
            self.output,
            "SylvaTreesNode {nodes_name}[{}] = {{\n{}\n}};\n",
            nodes.len(),
            records.join("\n")
        );
        Ok(nodes_name)
    }

    fn emit_roots(&mut self) -> crate::Result<()> {
        let roots = self
            .forest
            .roots()
            .iter()
            .map(|&root| self.child(root))
            .collect::<crate::Result<Vec<_>>>()?;
        let values: Vec<String> = roots.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            self.output,
            "int32_t {}_tree_roots[{}] = {{ {} }};\n",
            self.name,
            roots.len(),
            values.join(", ")
        );
        Ok(())
    }

    fn emit_leaves(&mut self, bytes: &[u8]) {
        let _ = writeln!(
            self.output,
            "static const uint8_t {}_leaves[{}] = {{\n{}\n}};\n",
            self.name,
            bytes.len(),
            cgen::wrapped_list(bytes, LEAF_BYTES_PER_LINE)
        );
    }

    /// Child and root references are stored as `int16_t`.
    fn child(&self, target: NodeRef) -> crate::Result<i16> {
        let encoded = target.encode_i16().ok_or_else(|| match target {
            NodeRef::Internal(_) => CapacityError {
                kind: CapacityKind::DecisionNodes,
                count: self.forest.nodes().len(),
                limit: MAX_DECISION_NODES,
            },
            NodeRef::Leaf(_) => CapacityError {
                kind: CapacityKind::Leaves,
                count: self.forest.leaves().len(),
                limit: MAX_ENCODED_LEAVES,
            },
        })?;
        Ok(encoded)
    }
}

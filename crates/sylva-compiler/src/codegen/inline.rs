//! Inlined strategy: one C function per tree plus a dispatch function.
//!
//! Trees become nested `if (features[f] < t) { .. } else { .. }` blocks, left
//! branch first. Classifiers dispatch by majority vote (lowest class wins a
//! tie); regressors by mean.

use std::fmt::Write as _;

use sylva_core::verify::check_leaf_payloads;
use sylva_core::{ConfigError, Forest, LeafPayload, ModelKind, NodeRef, Target};

use super::cgen;

const INDENT: &str = "  ";
const MAX_INDENT_DEPTH: usize = 32;

pub struct InlineEmitter<'a> {
    forest: &'a Forest,
    name: &'a str,
    ctype: &'static str,
    output: String,
}

impl<'a> InlineEmitter<'a> {
    pub fn new(forest: &'a Forest, name: &'a str) -> Self {
        Self {
            forest,
            name,
            ctype: forest.config().numeric_type.c_type(),
            output: String::new(),
        }
    }

    pub fn emit(mut self) -> crate::Result<String> {
        self.check_leaves()?;

        let forest = self.forest;
        let return_type = match forest.config().kind {
            ModelKind::Classifier => "int32_t",
            ModelKind::Regressor => "float",
        };
        for (tree, &root) in forest.roots().iter().enumerate() {
            let _ = writeln!(
                self.output,
                "static inline {return_type} {}_tree_{tree}(const {} *features, int32_t features_length) {{",
                self.name, self.ctype
            );
            self.emit_tree(root);
            self.output.push_str("}\n\n");
        }

        match forest.config().kind {
            ModelKind::Classifier => self.emit_vote(),
            ModelKind::Regressor => self.emit_mean(),
        }
        Ok(self.output)
    }

    /// Every leaf must have a literal of the function's return type.
    fn check_leaves(&self) -> Result<(), ConfigError> {
        let config = self.forest.config();
        check_leaf_payloads(self.forest.leaves(), config)?;
        let probabilities = self
            .forest
            .leaves()
            .iter()
            .find(|leaf| matches!(leaf, LeafPayload::QuantizedProbabilities(_)));
        match probabilities {
            Some(leaf) => Err(ConfigError::LeafKindMismatch {
                expected: config.kind.name(),
                found: leaf.kind_name(),
            }),
            None => Ok(()),
        }
    }

    /// Body of one tree function. Nesting is unbounded, so the walk keeps its
    /// own stack; frames pop in source order (if, left, else, right, close).
    fn emit_tree(&mut self, root: NodeRef) {
        let forest = self.forest;
        let numeric = forest.config().numeric_type;
        let mut stack = vec![Frame::Visit(root, 1)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Visit(target, depth) => match forest.resolve(target) {
                    Target::Leaf(leaf) => {
                        let value = match leaf {
                            LeafPayload::RegressionValue(v) => cgen::float(*v),
                            other => other.to_string(),
                        };
                        let _ = writeln!(self.output, "{}return {value};", pad(depth));
                    }
                    Target::Node(node) => {
                        let _ = writeln!(
                            self.output,
                            "{}if (features[{}] < {}) {{",
                            pad(depth),
                            node.feature,
                            cgen::threshold(node.threshold, numeric)
                        );
                        stack.push(Frame::Close(depth));
                        stack.push(Frame::Visit(node.right, depth + 1));
                        stack.push(Frame::Else(depth));
                        stack.push(Frame::Visit(node.left, depth + 1));
                    }
                },
                Frame::Else(depth) => {
                    let _ = writeln!(self.output, "{}}} else {{", pad(depth));
                }
                Frame::Close(depth) => {
                    let _ = writeln!(self.output, "{}}}", pad(depth));
                }
            }
        }
    }

    fn emit_vote(&mut self) {
        let (name, ctype) = (self.name, self.ctype);
        let classes = self.forest.config().class_count;
        let _ = writeln!(
            self.output,
            "int32_t {name}_predict(const {ctype} *features, int32_t features_length) {{"
        );
        let _ = writeln!(self.output, "  int32_t votes[{classes}] = {{ 0 }};");
        for tree in 0..self.forest.n_trees() {
            let _ = writeln!(
                self.output,
                "  votes[{name}_tree_{tree}(features, features_length)] += 1;"
            );
        }
        let _ = write!(
            self.output,
            "
  int32_t most_voted_class = -1;
  int32_t most_voted_votes = 0;
  for (int32_t i = 0; i < {classes}; i++) {{
    if (votes[i] > most_voted_votes) {{
      most_voted_class = i;
      most_voted_votes = votes[i];
    }}
  }}
  return most_voted_class;
}}
"
        );
    }

    fn emit_mean(&mut self) {
        let (name, ctype) = (self.name, self.ctype);
        let _ = writeln!(
            self.output,
            "float {name}_predict(const {ctype} *features, int32_t features_length) {{"
        );
        self.output.push_str("  float sum = 0.0f;\n");
        for tree in 0..self.forest.n_trees() {
            let _ = writeln!(
                self.output,
                "  sum += {name}_tree_{tree}(features, features_length);"
            );
        }
        let _ = writeln!(self.output, "  return sum / {};", self.forest.n_trees());
        self.output.push_str("}\n");
    }
}

enum Frame {
    Visit(NodeRef, usize),
    Else(usize),
    Close(usize),
}

/// Indentation for nesting `depth`. Levels past [`MAX_INDENT_DEPTH`] share one
/// width so output stays linear in the node count.
fn pad(depth: usize) -> String {
    INDENT.repeat(depth.min(MAX_INDENT_DEPTH))
}

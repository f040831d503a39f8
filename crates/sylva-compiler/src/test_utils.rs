//! Source-tree builders and a reference evaluator for tests.

use sylva_core::{DecisionNode, Forest, ForestConfig, LeafPayload, ModelKind, NodeRef, Target};

use crate::source::NO_CHILD;
use crate::{CompiledForest, Compiler, Config, SourceTree};

/// Recursive description of a source tree, laid out in preorder by [`Shape::build`].
#[derive(Clone, Debug)]
pub enum Shape {
    Leaf(Vec<f64>),
    Split(u32, f64, Box<Shape>, Box<Shape>),
}

impl Shape {
    pub fn leaf(values: &[f64]) -> Self {
        Self::Leaf(values.to_vec())
    }

    pub fn split(feature: u32, threshold: f64, left: Shape, right: Shape) -> Self {
        Self::Split(feature, threshold, Box::new(left), Box::new(right))
    }

    /// Number of source nodes.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Split(_, _, l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    pub fn build(&self) -> SourceTree {
        let mut tree = SourceTree {
            children_left: Vec::new(),
            children_right: Vec::new(),
            feature: Vec::new(),
            threshold: Vec::new(),
            value: Vec::new(),
        };
        self.push(&mut tree);
        tree
    }

    fn push(&self, tree: &mut SourceTree) -> i64 {
        let id = tree.children_left.len();
        tree.children_left.push(NO_CHILD);
        tree.children_right.push(NO_CHILD);
        match self {
            Self::Leaf(values) => {
                tree.feature.push(-2);
                tree.threshold.push(-2.0);
                tree.value.push(vec![values.clone()]);
            }
            Self::Split(feature, threshold, left, right) => {
                tree.feature.push(i64::from(*feature));
                tree.threshold.push(*threshold);
                tree.value.push(vec![vec![0.0]]);
                let l = left.push(tree);
                let r = right.push(tree);
                tree.children_left[id] = l;
                tree.children_right[id] = r;
            }
        }
        id as i64
    }
}

impl SourceTree {
    /// One decision node over two leaves.
    pub fn stump(feature: u32, threshold: f64, left: &[f64], right: &[f64]) -> Self {
        Shape::split(feature, threshold, Shape::leaf(left), Shape::leaf(right)).build()
    }

    /// `features[0] < 0.5 ? class 0 : class 1`.
    pub fn two_class_stump() -> Self {
        Self::stump(0, 0.5, &[3.0, 1.0], &[1.0, 4.0])
    }

    /// A tree that is a single leaf.
    pub fn leaf_only(values: &[f64]) -> Self {
        Shape::leaf(values).build()
    }

    /// Right-leaning chain of `depth` decision nodes; node `i` tests feature 0
    /// against `i + 0.5` and its left leaf predicts `values(i)`.
    pub fn chain(depth: u32, values: impl Fn(u32) -> Vec<f64>) -> Self {
        let mut shape = Shape::Leaf(values(depth));
        for i in (0..depth).rev() {
            shape = Shape::split(0, f64::from(i) + 0.5, Shape::Leaf(values(i)), shape);
        }
        shape.build()
    }

    /// Complete tree of the given depth; leaf `k` (left to right) predicts `values(k)`.
    pub fn balanced(depth: u32, values: impl Fn(u32) -> Vec<f64>) -> Self {
        fn grow(depth: u32, level: u32, first: u32, values: &dyn Fn(u32) -> Vec<f64>) -> Shape {
            if depth == 0 {
                return Shape::Leaf(values(first));
            }
            let half = 1 << (depth - 1);
            Shape::split(
                level,
                0.5,
                grow(depth - 1, level + 1, first, values),
                grow(depth - 1, level + 1, first + half, values),
            )
        }
        grow(depth, 0, 0, &values).build()
    }
}

/// Compile `trees`, panicking on error.
pub fn compile(config: Config, trees: &[SourceTree]) -> CompiledForest {
    Compiler::new(config).compile(trees).unwrap()
}

/// Two copies of [`SourceTree::two_class_stump`]: identical stumps sharing two leaves.
pub fn two_stumps() -> CompiledForest {
    let a = SourceTree::two_class_stump();
    compile(Config::classifier(2).feature_count(1), &[a.clone(), a])
}

/// One-hot class statistics, as a classifier leaf would carry.
pub fn one_hot(class: u32, classes: u32) -> Vec<f64> {
    (0..classes).map(|c| if c == class { 1.0 } else { 0.0 }).collect()
}

/// Single tree built without recursion: a right-leaning chain of `depth`
/// decision nodes, node `i` testing feature 0 against `i + 0.5`.
///
/// Leaf `i` predicts class `i % class_count`, or the value `i` for regressors.
pub fn chain_forest(depth: u32, config: ForestConfig) -> Forest {
    let nodes = (0..depth)
        .map(|i| {
            let right = if i + 1 == depth {
                NodeRef::Leaf(depth)
            } else {
                NodeRef::Internal(i + 1)
            };
            DecisionNode::new(0, f64::from(i) + 0.5, NodeRef::Leaf(i), right)
        })
        .collect();
    let leaves = (0..=depth)
        .map(|i| match config.kind {
            ModelKind::Classifier => LeafPayload::MajorityClass(i % config.class_count),
            ModelKind::Regressor => LeafPayload::RegressionValue(f64::from(i)),
        })
        .collect();
    let root = if depth == 0 {
        NodeRef::Leaf(0)
    } else {
        NodeRef::Internal(0)
    };
    Forest::new(vec![root], nodes, leaves, config).unwrap()
}

/// Walk tree `tree` of `forest` for `features`.
pub fn evaluate_tree<'a>(forest: &'a Forest, tree: usize, features: &[f64]) -> &'a LeafPayload {
    let mut at = forest.roots()[tree];
    loop {
        match forest.resolve(at) {
            Target::Leaf(leaf) => return leaf,
            Target::Node(node) => {
                at = if features[node.feature as usize] < node.threshold {
                    node.left
                } else {
                    node.right
                };
            }
        }
    }
}

/// Majority vote as the emitted dispatch computes it: strict `>` scan, so the
/// lowest class index wins ties.
pub fn vote(classes: &[u32], class_count: u32) -> i32 {
    let mut votes = vec![0u32; class_count as usize];
    for &class in classes {
        votes[class as usize] += 1;
    }
    let mut best = 0;
    for (class, &count) in votes.iter().enumerate() {
        if count > votes[best] {
            best = class;
        }
    }
    best as i32
}

/// Reference prediction of a classifier forest.
pub fn predict_class(forest: &Forest, features: &[f64]) -> i32 {
    let classes: Vec<u32> = (0..forest.n_trees())
        .map(|t| match evaluate_tree(forest, t, features) {
            LeafPayload::MajorityClass(c) => *c,
            other => panic!("expected a class leaf, got {}", other.kind_name()),
        })
        .collect();
    vote(&classes, forest.config().class_count)
}

/// Reference prediction of a regressor forest.
pub fn predict_value(forest: &Forest, features: &[f64]) -> f64 {
    let sum: f64 = (0..forest.n_trees())
        .map(|t| match evaluate_tree(forest, t, features) {
            LeafPayload::RegressionValue(v) => *v,
            other => panic!("expected a value leaf, got {}", other.kind_name()),
        })
        .sum();
    sum / forest.n_trees() as f64
}

/// Every reference in `forest`, roots first.
pub fn all_refs(forest: &Forest) -> Vec<NodeRef> {
    let mut refs = forest.roots().to_vec();
    refs.extend(forest.nodes().iter().flat_map(|n| n.children()));
    refs
}

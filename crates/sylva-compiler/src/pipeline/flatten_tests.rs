use sylva_core::{DecisionNode, LeafPayload, NodeRef, ValidationError};

use crate::test_utils::{Shape, one_hot};
use crate::{Error, ShapeError, SourceTree};

use super::{FlatTree, LeafMode, flatten_tree};

use NodeRef::{Internal, Leaf};

fn flatten(tree: &SourceTree) -> crate::Result<FlatTree> {
    flatten_tree(tree, LeafMode::Majority)
}

#[test]
fn stump() {
    let flat = flatten(&SourceTree::two_class_stump()).unwrap();
    assert_eq!(
        flat,
        FlatTree {
            nodes: vec![DecisionNode::new(0, 0.5, Leaf(0), Leaf(1))],
            leaves: vec![LeafPayload::MajorityClass(0), LeafPayload::MajorityClass(1)],
            root: Internal(0),
        }
    );
}

#[test]
fn nested_preorder() {
    // 0: f1 < 2.0 ? 1 : 2
    // 1: leaf
    // 2: f0 < 4.0 ? 3 : 4
    let tree = Shape::split(
        1,
        2.0,
        Shape::leaf(&one_hot(2, 3)),
        Shape::split(0, 4.0, Shape::leaf(&one_hot(0, 3)), Shape::leaf(&one_hot(1, 3))),
    )
    .build();
    let flat = flatten(&tree).unwrap();

    assert_eq!(
        flat.nodes,
        vec![
            DecisionNode::new(1, 2.0, Leaf(0), Internal(1)),
            DecisionNode::new(0, 4.0, Leaf(1), Leaf(2)),
        ]
    );
    assert_eq!(
        flat.leaves,
        vec![
            LeafPayload::MajorityClass(2),
            LeafPayload::MajorityClass(0),
            LeafPayload::MajorityClass(1),
        ]
    );
}

#[test]
fn positions_follow_source_ids_not_visit_order() {
    // The right subtree (id 1) is a leaf listed before the left subtree (id 2).
    let tree = SourceTree {
        children_left: vec![2, -1, 3, -1, -1],
        children_right: vec![1, -1, 4, -1, -1],
        feature: vec![0, -2, 1, -2, -2],
        threshold: vec![1.0, -2.0, 3.0, -2.0, -2.0],
        value: vec![
            vec![vec![0.0, 0.0]],
            vec![vec![0.0, 9.0]],
            vec![vec![0.0, 0.0]],
            vec![vec![5.0, 0.0]],
            vec![vec![0.0, 5.0]],
        ],
    };
    let flat = flatten(&tree).unwrap();

    assert_eq!(
        flat.nodes,
        vec![
            DecisionNode::new(0, 1.0, Internal(1), Leaf(0)),
            DecisionNode::new(1, 3.0, Leaf(1), Leaf(2)),
        ]
    );
    assert_eq!(
        flat.leaves,
        vec![
            LeafPayload::MajorityClass(1),
            LeafPayload::MajorityClass(0),
            LeafPayload::MajorityClass(1),
        ]
    );
}

#[test]
fn leaf_root() {
    let flat = flatten(&SourceTree::leaf_only(&[1.0, 7.0, 2.0])).unwrap();
    assert!(flat.nodes.is_empty());
    assert_eq!(flat.leaves, vec![LeafPayload::MajorityClass(1)]);
    assert_eq!(flat.root, Leaf(0));
}

#[test]
fn regression_values() {
    let tree = SourceTree::stump(3, -1.25, &[0.5], &[2.75]);
    let flat = flatten_tree(&tree, LeafMode::Value).unwrap();
    assert_eq!(
        flat.leaves,
        vec![
            LeafPayload::RegressionValue(0.5),
            LeafPayload::RegressionValue(2.75),
        ]
    );
}

#[test]
fn probabilities() {
    let tree = SourceTree::stump(0, 0.5, &[1.0, 1.0], &[0.0, 4.0]);
    let flat = flatten_tree(&tree, LeafMode::probabilities(8).unwrap()).unwrap();
    assert_eq!(
        flat.leaves,
        vec![
            LeafPayload::QuantizedProbabilities(vec![128, 128]),
            LeafPayload::QuantizedProbabilities(vec![1, 255]),
        ]
    );
}

#[test]
fn conserves_node_count() {
    let tree = SourceTree::balanced(4, |k| one_hot(k % 3, 3));
    let flat = flatten(&tree).unwrap();
    assert_eq!(flat.nodes.len(), 15);
    assert_eq!(flat.leaves.len(), 16);
    assert_eq!(flat.nodes.len() + flat.leaves.len(), tree.node_count());
}

#[test]
fn deterministic() {
    let tree = SourceTree::chain(6, |i| one_hot(i % 2, 2));
    assert_eq!(flatten(&tree).unwrap(), flatten(&tree).unwrap());
}

#[test]
fn rejects_multiple_outputs() {
    let mut tree = SourceTree::two_class_stump();
    tree.value[2].push(vec![0.0, 1.0]);
    let err = flatten(&tree).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedShape {
            tree: None,
            source: ShapeError::MultipleOutputs {
                node: 2,
                outputs: 2
            },
        }
    );
    assert_eq!(
        err.to_string(),
        "unsupported tree shape: node 2 has 2 outputs, only single-output trees are supported"
    );
}

#[test]
fn rejects_malformed_arrays() {
    let mut tree = SourceTree::two_class_stump();
    tree.threshold.pop();
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ShapeError::LengthMismatch {
            field: "threshold",
            expected: 3,
            actual: 2
        })
    );

    let mut tree = SourceTree::two_class_stump();
    tree.children_right[0] = -1;
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ShapeError::HalfLeaf { node: 0 })
    );

    let mut tree = SourceTree::two_class_stump();
    tree.children_left[0] = 3;
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ShapeError::ChildOutOfRange { node: 0, child: 3 })
    );

    let mut tree = SourceTree::two_class_stump();
    tree.feature[0] = -5;
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ShapeError::InvalidFeature {
            node: 0,
            feature: -5
        })
    );

    let empty = SourceTree {
        children_left: vec![],
        children_right: vec![],
        feature: vec![],
        threshold: vec![],
        value: vec![],
    };
    assert_eq!(flatten(&empty).unwrap_err(), Error::from(ShapeError::Empty));
}

#[test]
fn rejects_empty_leaf_statistics() {
    let tree = SourceTree::stump(0, 0.5, &[], &[1.0]);
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ShapeError::EmptyValue { node: 1 })
    );

    let tree = SourceTree::stump(0, 0.5, &[1.0, 2.0], &[1.0]);
    assert_eq!(
        flatten_tree(&tree, LeafMode::Value).unwrap_err(),
        Error::from(ShapeError::NotScalar { node: 1, len: 2 })
    );
}

#[test]
fn rejects_self_reference() {
    let tree = SourceTree {
        children_left: vec![1, -1],
        children_right: vec![0, -1],
        feature: vec![0, -2],
        threshold: vec![0.5, -2.0],
        value: vec![vec![vec![0.0]], vec![vec![1.0]]],
    };
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ValidationError::SharedNode(0))
    );
}

#[test]
fn rejects_leaf_with_two_parents() {
    let tree = SourceTree {
        children_left: vec![1, -1],
        children_right: vec![1, -1],
        feature: vec![0, -2],
        threshold: vec![0.5, -2.0],
        value: vec![vec![vec![0.0]], vec![vec![1.0]]],
    };
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ValidationError::NodeCountMismatch {
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn rejects_unreachable_subtree() {
    // Node 3 is a well-formed split that no node points at.
    let tree = SourceTree {
        children_left: vec![1, -1, -1, 4, -1, -1],
        children_right: vec![2, -1, -1, 5, -1, -1],
        feature: vec![0, -2, -2, 0, -2, -2],
        threshold: vec![0.5, -2.0, -2.0, 0.5, -2.0, -2.0],
        value: vec![vec![vec![1.0]]; 6],
    };
    assert_eq!(
        flatten(&tree).unwrap_err(),
        Error::from(ValidationError::OrphanNode(1))
    );
}

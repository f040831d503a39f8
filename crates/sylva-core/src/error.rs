//! Error types for forest construction and configuration.

use std::fmt;

use crate::NodeRef;

/// A broken reference invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("node {node} references decision node {target}, but only {len} exist")]
    DanglingInternal { node: u32, target: u32, len: usize },

    #[error("node {node} references leaf {target}, but only {len} exist")]
    DanglingLeaf { node: u32, target: u32, len: usize },

    #[error("root {root} of tree {tree} does not resolve")]
    DanglingRoot { tree: usize, root: NodeRef },

    #[error("decision node {0} is not reachable from any root")]
    OrphanNode(u32),

    #[error("decision node {0} is reached more than once")]
    SharedNode(u32),

    #[error("reference {0} leaves the tree it belongs to")]
    Escapes(NodeRef),

    #[error("leaf {0} is not reachable from any root")]
    OrphanLeaf(u32),

    #[error("node {node} tests feature {feature}, but the model has {feature_count} features")]
    FeatureOutOfRange {
        node: u32,
        feature: u32,
        feature_count: u32,
    },

    #[error("flattened {actual} nodes from a source tree with {expected} nodes")]
    NodeCountMismatch { expected: usize, actual: usize },
}

/// Which arena overflowed the signed 16-bit reference range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityKind {
    DecisionNodes,
    Leaves,
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecisionNodes => f.write_str("decision nodes"),
            Self::Leaves => f.write_str("leaves"),
        }
    }
}

/// Arena too large for the `int16_t` reference encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("model has {count} {kind}, max supported is {limit}")]
pub struct CapacityError {
    pub kind: CapacityKind,
    pub count: usize,
    pub limit: usize,
}

/// Invalid configuration for the requested operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("leaf bit width {0} is invalid (expected 0, 1..=8 or 32)")]
    InvalidLeafBits(u8),

    #[error("leaf bit width {0} is reserved for quantized probabilities and cannot be serialized")]
    QuantizedLeafBits(u8),

    #[error("leaf {leaf} ({kind}) has no natural byte representation")]
    NoNaturalEncoding { leaf: u32, kind: &'static str },

    #[error("leaf {leaf} holds class {class}, which does not fit a byte")]
    ClassOutOfByteRange { leaf: u32, class: u32 },

    #[error("probability quantization needs 1..=8 bits, got {0}")]
    InvalidProbabilityBits(u8),

    #[error("a classifier needs at least one class")]
    NoClasses,

    #[error("leaf {leaf} predicts class {class}, but the model has {class_count} classes")]
    ClassOutOfRange {
        leaf: u32,
        class: u32,
        class_count: u32,
    },

    #[error("{found} leaves cannot be emitted for a {expected}")]
    LeafKindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no emission strategy selected")]
    NoStrategy,

    #[error("unknown emission strategy '{0}' (expected 'loadable' or 'inline')")]
    UnknownStrategy(String),

    #[error("unknown numeric type '{0}'")]
    UnknownNumericType(String),

    #[error("'{0}' is not a valid C identifier")]
    InvalidIdentifier(String),
}

/// Failure to construct a [`Forest`](crate::Forest).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ForestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Failure to load a persisted [`Forest`](crate::Forest).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("binary decode error: {0}")]
    Binary(#[from] postcard::Error),

    #[error("decoded forest is invalid: {0}")]
    Invalid(#[from] ForestError),
}

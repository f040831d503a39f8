//! Sylva compiler: decision-tree ensembles to C.
//!
//! This crate drives the flattening pipeline and code generation:
//! - `source` - input contract (parallel node arrays from a tree learner)
//! - `pipeline` - flatten, merge and leaf deduplication stages
//! - `serialize` - leaf table byte encoding
//! - `codegen` - loadable table, inlined functions and CSV renderers
//! - `model` - high-level `Compiler` facade

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codegen;
pub mod model;
pub mod pipeline;
pub mod serialize;
pub mod source;

#[cfg(test)]
pub mod test_utils;

pub use codegen::{EmitOptions, Strategies, Strategy};
pub use model::{CompiledForest, Compiler, Config};
pub use pipeline::{DedupReport, FlatTree, LeafMode};
pub use source::{ShapeError, SourceTree};

use sylva_core::{CapacityError, ConfigError, ForestError, ValidationError};

/// Errors that can occur while compiling or emitting a forest.
///
/// Shape and validation failures carry the index of the offending source tree
/// when a single tree is to blame, and `None` for whole-forest checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{}unsupported tree shape: {source}", tree_prefix(.tree))]
    UnsupportedShape {
        tree: Option<usize>,
        source: ShapeError,
    },

    #[error("{}invalid forest: {source}", tree_prefix(.tree))]
    Validation {
        tree: Option<usize>,
        source: ValidationError,
    },

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Attribute a shape or validation failure to source tree `tree`.
    pub fn at_tree(self, tree: usize) -> Self {
        match self {
            Self::UnsupportedShape { source, .. } => Self::UnsupportedShape {
                tree: Some(tree),
                source,
            },
            Self::Validation { source, .. } => Self::Validation {
                tree: Some(tree),
                source,
            },
            other => other,
        }
    }
}

impl From<ShapeError> for Error {
    fn from(source: ShapeError) -> Self {
        Self::UnsupportedShape { tree: None, source }
    }
}

impl From<ValidationError> for Error {
    fn from(source: ValidationError) -> Self {
        Self::Validation { tree: None, source }
    }
}

impl From<ForestError> for Error {
    fn from(err: ForestError) -> Self {
        match err {
            ForestError::Validation(source) => source.into(),
            ForestError::Capacity(err) => Self::Capacity(err),
        }
    }
}

fn tree_prefix(tree: &Option<usize>) -> String {
    tree.map(|t| format!("tree {t}: ")).unwrap_or_default()
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

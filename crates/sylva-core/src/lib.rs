#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Flattened decision-forest data model.
//!
//! A forest is stored as two arenas shared by every tree:
//! - decision nodes (`feature < threshold ? left : right`)
//! - leaves (class id, regression value or quantized probabilities)
//!
//! Trees are distinguished only by their root [`NodeRef`]. Cross references
//! are indices into the arenas; the signed `-(index + 1)` leaf encoding exists
//! only at the serialization boundary (see [`NodeRef::encode`]).

mod binary;
mod config;
mod dump;
mod error;
mod forest;
mod invariants;
mod node;
mod node_ref;
pub mod verify;

#[cfg(test)]
mod config_tests;

pub use config::{ForestConfig, LeafBits, ModelKind, NumericType};
pub use error::{
    CapacityError, CapacityKind, ConfigError, DecodeError, ForestError, ValidationError,
};
pub use forest::{Forest, Target};
pub use node::{DecisionNode, LeafPayload};
pub use node_ref::NodeRef;

/// Maximum number of decision nodes in one forest.
///
/// Child references are stored as `int16_t` in the loadable table.
pub const MAX_DECISION_NODES: usize = 1 << 15;

/// Maximum number of leaves addressable by an `int16_t` encoded reference.
pub const MAX_ENCODED_LEAVES: usize = 1 << 15;

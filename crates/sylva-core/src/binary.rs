//! Binary persistence for verified forests using postcard.

use crate::forest::RawForest;
use crate::{DecodeError, Forest};

impl Forest {
    /// Decode a forest from binary format, re-running every invariant check.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawForest = postcard::from_bytes(bytes)?;
        Ok(Forest::new(raw.roots, raw.nodes, raw.leaves, raw.config)?)
    }

    /// Encode the forest to binary format.
    pub fn to_binary(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("serialization should not fail")
    }
}

//! Leaf table byte encoding for the loadable strategy.

use sylva_core::{ConfigError, LeafBits, LeafPayload};

/// Serialize `leaves` at width `bits`.
///
/// - `0`: one byte per leaf, the class id (classifiers only)
/// - `32`: one little-endian `f32` per scalar; probability codes are written as floats
/// - `1..=8`: reserved for packed probability tables, always rejected
pub fn serialize_leaves(leaves: &[LeafPayload], bits: LeafBits) -> Result<Vec<u8>, ConfigError> {
    if bits.is_quantized() {
        return Err(ConfigError::QuantizedLeafBits(bits.get()));
    }
    if bits == LeafBits::NATURAL {
        return natural_bytes(leaves);
    }

    let scalars: usize = leaves.iter().map(LeafPayload::scalar_count).sum();
    let mut out = Vec::with_capacity(4 * scalars);
    for leaf in leaves {
        match leaf {
            LeafPayload::MajorityClass(class) => push_f32(&mut out, *class as f32),
            LeafPayload::RegressionValue(value) => push_f32(&mut out, *value as f32),
            LeafPayload::QuantizedProbabilities(codes) => {
                for &code in codes {
                    push_f32(&mut out, f32::from(code));
                }
            }
        }
    }
    debug_assert_eq!(out.len(), 4 * scalars);
    Ok(out)
}

fn natural_bytes(leaves: &[LeafPayload]) -> Result<Vec<u8>, ConfigError> {
    leaves
        .iter()
        .enumerate()
        .map(|(index, leaf)| match leaf {
            LeafPayload::MajorityClass(class) => {
                u8::try_from(*class).map_err(|_| ConfigError::ClassOutOfByteRange {
                    leaf: index as u32,
                    class: *class,
                })
            }
            other => Err(ConfigError::NoNaturalEncoding {
                leaf: index as u32,
                kind: other.kind_name(),
            }),
        })
        .collect()
}

#[inline]
fn push_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

//! Leaf payload construction from per-node statistics.

use sylva_core::{ConfigError, LeafPayload};

use crate::ShapeError;

/// How leaf statistics become a [`LeafPayload`]. Chosen once per compile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeafMode {
    /// Index of the largest statistic; ties go to the lowest class index.
    #[default]
    Majority,
    /// The single statistic as a regression output.
    Value,
    /// Normalized statistics quantized to `bits` (1..=8) per class.
    Probabilities { bits: u8 },
}

impl LeafMode {
    /// Probabilities mode, rejecting bit counts outside 1..=8.
    pub fn probabilities(bits: u8) -> Result<Self, ConfigError> {
        check_probability_bits(bits)?;
        Ok(Self::Probabilities { bits })
    }

    /// Name of the payload kind this mode produces.
    pub fn payload_name(self) -> &'static str {
        match self {
            Self::Majority => "majority class",
            Self::Value => "regression value",
            Self::Probabilities { .. } => "quantized probabilities",
        }
    }

    /// Build the payload for leaf `node` from its output statistics.
    pub fn leaf(self, node: usize, values: &[f64]) -> crate::Result<LeafPayload> {
        match self {
            Self::Majority => {
                let class = argmax(values).ok_or(ShapeError::EmptyValue { node })?;
                Ok(LeafPayload::MajorityClass(class as u32))
            }
            Self::Value => match values {
                [value] => Ok(LeafPayload::RegressionValue(*value)),
                _ => Err(ShapeError::NotScalar {
                    node,
                    len: values.len(),
                }
                .into()),
            },
            Self::Probabilities { bits } => {
                let codes = quantize_probabilities(&normalize(values), bits)?;
                Ok(LeafPayload::QuantizedProbabilities(codes))
            }
        }
    }
}

/// Index of the first maximal entry. `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if v <= values[b] || v.is_nan() => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Scale to unit sum. An all-zero vector stays zero.
fn normalize(values: &[f64]) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / sum).collect()
}

/// Quantize values in `[0, 1]` into `bits`-bit codes.
///
/// Uses `steps = 2^bits - 1` uniform bin edges `k / steps` for `k in 0..steps`.
/// The edges span `[0, 1]`, the range of normalized statistics, not integer
/// counts. A value's code is the number of edges at or below it, so `0.0 -> 1`
/// and `1.0 -> steps`, and codes are non-decreasing in the value.
pub fn quantize_probabilities(p: &[f64], bits: u8) -> Result<Vec<u8>, ConfigError> {
    check_probability_bits(bits)?;
    let steps = (1u32 << bits) - 1;
    let edges: Vec<f64> = (0..steps).map(|k| f64::from(k) / f64::from(steps)).collect();
    let codes = p
        .iter()
        .map(|&v| edges.partition_point(|&edge| edge <= v) as u8)
        .collect();
    Ok(codes)
}

fn check_probability_bits(bits: u8) -> Result<(), ConfigError> {
    if !(1..=8).contains(&bits) {
        return Err(ConfigError::InvalidProbabilityBits(bits));
    }
    Ok(())
}

//! Scalar configuration carried by every forest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// What the forest predicts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Majority vote over per-tree class ids.
    #[default]
    Classifier,
    /// Mean over per-tree scalar outputs.
    Regressor,
}

impl ModelKind {
    pub fn is_classifier(self) -> bool {
        self == Self::Classifier
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Regressor => "regressor",
        }
    }
}

/// Element type for features and thresholds in generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    #[default]
    F32,
    F64,
    I32,
    I16,
    I8,
    U8,
}

impl NumericType {
    /// C spelling of the type.
    pub fn c_type(self) -> &'static str {
        match self {
            Self::F32 => "float",
            Self::F64 => "double",
            Self::I32 => "int32_t",
            Self::I16 => "int16_t",
            Self::I8 => "int8_t",
            Self::U8 => "uint8_t",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }
}

impl FromStr for NumericType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(Self::F32),
            "double" => Ok(Self::F64),
            "int32_t" => Ok(Self::I32),
            "int16_t" => Ok(Self::I16),
            "int8_t" => Ok(Self::I8),
            "uint8_t" => Ok(Self::U8),
            other => Err(ConfigError::UnknownNumericType(other.to_string())),
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_type())
    }
}

/// Bits per leaf scalar in the serialized leaf table.
///
/// - `0`: natural scalar (class id byte, or the literal in inlined code)
/// - `32`: IEEE-754 `float`, little-endian
/// - `1..=8`: quantized probabilities; accepted here, rejected by the serializer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeafBits(u8);

impl LeafBits {
    pub const NATURAL: Self = Self(0);
    pub const FLOAT32: Self = Self(32);

    pub fn new(bits: u8) -> Result<Self, ConfigError> {
        match bits {
            0..=8 | 32 => Ok(Self(bits)),
            _ => Err(ConfigError::InvalidLeafBits(bits)),
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Widths reserved for quantized probability tables.
    pub fn is_quantized(self) -> bool {
        (1..=8).contains(&self.0)
    }
}

impl TryFrom<u8> for LeafBits {
    type Error = ConfigError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<LeafBits> for u8 {
    fn from(bits: LeafBits) -> Self {
        bits.0
    }
}

impl fmt::Display for LeafBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scalar metadata stored alongside the node and leaf arenas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForestConfig {
    pub kind: ModelKind,
    /// Number of input features. `0` means unknown and disables the feature range check.
    pub feature_count: u32,
    /// Number of classes; `0` for regressors.
    pub class_count: u32,
    pub leaf_bits: LeafBits,
    pub numeric_type: NumericType,
}

impl ForestConfig {
    /// Classifier with natural-width (class id) leaves.
    pub fn classifier(feature_count: u32, class_count: u32) -> Self {
        Self {
            kind: ModelKind::Classifier,
            feature_count,
            class_count,
            leaf_bits: LeafBits::NATURAL,
            numeric_type: NumericType::default(),
        }
    }

    /// Regressor with `float` leaves.
    pub fn regressor(feature_count: u32) -> Self {
        Self {
            kind: ModelKind::Regressor,
            feature_count,
            class_count: 0,
            leaf_bits: LeafBits::FLOAT32,
            numeric_type: NumericType::default(),
        }
    }

    pub fn leaf_bits(mut self, value: LeafBits) -> Self {
        self.leaf_bits = value;
        self
    }

    pub fn numeric_type(mut self, value: NumericType) -> Self {
        self.numeric_type = value;
        self
    }
}

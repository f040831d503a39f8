use crate::{ConfigError, ForestConfig, LeafBits, ModelKind, NumericType};

#[test]
fn leaf_bits_accepts_natural_float_and_reserved() {
    assert_eq!(LeafBits::new(0), Ok(LeafBits::NATURAL));
    assert_eq!(LeafBits::new(32), Ok(LeafBits::FLOAT32));
    for bits in 1..=8 {
        let lb = LeafBits::new(bits).unwrap();
        assert!(lb.is_quantized());
    }
    assert!(!LeafBits::FLOAT32.is_quantized());
    assert!(!LeafBits::NATURAL.is_quantized());
}

#[test]
fn leaf_bits_rejects_other_widths() {
    assert_eq!(LeafBits::new(9), Err(ConfigError::InvalidLeafBits(9)));
    assert_eq!(LeafBits::new(16), Err(ConfigError::InvalidLeafBits(16)));
    assert_eq!(LeafBits::new(64), Err(ConfigError::InvalidLeafBits(64)));
}

#[test]
fn numeric_type_parses_c_spelling() {
    for ty in [
        NumericType::F32,
        NumericType::F64,
        NumericType::I32,
        NumericType::I16,
        NumericType::I8,
        NumericType::U8,
    ] {
        assert_eq!(ty.c_type().parse::<NumericType>(), Ok(ty));
    }
    assert_eq!(
        "half".parse::<NumericType>(),
        Err(ConfigError::UnknownNumericType("half".into()))
    );
}

#[test]
fn defaults_per_model_kind() {
    let c = ForestConfig::classifier(4, 3);
    assert_eq!(c.kind, ModelKind::Classifier);
    assert_eq!(c.leaf_bits, LeafBits::NATURAL);
    assert_eq!(c.numeric_type, NumericType::F32);

    let r = ForestConfig::regressor(4);
    assert_eq!(r.kind, ModelKind::Regressor);
    assert_eq!(r.class_count, 0);
    assert_eq!(r.leaf_bits, LeafBits::FLOAT32);
}

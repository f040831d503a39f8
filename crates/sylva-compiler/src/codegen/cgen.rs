//! C literal and identifier helpers shared by the emitters.

use sylva_core::{ConfigError, NumericType};

/// `name` must be usable as a C identifier prefix.
pub fn check_identifier(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(ConfigError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Threshold literal in the comparison type.
///
/// Integer types use `ceil(value)`: for integral `x`, `x < ceil(t)` iff `x < t`.
pub fn threshold(value: f64, ty: NumericType) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    match ty {
        NumericType::F32 => float(value),
        NumericType::F64 => format!("{value:?}"),
        _ => format!("{}", value.ceil() as i64),
    }
}

/// `float` literal, e.g. `0.5f`.
pub fn float(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    format!("{:?}f", value as f32)
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NAN".to_string())
    } else if value == f64::INFINITY {
        Some("INFINITY".to_string())
    } else if value == f64::NEG_INFINITY {
        Some("-INFINITY".to_string())
    } else {
        None
    }
}

/// Comma-separated values, `per_line` to a line, each line indented by two spaces.
pub fn wrapped_list<T: ToString>(values: &[T], per_line: usize) -> String {
    values
        .chunks(per_line)
        .map(|chunk| {
            let items: Vec<String> = chunk.iter().map(ToString::to_string).collect();
            format!("  {},", items.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Explicit conversion between kinds (`convertir`)

use crate::error::{NahualError, NahualResult};
use crate::runtime::value::{format_float, Value};
use super::Kind;

/// Convert `value` to the kind named `target`.
///
/// Converting to the value's own kind returns it unchanged. Floats convert to
/// integers by truncation; strings are parsed and malformed text is a type
/// error.
pub fn convert(value: Value, target: &str) -> NahualResult<Value> {
    let target_kind = Kind::from_type_name(target)
        .ok_or_else(|| NahualError::semantic(format!("unknown type '{}'", target)))?;

    if value.kind() == target_kind {
        return Ok(value);
    }

    let unsupported = |value: &Value| {
        NahualError::type_mismatch(
            format!("cannot convert {} to {}", value.type_name(), target_kind),
            target_kind.name(),
            value.type_name(),
        )
    };

    match (&value, target_kind) {
        (Value::Integer(n), Kind::Float) => Ok(Value::Float(*n as f64)),
        (Value::Float(f), Kind::Integer) => {
            let truncated = f.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Value::Integer(truncated as i64))
            } else {
                Err(unsupported(&value))
            }
        }
        (Value::Integer(n), Kind::String) => Ok(Value::String(n.to_string())),
        (Value::Float(f), Kind::String) => Ok(Value::String(format_float(*f))),
        (Value::String(s), Kind::Integer) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
            NahualError::type_mismatch(
                format!("cannot convert '{}' to {}", s, target_kind),
                target_kind.name(),
                value.type_name(),
            )
        }),
        (Value::String(s), Kind::Float) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            NahualError::type_mismatch(
                format!("cannot convert '{}' to {}", s, target_kind),
                target_kind.name(),
                value.type_name(),
            )
        }),
        _ => Err(unsupported(&value)),
    }
}

//! Type checker implementation
//!
//! NahualScript checks types dynamically, at the point where a value is bound
//! or an operator is applied. This module gathers those checks so every
//! stage reports mismatches the same way.

use crate::error::{NahualError, NahualResult};
use crate::runtime::Value;
use super::Kind;

/// Type checker
pub struct TypeChecker;

impl TypeChecker {
    /// A declared variable must receive a value compatible with its type.
    pub fn check_assignment(name: &str, declared: Kind, value: &Value) -> NahualResult<()> {
        if declared.is_compatible_with(value.kind()) {
            Ok(())
        } else {
            Err(NahualError::type_mismatch(
                format!("incompatible type in assignment to '{}'", name),
                declared.name(),
                value.type_name(),
            ))
        }
    }

    /// An argument must be compatible with its parameter's declared type.
    pub fn check_argument(function: &str, parameter: &str, declared: Kind, value: &Value) -> NahualResult<()> {
        if declared.is_compatible_with(value.kind()) {
            Ok(())
        } else {
            Err(NahualError::type_mismatch(
                format!("invalid argument for parameter '{}' of '{}'", parameter, function),
                declared.name(),
                value.type_name(),
            ))
        }
    }

    /// Conditions of `vision` and `ritual` must be booleans.
    pub fn check_condition(value: &Value) -> NahualResult<bool> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(NahualError::type_mismatch(
                "condition must be a verdad",
                Kind::Boolean.name(),
                other.type_name(),
            )),
        }
    }

    /// Operands of logical operators must be booleans.
    pub fn check_boolean(operator: &str, value: &Value) -> NahualResult<bool> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(NahualError::type_mismatch(
                format!("operator '{}' requires verdad operands", operator),
                Kind::Boolean.name(),
                other.type_name(),
            )),
        }
    }

    /// Arithmetic and relational operands must be numbers.
    pub fn check_numeric(operator: &str, left: &Value, right: &Value) -> NahualResult<()> {
        for operand in [left, right] {
            if !operand.kind().is_numeric() {
                return Err(NahualError::type_mismatch(
                    format!("operator '{}' requires numeric operands", operator),
                    "espiritu/energia",
                    operand.type_name(),
                ));
            }
        }
        Ok(())
    }

    /// Equality needs kind-compatible operands.
    pub fn check_comparable(operator: &str, left: &Value, right: &Value) -> NahualResult<()> {
        if left.kind().is_compatible_with(right.kind()) {
            Ok(())
        } else {
            Err(NahualError::type_mismatch(
                format!(
                    "cannot compare {} and {} with '{}'",
                    left.type_name(),
                    right.type_name(),
                    operator
                ),
                left.type_name(),
                right.type_name(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_assignment_allows_numeric_coercion() {
        assert!(TypeChecker::check_assignment("x", Kind::Float, &Value::Integer(1)).is_ok());
        assert!(TypeChecker::check_assignment("x", Kind::Integer, &Value::Float(1.5)).is_ok());
    }

    #[test]
    fn test_assignment_mismatch_names_types() {
        let err = TypeChecker::check_assignment("x", Kind::Integer, &Value::String("no".into())).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Type {
                expected: "espiritu".to_string(),
                received: "mantra".to_string(),
            }
        );
        assert!(err.message.contains("'x'"));
    }

    #[test]
    fn test_condition_requires_boolean() {
        assert_eq!(TypeChecker::check_condition(&Value::Boolean(true)).unwrap(), true);
        assert!(TypeChecker::check_condition(&Value::Integer(1)).is_err());
    }

    #[test]
    fn test_numeric_operands() {
        assert!(TypeChecker::check_numeric("unir", &Value::Integer(1), &Value::Float(2.0)).is_ok());
        let err = TypeChecker::check_numeric("mayor", &Value::String("a".into()), &Value::Integer(1)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
    }

    #[test]
    fn test_comparable_operands() {
        assert!(TypeChecker::check_comparable("igual", &Value::Integer(1), &Value::Float(1.0)).is_ok());
        assert!(TypeChecker::check_comparable("igual", &Value::Boolean(true), &Value::Integer(1)).is_err());
    }
}

//! Runtime value representation
//!
//! This module defines runtime values for NahualScript. Values are immutable
//! once built; operations produce new values.

use std::fmt;

use crate::error::{NahualError, NahualResult};
use crate::types::Kind;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    List(ListValue),
}

/// Ordered list, optionally restricted to one element kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub elements: Vec<Value>,
    pub element_kind: Option<Kind>,
}

impl ListValue {
    /// Heterogeneous empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from a literal: a non-empty literal whose elements all
    /// share one kind fixes the element kind.
    pub fn from_elements(elements: Vec<Value>) -> Self {
        let element_kind = match elements.first() {
            Some(first) if elements.iter().all(|e| e.kind() == first.kind()) => Some(first.kind()),
            _ => None,
        };
        Self {
            elements,
            element_kind,
        }
    }

    /// Append an element, enforcing the fixed element kind if any
    pub fn push(&mut self, value: Value) -> NahualResult<()> {
        if let Some(kind) = self.element_kind {
            if value.kind() != kind {
                return Err(NahualError::type_mismatch(
                    format!("cannot add {} to a list of {}", value.kind(), kind),
                    kind.name(),
                    value.kind().name(),
                ));
            }
        }
        self.elements.push(value);
        Ok(())
    }

    /// Element at `index`, failing when `index < 0 or index >= len`
    pub fn get(&self, index: i64) -> NahualResult<&Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.elements.get(i))
            .ok_or_else(|| {
                NahualError::execution(format!(
                    "index {} out of range for list of length {}",
                    index,
                    self.elements.len()
                ))
            })
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Boolean(_) => Kind::Boolean,
            Value::List(_) => Kind::List,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Numeric payload widened to a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether this is the zero value of a numeric kind
    pub fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }
}

/// Integral floats keep a trailing `.0` so they read as floats. Magnitudes of
/// `1e16` and above, or below `1e-4`, use exponent form.
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        format!("{}", value)
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format!("{:e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(fl) => write!(f, "{}", format_float(*fl)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(true) => write!(f, "cierto"),
            Value::Boolean(false) => write!(f, "falso"),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(3.14).to_string(), "3.14");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Boolean(true).to_string(), "cierto");
        assert_eq!(Value::Boolean(false).to_string(), "falso");
        let list = ListValue::from_elements(vec![
            Value::Integer(1),
            Value::String("dos".to_string()),
        ]);
        assert_eq!(Value::List(list).to_string(), "[1, dos]");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(format_float(1e16), "1e16");
        assert_eq!(format_float(-2.5e20), "-2.5e20");
        assert_eq!(format_float(1.5e-5), "1.5e-5");
        assert_eq!(format_float(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_literal_infers_element_kind() {
        let list = ListValue::from_elements(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(list.element_kind, Some(Kind::Integer));

        let mixed = ListValue::from_elements(vec![Value::Integer(1), Value::Float(2.0)]);
        assert_eq!(mixed.element_kind, None);

        assert_eq!(ListValue::from_elements(vec![]).element_kind, None);
    }

    #[test]
    fn test_push_respects_element_kind() {
        let mut list = ListValue::from_elements(vec![Value::Integer(1)]);
        let err = list.push(Value::String("x".to_string())).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
        assert_eq!(list.elements.len(), 1);

        list.push(Value::Integer(2)).unwrap();
        assert_eq!(list.elements.len(), 2);

        let mut open = ListValue::new();
        open.push(Value::Boolean(true)).unwrap();
        open.push(Value::Integer(3)).unwrap();
        assert_eq!(open.elements.len(), 2);
    }

    #[test]
    fn test_get_bounds() {
        let list = ListValue::from_elements(vec![Value::Integer(7)]);
        assert_eq!(list.get(0).unwrap(), &Value::Integer(7));
        assert_eq!(list.get(1).unwrap_err().kind, ErrorKind::Execution);
        assert_eq!(list.get(-1).unwrap_err().kind, ErrorKind::Execution);
    }

    #[test]
    fn test_zero_detection() {
        assert!(Value::Integer(0).is_zero());
        assert!(Value::Float(0.0).is_zero());
        assert!(!Value::Integer(3).is_zero());
        assert!(!Value::String("0".to_string()).is_zero());
    }
}

//! Runtime kinds
//!
//! This module defines the kinds a value can have in NahualScript.

use std::fmt;

/// Runtime classification of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Float,
    String,
    Boolean,
    List,
    /// Reserved; no operation produces a map yet
    Map,
}

impl Kind {
    /// Look up a kind by its type name (`"espiritu"`, `"energia"`, ...)
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "espiritu" => Some(Self::Integer),
            "energia" => Some(Self::Float),
            "mantra" => Some(Self::String),
            "verdad" => Some(Self::Boolean),
            "ofrenda" | "lista" => Some(Self::List),
            "mapa" => Some(Self::Map),
            _ => None,
        }
    }

    /// The type name used in source and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "espiritu",
            Self::Float => "energia",
            Self::String => "mantra",
            Self::Boolean => "verdad",
            Self::List => "ofrenda",
            Self::Map => "mapa",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Integer and Float coerce into each other; every other pair must match.
    pub fn is_compatible_with(&self, other: Kind) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for kind in [Kind::Integer, Kind::Float, Kind::String, Kind::Boolean, Kind::List, Kind::Map] {
            assert_eq!(Kind::from_type_name(kind.name()), Some(kind));
        }
        assert_eq!(Kind::from_type_name("lista"), Some(Kind::List));
        assert_eq!(Kind::from_type_name("numero"), None);
    }

    #[test]
    fn test_numeric_kinds_are_compatible() {
        assert!(Kind::Integer.is_compatible_with(Kind::Float));
        assert!(Kind::Float.is_compatible_with(Kind::Integer));
        assert!(Kind::String.is_compatible_with(Kind::String));
        assert!(!Kind::String.is_compatible_with(Kind::Integer));
        assert!(!Kind::Boolean.is_compatible_with(Kind::Integer));
        assert!(!Kind::List.is_compatible_with(Kind::Map));
    }
}

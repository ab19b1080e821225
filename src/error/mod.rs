//! Error handling and diagnostics for NahualScript
//!
//! This module provides the error taxonomy shared by every stage (lexing,
//! parsing and evaluation), the lexical error collector, and diagnostic
//! formatting.

use std::fmt;

use thiserror::Error;

pub mod collector;
pub mod diagnostic;

pub use collector::ErrorCollector;
pub use diagnostic::Diagnostic;

/// Result type alias for NahualScript operations
pub type NahualResult<T> = Result<T, NahualError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// One entry of the call stack captured when an error escapes a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub function_name: String,
    /// Call site of the activation
    pub location: Option<SourceLocation>,
    /// `(name, rendered value)` pairs of the activation's local variables
    pub locals: Vec<(String, String)>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}", self.function_name)?;
        if let Some(ref location) = self.location {
            write!(f, " ({})", location)?;
        }
        if !self.locals.is_empty() {
            let locals: Vec<String> = self
                .locals
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, "\n    locals: {}", locals.join(", "))?;
        }
        Ok(())
    }
}

/// Classification of a language error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Character that matches no token rule, unterminated literal or comment
    Lexical,
    /// Grammar violation at a concrete token
    Syntax { found: String },
    /// Token stream ended in the middle of a construct
    UnexpectedEof,
    /// Valid grammar, invalid meaning
    Semantic,
    /// Variable or function not found in any enclosing environment
    UnresolvedBinding { name: String },
    /// Kind or coercion violation
    Type { expected: String, received: String },
    /// Runtime failure
    Execution,
    /// Broken interpreter invariant; never caused by a user program
    Internal,
}

impl ErrorKind {
    /// Unresolved bindings are a specialization of semantic errors.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic | Self::UnresolvedBinding { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. } | Self::UnexpectedEof)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lexical => "Lexical Error",
            Self::Syntax { .. } | Self::UnexpectedEof => "Syntax Error",
            Self::Semantic => "Semantic Error",
            Self::UnresolvedBinding { .. } => "Unresolved Binding",
            Self::Type { .. } => "Type Error",
            Self::Execution => "Execution Error",
            Self::Internal => "Internal Error",
        };
        f.write_str(name)
    }
}

/// Main error type for NahualScript
#[derive(Debug, Clone, Error)]
#[error("{}: {}{}", .kind, .message, location_suffix(.location))]
pub struct NahualError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<SourceLocation>,
    /// Active calls when the error was raised, innermost last
    pub call_stack: Vec<Frame>,
    pub suggestion: Option<String>,
    /// Further errors reported together with this one
    pub related: Vec<NahualError>,
}

fn location_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => format!(" at {}", location),
        None => String::new(),
    }
}

impl NahualError {
    fn new(kind: ErrorKind, message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
            call_stack: Vec::new(),
            suggestion: None,
            related: Vec::new(),
        }
    }

    /// Create a new lexical error
    pub fn lexical(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Lexical, message, Some(location))
    }

    /// Create a syntax error at an offending token
    pub fn syntax(message: impl Into<String>, found: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::Syntax {
                found: found.into(),
            },
            message,
            Some(location),
        )
        .with_suggestion("check the structure of your ritual")
    }

    /// Create an error for input that ends in the middle of a construct
    pub fn unexpected_eof(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::UnexpectedEof, message, Some(location))
            .with_suggestion("the ritual is incomplete; check for a missing ';', ')' or '}'")
    }

    /// Create a new semantic error
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, message, None)
    }

    /// Create an error for a name that no environment binds
    pub fn unresolved(what: &str, name: &str) -> Self {
        Self::new(
            ErrorKind::UnresolvedBinding {
                name: name.to_string(),
            },
            format!("undefined {} '{}'", what, name),
            None,
        )
    }

    /// Create a type error naming the expected and received types
    pub fn type_mismatch(
        message: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        let suggestion = format!("expected a value of type {}", expected);
        Self::new(
            ErrorKind::Type {
                expected,
                received: received.into(),
            },
            message,
            None,
        )
        .with_suggestion(suggestion)
    }

    /// Create a new execution (runtime) error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, message, None)
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message, None)
    }

    /// Attach a location unless one is already recorded.
    pub fn at(mut self, location: &SourceLocation) -> Self {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the call stack unless an inner call already did.
    pub fn with_call_stack(mut self, frames: Vec<Frame>) -> Self {
        if self.call_stack.is_empty() {
            self.call_stack = frames;
        }
        self
    }

    pub fn with_related(mut self, related: Vec<NahualError>) -> Self {
        self.related = related;
        self
    }
}

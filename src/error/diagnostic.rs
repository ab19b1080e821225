//! Diagnostic formatting for better error messages
//!
//! This module formats errors with source code context, the captured call
//! stack and a suggestion when one is available.

use super::{ErrorKind, NahualError, SourceLocation};
use colored::Colorize;

/// Diagnostic information for displaying errors with context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    error: NahualError,
    source: Option<String>,
    verbose: bool,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: NahualError) -> Self {
        Self {
            error,
            source: None,
            verbose: false,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: NahualError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
            verbose: false,
        }
    }

    /// Also render the full structured error (debug mode).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn error(&self) -> &NahualError {
        &self.error
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error.kind
    }

    pub fn into_error(self) -> NahualError {
        self.error
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = self.format_error(&self.error);

        for related in &self.error.related {
            output.push_str(&self.format_error(related));
        }

        if !self.error.call_stack.is_empty() {
            output.push_str(&format!("{}\n", "call stack (most recent call first):".bold()));
            for frame in self.error.call_stack.iter().rev() {
                output.push_str(&format!("  {}\n", frame));
            }
        }

        if let Some(ref suggestion) = self.error.suggestion {
            output.push_str(&format!("  {} {}\n", "help:".green().bold(), suggestion));
        }

        if self.verbose {
            output.push_str(&format!("{}\n{:#?}\n", "debug detail:".yellow().bold(), self.error));
        }

        output
    }

    fn format_error(&self, error: &NahualError) -> String {
        let mut output = String::new();

        // Error header
        let kind = error.kind.to_string().red().bold();
        output.push_str(&format!("{}: ", kind));
        output.push_str(&error.message);
        output.push('\n');

        // Location and source context
        if let Some(ref location) = error.location {
            output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));

            if let Some(ref source) = self.source {
                output.push_str(&self.format_source_context(source, location));
            }
        }

        if let ErrorKind::Type { expected, received } = &error.kind {
            output.push_str(&format!(
                "  {} expected {}, received {}\n",
                "note:".blue().bold(),
                expected,
                received
            ));
        }

        output
    }

    /// Format source code context around the error location
    fn format_source_context(&self, source: &str, location: &SourceLocation) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = source.lines().collect();

        if location.line == 0 || location.line > lines.len() {
            return output;
        }

        let line_idx = location.line - 1;
        let line_num_width = (location.line + 1).to_string().len();

        // Show previous line if available
        if line_idx > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx, width = line_num_width).blue(),
                lines[line_idx - 1]
            ));
        }

        // Show error line
        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", location.line, width = line_num_width)
                .blue()
                .bold(),
            lines[line_idx]
        ));

        // Show error indicator
        let indicator_padding = " ".repeat(line_num_width + 2 + location.column.saturating_sub(1));
        output.push_str(&format!("{}{}\n", indicator_padding, "^".red().bold()));

        // Show next line if available
        if line_idx + 1 < lines.len() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx + 2, width = line_num_width).blue(),
                lines[line_idx + 1]
            ));
        }

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl From<NahualError> for Diagnostic {
    fn from(error: NahualError) -> Self {
        Self::new(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Frame;

    #[test]
    fn test_diagnostic_without_source() {
        let loc = SourceLocation::at(1, 1);
        let err = NahualError::lexical("unexpected character '@'", loc);
        let diag = Diagnostic::new(err);

        let formatted = diag.format();
        assert!(formatted.contains("Lexical Error"));
        assert!(formatted.contains("unexpected character"));
    }

    #[test]
    fn test_diagnostic_with_source() {
        let source = "espiritu x := 42;\nespiritu y := @;\nespiritu z := 10;";
        let loc = SourceLocation::at(2, 15);
        let err = NahualError::lexical("unexpected character '@'", loc);
        let diag = Diagnostic::with_source(err, source);

        let formatted = diag.format();
        assert!(formatted.contains("Lexical Error"));
        assert!(formatted.contains("espiritu y := @;"));
        assert!(formatted.contains("espiritu z := 10;"));
    }

    #[test]
    fn test_type_error_shows_expected_and_received() {
        let err = NahualError::type_mismatch("incompatible type", "espiritu", "mantra");
        let formatted = Diagnostic::new(err).format();
        assert!(formatted.contains("expected espiritu, received mantra"));
        assert!(formatted.contains("expected a value of type espiritu"));
    }

    #[test]
    fn test_call_stack_most_recent_first() {
        let frames = vec![
            Frame {
                function_name: "exterior".to_string(),
                location: Some(SourceLocation::at(9, 1)),
                locals: vec![],
            },
            Frame {
                function_name: "interior".to_string(),
                location: Some(SourceLocation::at(4, 5)),
                locals: vec![("n".to_string(), "0".to_string())],
            },
        ];
        let err = NahualError::execution("division by zero").with_call_stack(frames);
        let formatted = Diagnostic::new(err).format();

        let inner = formatted.find("at interior").unwrap();
        let outer = formatted.find("at exterior").unwrap();
        assert!(inner < outer);
        assert!(formatted.contains("locals: n=0"));
    }

    #[test]
    fn test_related_errors_are_listed() {
        let err = NahualError::lexical("bad '@'", SourceLocation::at(1, 1))
            .with_related(vec![NahualError::lexical("bad '$'", SourceLocation::at(3, 2))]);
        let formatted = Diagnostic::new(err).format();
        assert!(formatted.contains("bad '@'"));
        assert!(formatted.contains("bad '$'"));
    }

    #[test]
    fn test_verbose_adds_debug_detail() {
        let err = NahualError::execution("boom");
        assert!(!Diagnostic::new(err.clone()).format().contains("debug detail"));
        assert!(Diagnostic::new(err).verbose(true).format().contains("debug detail"));
    }
}

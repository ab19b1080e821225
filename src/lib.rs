//! # NahualScript
//!
//! A small interpreted language with Spanish, Mesoamerican-flavoured keywords:
//! - declared types checked when a value is bound (`espiritu x := 1;`)
//! - functions with lexical closures (`sabiduria`)
//! - lists with a fixed element kind when built from a uniform literal
//!
//! ## Architecture
//!
//! The implementation is organized into several modules:
//! - `lexer`: Tokenization of source code
//! - `parser`: Parsing tokens into an Abstract Syntax Tree (AST)
//! - `types`: Kinds, compatibility checks and explicit conversion
//! - `runtime`: Environment chain, built-ins and the tree-walking interpreter
//! - `error`: Error handling and diagnostics
//! - `stack`: On-demand stack growth for the recursive parser and evaluator

pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod runtime;
mod stack;

// Re-export commonly used types
pub use error::{Diagnostic, ErrorKind, NahualError, NahualResult, SourceLocation};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Parser, Program};
pub use runtime::{Interpreter, InterpreterConfig, Value};

/// Version of the NahualScript interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize `source`, returning every token (ending with `Eof`) together with
/// the lexical errors met along the way.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<NahualError>) {
    let mut lexer = Lexer::new(source, None);
    let tokens = lexer.tokenize();
    (tokens, lexer.into_errors().into_errors())
}

/// Parse `source` into a program.
///
/// Fails with all lexical errors as one batch, or with the first syntax error.
pub fn parse(source: &str) -> NahualResult<Program> {
    Parser::parse_source(source, None)
}

/// Run a program on a fresh interpreter using standard input and output.
pub fn run(source: &str) -> Result<Option<Value>, Diagnostic> {
    Interpreter::new(false).run(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_tokenize_keeps_tokens_after_invalid_character() {
        let (tokens, errors) = tokenize("espiritu x := 1 @ 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Lexical);
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["espiritu", "x", ":=", "1", "2", ";", ""]);
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let err = parse("espiritu x := ;").unwrap_err();
        assert!(err.kind.is_syntax());
    }

    #[test]
    fn test_run_returns_last_value() {
        assert_eq!(run("7 dividir 2;").unwrap(), Some(Value::Float(3.5)));
    }
}

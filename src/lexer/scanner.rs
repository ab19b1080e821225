//! Lexer/Scanner implementation for NahualScript
//!
//! This module implements lexical analysis, converting source code into tokens.
//! Tokens are produced lazily through [`Iterator`]; characters that match no
//! rule are recorded in an [`ErrorCollector`] and skipped, so scanning always
//! reaches the end of the source.

use crate::error::{ErrorCollector, NahualError, SourceLocation};
use super::token::{reserved_word, Literal, Token, TokenType};

/// Accented Latin letters accepted in identifiers besides ASCII letters.
const ACCENTED_LETTERS: &str = "áéíóúñüÁÉÍÓÚÑÜ";

/// Lexer for NahualScript source code
pub struct Lexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    /// Index of the first character of the current line
    line_start: usize,
    start_location: SourceLocation,
    filename: Option<String>,
    errors: ErrorCollector,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        let filename = filename.map(|s| s.to_string());
        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            line_start: 0,
            start_location: SourceLocation::new(1, 1, filename.clone()),
            filename,
            errors: ErrorCollector::new(),
            finished: false,
        }
    }

    /// Tokenize the remaining source code, ending with an EOF token
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    pub fn into_errors(self) -> ErrorCollector {
        self.errors
    }

    /// Scan a single token; `None` when the characters produced no token
    fn scan_token(&mut self) -> Option<Token> {
        let c = self.advance();

        match c {
            // Whitespace (skip)
            ' ' | '\r' | '\t' => None,

            '\n' => {
                self.newline();
                None
            }

            // Single-character tokens
            '(' => self.make_token(TokenType::LeftParen),
            ')' => self.make_token(TokenType::RightParen),
            '{' => self.make_token(TokenType::LeftBrace),
            '}' => self.make_token(TokenType::RightBrace),
            '[' => self.make_token(TokenType::LeftBracket),
            ']' => self.make_token(TokenType::RightBracket),
            ',' => self.make_token(TokenType::Comma),
            '.' => self.make_token(TokenType::Dot),
            ';' => self.make_token(TokenType::Semicolon),

            ':' => {
                if self.match_char('=') {
                    self.make_token(TokenType::Assign)
                } else {
                    self.error("unexpected character ':'; did you mean ':='?");
                    None
                }
            }

            // Comments
            '/' => {
                if self.match_char('/') {
                    // Single-line comment: skip until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_char('*') {
                    self.scan_block_comment();
                } else {
                    self.error("unexpected character '/'; division is written 'dividir'");
                }
                None
            }

            // String literals
            '"' => self.scan_string(),

            // Number literals
            c if c.is_ascii_digit() => self.scan_number(),

            // Identifiers, keywords and operator words
            c if is_identifier_start(c) => self.scan_identifier(),

            // Unexpected character: record it and move on
            _ => {
                self.error(&format!("invalid character '{}'", c));
                None
            }
        }
    }

    /// Scan a string literal; no escape sequences are processed
    fn scan_string(&mut self) -> Option<Token> {
        while self.peek() != '"' && !self.is_at_end() {
            if self.advance() == '\n' {
                self.newline();
            }
        }

        if self.is_at_end() {
            self.error("unterminated string");
            return None;
        }

        // Consume closing quote
        self.advance();

        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.make_token(TokenType::Literal(Literal::String(value)))
    }

    /// Scan a number literal, trying the float form first
    fn scan_number(&mut self) -> Option<Token> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Check for decimal point
        let is_float = if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            true
        } else {
            false
        };

        let lexeme = self.lexeme();

        if is_float {
            match lexeme.parse::<f64>() {
                Ok(value) => self.make_token(TokenType::Literal(Literal::Float(value))),
                Err(_) => {
                    self.error(&format!("invalid float literal '{}'", lexeme));
                    None
                }
            }
        } else {
            match lexeme.parse::<i64>() {
                Ok(value) => self.make_token(TokenType::Literal(Literal::Integer(value))),
                Err(_) => {
                    self.error(&format!("integer literal '{}' is out of range", lexeme));
                    None
                }
            }
        }
    }

    /// Scan an identifier, then reclassify reserved words
    fn scan_identifier(&mut self) -> Option<Token> {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }

        let token_type = reserved_word(&self.lexeme()).unwrap_or(TokenType::Identifier);
        self.make_token(token_type)
    }

    /// Scan a block comment, keeping the line counter in step
    fn scan_block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            if self.advance() == '\n' {
                self.newline();
            }
        }

        self.error("unterminated block comment");
    }

    fn make_token(&self, token_type: TokenType) -> Option<Token> {
        let token = Token::new(token_type, self.lexeme(), self.start_location.clone());
        tracing::trace!(token = %token.token_type, lexeme = %token.lexeme, "scanned token");
        Some(token)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    /// Advance to the next character
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    /// Record a consumed newline
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.current;
    }

    /// Check if the next character matches and consume it if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    /// Peek at the next character without consuming it
    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Get the current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(
            self.line,
            self.current - self.line_start + 1,
            self.filename.clone(),
        )
    }

    /// Record an error at the start of the current token
    fn error(&mut self, message: &str) {
        let error = NahualError::lexical(message, self.start_location.clone());
        self.errors.push(error);
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        loop {
            if self.is_at_end() {
                self.finished = true;
                return Some(Token::new(TokenType::Eof, String::new(), self.current_location()));
            }

            self.start = self.current;
            self.start_location = self.current_location();
            if let Some(token) = self.scan_token() {
                return Some(token);
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || ACCENTED_LETTERS.contains(c)
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

//! Token definitions for NahualScript
//!
//! This module defines all token types used in lexical analysis, and the
//! reserved-word table consulted after an identifier is scanned.

use crate::error::SourceLocation;
use crate::types::Kind;
use std::fmt;

/// A token in NahualScript
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, lexeme: String, location: SourceLocation) -> Self {
        Self {
            token_type,
            lexeme,
            location,
        }
    }
}

/// Token types in NahualScript
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Literal(Literal),

    // Identifiers and keywords
    Identifier,
    Keyword(Keyword),

    // Operators (spelled as words)
    // Arithmetic
    Plus,       // unir
    Minus,      // separar
    Star,       // multiplicar
    Slash,      // dividir
    Percent,    // residuo

    // Comparison
    Equal,          // igual
    Less,           // menor
    LessEqual,      // menor_igual
    Greater,        // mayor
    GreaterEqual,   // mayor_igual

    // Logical
    And,        // y
    Or,         // o
    Not,        // no

    // Assignment
    Assign,         // :=

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    LeftBracket,    // [
    RightBracket,   // ]
    Comma,          // ,
    Dot,            // .
    Semicolon,      // ;

    // Special
    Eof,
}

/// Keywords in NahualScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Functions
    Function,   // sabiduria
    Return,     // retornar

    // Control flow
    If,         // vision
    Else,       // sino
    While,      // ritual

    // Types
    Int,        // espiritu
    Float,      // energia
    String,     // mantra
    Bool,       // verdad
    List,       // ofrenda, lista

    // System calls
    Print,      // invocar
    Read,       // percibir
    Convert,    // convertir
    Length,     // longitud
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sabiduria" => Some(Self::Function),
            "retornar" => Some(Self::Return),
            "vision" => Some(Self::If),
            "sino" => Some(Self::Else),
            "ritual" => Some(Self::While),
            "espiritu" => Some(Self::Int),
            "energia" => Some(Self::Float),
            "mantra" => Some(Self::String),
            "verdad" => Some(Self::Bool),
            "ofrenda" | "lista" => Some(Self::List),
            "invocar" => Some(Self::Print),
            "percibir" => Some(Self::Read),
            "convertir" => Some(Self::Convert),
            "longitud" => Some(Self::Length),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "sabiduria",
            Self::Return => "retornar",
            Self::If => "vision",
            Self::Else => "sino",
            Self::While => "ritual",
            Self::Int => "espiritu",
            Self::Float => "energia",
            Self::String => "mantra",
            Self::Bool => "verdad",
            Self::List => "ofrenda",
            Self::Print => "invocar",
            Self::Read => "percibir",
            Self::Convert => "convertir",
            Self::Length => "longitud",
        }
    }

    /// The kind named by a type-annotation keyword
    pub fn type_kind(&self) -> Option<Kind> {
        match self {
            Self::Int => Some(Kind::Integer),
            Self::Float => Some(Kind::Float),
            Self::String => Some(Kind::String),
            Self::Bool => Some(Kind::Boolean),
            Self::List => Some(Kind::List),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reclassify a scanned identifier: operator words, boolean literals and
/// keywords all live in the identifier space.
pub fn reserved_word(word: &str) -> Option<TokenType> {
    let token_type = match word {
        "unir" => TokenType::Plus,
        "separar" => TokenType::Minus,
        "multiplicar" => TokenType::Star,
        "dividir" => TokenType::Slash,
        "residuo" => TokenType::Percent,
        "igual" => TokenType::Equal,
        "menor" => TokenType::Less,
        "menor_igual" => TokenType::LessEqual,
        "mayor" => TokenType::Greater,
        "mayor_igual" => TokenType::GreaterEqual,
        "y" => TokenType::And,
        "o" => TokenType::Or,
        "no" => TokenType::Not,
        "cierto" => TokenType::Literal(Literal::Boolean(true)),
        "falso" => TokenType::Literal(Literal::Boolean(false)),
        _ => return Keyword::from_str(word).map(TokenType::Keyword),
    };
    Some(token_type)
}

/// Literal token values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{:?}", lit),
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Self::Plus => write!(f, "unir"),
            Self::Minus => write!(f, "separar"),
            Self::Star => write!(f, "multiplicar"),
            Self::Slash => write!(f, "dividir"),
            Self::Percent => write!(f, "residuo"),
            Self::Equal => write!(f, "igual"),
            Self::Less => write!(f, "menor"),
            Self::LessEqual => write!(f, "menor_igual"),
            Self::Greater => write!(f, "mayor"),
            Self::GreaterEqual => write!(f, "mayor_igual"),
            Self::And => write!(f, "y"),
            Self::Or => write!(f, "o"),
            Self::Not => write!(f, "no"),
            Self::Assign => write!(f, ":="),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Semicolon => write!(f, ";"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("sabiduria"), Some(Keyword::Function));
        assert_eq!(Keyword::from_str("ritual"), Some(Keyword::While));
        assert_eq!(Keyword::from_str("ofrenda"), Some(Keyword::List));
        assert_eq!(Keyword::from_str("lista"), Some(Keyword::List));
        assert_eq!(Keyword::from_str("Vision"), None);
        assert_eq!(Keyword::from_str("agregar"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::If.as_str(), "vision");
        assert_eq!(Keyword::List.as_str(), "ofrenda");
        assert_eq!(Keyword::Length.as_str(), "longitud");
    }

    #[test]
    fn test_type_keywords() {
        assert_eq!(Keyword::Int.type_kind(), Some(Kind::Integer));
        assert_eq!(Keyword::List.type_kind(), Some(Kind::List));
        assert_eq!(Keyword::Print.type_kind(), None);
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(reserved_word("unir"), Some(TokenType::Plus));
        assert_eq!(reserved_word("mayor_igual"), Some(TokenType::GreaterEqual));
        assert_eq!(reserved_word("no"), Some(TokenType::Not));
        assert_eq!(
            reserved_word("cierto"),
            Some(TokenType::Literal(Literal::Boolean(true)))
        );
        assert_eq!(reserved_word("invocar"), Some(TokenType::Keyword(Keyword::Print)));
        assert_eq!(reserved_word("numero"), None);
    }
}

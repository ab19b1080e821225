//! Abstract Syntax Tree definitions
//!
//! This module defines the AST node types for NahualScript. Every node
//! carries the location of its first token; locations are used for
//! diagnostics only.

use crate::error::SourceLocation;
use crate::types::Kind;

pub use crate::lexer::Literal;

/// Root AST node representing a complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Brace-delimited statement list
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Typed function parameter: `espiritu n`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: Kind,
    pub name: String,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration: espiritu x := 42;
    VarDecl {
        type_name: Kind,
        name: String,
        initializer: Expr,
        location: SourceLocation,
    },

    /// Re-assignment of an existing binding: x := x unir 1;
    Assign {
        name: String,
        value: Expr,
        location: SourceLocation,
    },

    /// Function declaration
    FunctionDecl {
        name: String,
        params: Vec<Parameter>,
        body: Block,
        location: SourceLocation,
    },

    /// vision / sino
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
        location: SourceLocation,
    },

    /// ritual
    While {
        condition: Expr,
        body: Block,
        location: SourceLocation,
    },

    /// retornar
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },

    /// Bare block
    Block(Block),

    /// Expression statement
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal {
        value: Literal,
        location: SourceLocation,
    },

    /// Variable reference
    Variable {
        name: String,
        location: SourceLocation,
    },

    /// Arithmetic, equality or relational operation
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// Logical operation (y, o)
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// Unary operation
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },

    /// Call of a declared or built-in function by name
    Call {
        name: String,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },

    /// invocar / percibir / convertir
    SystemCall {
        function: SystemFunction,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },

    /// List literal: [1, 2, 3]
    List {
        elements: Vec<Expr>,
        location: SourceLocation,
    },

    /// List index access: xs[i]
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },

    /// Method call: xs.agregar(4)
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },
}

/// Built-ins spelled with reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemFunction {
    Print,
    Read,
    Convert,
}

impl SystemFunction {
    /// Name of the native function implementing the call
    pub fn name(&self) -> &'static str {
        match self {
            Self::Print => "invocar",
            Self::Read => "percibir",
            Self::Convert => "convertir",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "unir",
            Self::Subtract => "separar",
            Self::Multiply => "multiplicar",
            Self::Divide => "dividir",
            Self::Modulo => "residuo",
            Self::Equal => "igual",
            Self::Less => "menor",
            Self::LessEqual => "menor_igual",
            Self::Greater => "mayor",
            Self::GreaterEqual => "mayor_igual",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "y",
            Self::Or => "o",
        }
    }
}

impl Expr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Literal { location, .. }
            | Expr::Variable { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Logical { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Call { location, .. }
            | Expr::SystemCall { location, .. }
            | Expr::List { location, .. }
            | Expr::Index { location, .. }
            | Expr::MethodCall { location, .. } => location,
        }
    }
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::VarDecl { location, .. }
            | Stmt::Assign { location, .. }
            | Stmt::FunctionDecl { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Expression { location, .. } => location,
            Stmt::Block(block) => &block.location,
        }
    }
}

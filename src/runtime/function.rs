//! Function definitions
//!
//! Declared functions and host built-ins share one representation; only the
//! body differs.

use std::fmt;

use crate::error::{NahualError, NahualResult, SourceLocation};
use crate::parser::ast::{Block, Parameter};
use super::builtins::HostIo;
use super::environment::EnvId;
use super::value::Value;

/// Host implementation of a built-in
pub type NativeFn = fn(&mut HostIo, &[Value]) -> NahualResult<Value>;

/// Number of arguments a native function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive bounds
    Range(usize, usize),
    Variadic,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub arity: Arity,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Ast(Block),
    Native(NativeFunction),
}

/// A callable bound in an environment
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: FunctionBody,
    /// Environment the function was declared in; parent of every activation
    pub closure: EnvId,
    pub declared_at: Option<SourceLocation>,
}

impl FunctionDef {
    pub fn native(name: &str, arity: Arity, func: NativeFn, closure: EnvId) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            body: FunctionBody::Native(NativeFunction { arity, func }),
            closure,
            declared_at: None,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self.body, FunctionBody::Native(_))
    }

    /// Fail with a semantic error when `count` arguments do not fit.
    pub fn check_arity(&self, count: usize) -> NahualResult<()> {
        let (accepted, expected) = match &self.body {
            FunctionBody::Ast(_) => (count == self.params.len(), Arity::Exact(self.params.len())),
            FunctionBody::Native(native) => (native.arity.accepts(count), native.arity),
        };

        if accepted {
            Ok(())
        } else {
            Err(NahualError::semantic(format!(
                "function '{}' expects {} argument(s), got {}",
                self.name, expected, count
            )))
        }
    }
}

//! Runtime module
//!
//! This module handles interpretation and execution of NahualScript programs.

pub mod builtins;
pub mod environment;
pub mod function;
pub mod interpreter;
pub mod operators;
pub mod value;

pub use builtins::HostIo;
pub use environment::{EnvId, Environments};
pub use function::{FunctionBody, FunctionDef};
pub use interpreter::{Interpreter, InterpreterConfig};
pub use value::{ListValue, Value};

//! Type system module
//!
//! This module holds the finite set of value kinds, the compatibility rules
//! between them, and explicit conversion.

pub mod kind;
pub mod checker;
pub mod conversion;

pub use kind::Kind;
pub use checker::TypeChecker;
pub use conversion::convert;

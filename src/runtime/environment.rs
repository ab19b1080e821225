//! Environment chain
//!
//! Environments live in an arena and refer to their parent by handle. A
//! function activation pushes a child of the function's closure environment
//! and discards it on return, so the arena behaves like a stack whose entries
//! point at any earlier entry.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{NahualError, NahualResult};
use super::function::FunctionDef;
use super::value::Value;

/// Handle to an environment in [`Environments`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(usize);

/// One lexical scope
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Rc<FunctionDef>>,
    parent: Option<EnvId>,
}

/// Arena of environments; index 0 is the global scope
#[derive(Debug)]
pub struct Environments {
    arena: Vec<Environment>,
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

impl Environments {
    pub fn new() -> Self {
        Self {
            arena: vec![Environment::default()],
        }
    }

    /// The global environment
    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    /// Create a child of `parent`
    pub fn push(&mut self, parent: EnvId) -> EnvId {
        self.arena.push(Environment {
            parent: Some(parent),
            ..Environment::default()
        });
        EnvId(self.arena.len() - 1)
    }

    /// Drop `env` and everything created after it. The root is never dropped.
    pub fn discard(&mut self, env: EnvId) {
        self.arena.truncate(env.0.max(1));
    }

    /// Bind a variable in `env`, shadowing any outer binding
    pub fn define_variable(&mut self, env: EnvId, name: impl Into<String>, value: Value) {
        self.arena[env.0].variables.insert(name.into(), value);
    }

    pub fn define_function(&mut self, env: EnvId, name: impl Into<String>, def: Rc<FunctionDef>) {
        self.arena[env.0].functions.insert(name.into(), def);
    }

    pub fn lookup_variable(&self, env: EnvId, name: &str) -> NahualResult<&Value> {
        self.ancestors(env)
            .find_map(|id| self.arena[id.0].variables.get(name))
            .ok_or_else(|| NahualError::unresolved("variable", name))
    }

    pub fn lookup_function(&self, env: EnvId, name: &str) -> NahualResult<Rc<FunctionDef>> {
        self.ancestors(env)
            .find_map(|id| self.arena[id.0].functions.get(name))
            .cloned()
            .ok_or_else(|| NahualError::unresolved("function", name))
    }

    /// Overwrite the nearest existing binding of `name`
    pub fn assign_variable(&mut self, env: EnvId, name: &str, value: Value) -> NahualResult<()> {
        let owner = self
            .ancestors(env)
            .find(|id| self.arena[id.0].variables.contains_key(name))
            .ok_or_else(|| NahualError::unresolved("variable", name))?;
        self.arena[owner.0].variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Rendered local variables of `env` (not its ancestors), sorted by name
    pub fn snapshot(&self, env: EnvId) -> Vec<(String, String)> {
        let mut locals: Vec<(String, String)> = self.arena[env.0]
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        locals.sort();
        locals
    }

    fn ancestors(&self, env: EnvId) -> impl Iterator<Item = EnvId> + '_ {
        std::iter::successors(Some(env), move |id| self.arena[id.0].parent)
    }
}

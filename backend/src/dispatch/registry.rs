//! Static table of callable analysis functions.
//!
//! The table is built once at startup and only read afterwards; lookups
//! resolve `(module, function)` pairs without any reflection.

use std::collections::BTreeMap;

use super::callable::Callable;
use crate::analysis;

/// Lookup failure for a module or function name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("module '{0}' not found")]
    ModuleNotFound(String),

    #[error("module '{module}' has no function '{name}'")]
    FunctionNotFound { module: String, name: String },
}

/// Registered callables grouped by module.
#[derive(Debug, Clone, Default)]
pub struct CallableRegistry {
    modules: BTreeMap<&'static str, BTreeMap<&'static str, Callable>>,
}

impl CallableRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in analysis functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for callable in analysis::builtins() {
            registry.register(callable);
        }
        registry
    }

    /// Add `callable`, returning any callable it replaced.
    pub fn register(&mut self, callable: Callable) -> Option<Callable> {
        self.modules
            .entry(callable.module())
            .or_default()
            .insert(callable.name(), callable)
    }

    pub fn resolve(&self, module: &str, name: &str) -> Result<&Callable, LookupError> {
        self.modules
            .get(module)
            .ok_or_else(|| LookupError::ModuleNotFound(module.to_string()))?
            .get(name)
            .ok_or_else(|| LookupError::FunctionNotFound {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Module names, sorted.
    pub fn modules(&self) -> Vec<&'static str> {
        self.modules.keys().copied().collect()
    }

    /// Function names of `module`, sorted.
    pub fn functions(&self, module: &str) -> Result<Vec<&'static str>, LookupError> {
        self.modules
            .get(module)
            .map(|functions| functions.keys().copied().collect())
            .ok_or_else(|| LookupError::ModuleNotFound(module.to_string()))
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

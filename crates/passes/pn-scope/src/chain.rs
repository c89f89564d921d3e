//! Stack of lexical levels

use crate::error::ScopeError;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;
use tracing::trace;

/// How a name was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Variable introduced by assignment, parameter or loop
    Mutable,
    /// Function name
    Fixed,
}

/// Declared names per lexical level
///
/// Level 0 is the script's top level and is never removed. Each function
/// being lowered pushes one level on entry and pops it on exit.
#[derive(Debug, Clone)]
pub struct ScopeChain {
    levels: Vec<FxHashMap<String, BindingKind>>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    /// Create a chain holding only the root level
    pub fn new() -> Self {
        Self {
            levels: vec![FxHashMap::default()],
        }
    }

    /// Enter a function body
    pub fn push_level(&mut self) {
        self.levels.push(FxHashMap::default());
        trace!(depth = self.depth(), "push scope level");
    }

    /// Leave a function body
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::PopRootLevel`] when only the root level remains.
    pub fn pop_level(&mut self) -> Result<(), ScopeError> {
        if self.levels.len() <= 1 {
            return Err(ScopeError::PopRootLevel);
        }
        self.levels.pop();
        trace!(depth = self.depth(), "pop scope level");
        Ok(())
    }

    /// Declare `name` in the innermost level
    ///
    /// Declaring an existing name again keeps it and takes the new kind.
    pub fn declare(&mut self, name: impl Into<String>, kind: BindingKind) {
        let name = name.into();
        trace!(%name, ?kind, depth = self.depth(), "declare");
        if let Some(level) = self.levels.last_mut() {
            level.insert(name, kind);
        }
    }

    /// Whether `name` is declared in the innermost level
    pub fn is_declared_in_innermost(&self, name: &str) -> bool {
        self.levels
            .last()
            .is_some_and(|level| level.contains_key(name))
    }

    /// Whether `name` is declared at any level
    pub fn is_declared_in_any(&self, name: &str) -> bool {
        self.levels.iter().any(|level| level.contains_key(name))
    }

    /// Outermost level declaring `name`
    pub fn declaration_level(&self, name: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.contains_key(name))
    }

    /// Whether `name` is a mutable root binding seen from inside a function
    pub fn is_shared_mutable_global(&self, name: &str) -> bool {
        self.depth() > 0
            && self
                .levels
                .first()
                .and_then(|root| root.get(name))
                .is_some_and(|kind| *kind == BindingKind::Mutable)
    }

    /// Kind of the innermost declaration of `name`
    pub fn binding_kind(&self, name: &str) -> Option<BindingKind> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.get(name).copied())
    }

    /// Number of enclosing function levels (0 at top level)
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Number of names declared in the innermost level
    pub fn innermost_len(&self) -> usize {
        self.levels.last().map_or(0, HashMap::len)
    }

    /// Number of distinct names across all levels
    pub fn total_names(&self) -> usize {
        self.levels
            .iter()
            .flat_map(HashMap::keys)
            .collect::<FxHashSet<_>>()
            .len()
    }
}

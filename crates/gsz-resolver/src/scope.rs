//! Lexical variable scopes of one method body.
//!
//! Identifiers that no enclosing frame declares are recorded as dynamic
//! variables in first-use order. The driver takes an identifier back out when
//! it turns out to name a type.

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashSet};

#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<FxHashSet<String>>,
    referenced: IndexSet<String, FxBuildHasher>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashSet::default()],
            referenced: IndexSet::default(),
        }
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashSet::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "popped the outermost scope");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn declare(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string());
        }
    }

    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|frame| frame.contains(name))
    }

    /// Record a read of an undeclared name.
    pub fn note_reference(&mut self, name: &str) {
        if !self.referenced.contains(name) {
            self.referenced.insert(name.to_string());
        }
    }

    pub fn forget_reference(&mut self, name: &str) {
        self.referenced.shift_remove(name);
    }

    #[must_use]
    pub fn into_dynamic_variables(self) -> Vec<String> {
        self.referenced.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod tests;

//! Per-module memo of fully-qualified names proven absent.
//!
//! Only context-independent lookups are recorded: default-import candidates
//! and external-resolver misses. The cache lives as long as one module pass.

use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct FailureCache {
    names: FxHashSet<String>,
}

impl FailureCache {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

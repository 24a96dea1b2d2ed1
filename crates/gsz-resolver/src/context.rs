//! Resolution context threaded through the driver's descent.
//!
//! Contexts are values: entering a type or method clones the parent context
//! and extends the copy, so siblings never observe each other's bindings.

use gsz_ast::{ClassId, ImportId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Type parameter in scope, bound to its first resolved bound (or the root type).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenericBinding {
    pub bound: ClassId,
}

#[derive(Clone, Debug, Default)]
pub struct ResolutionContext {
    pub current_type: Option<ClassId>,
    pub generic_env: FxHashMap<String, GenericBinding>,
    /// Lexically enclosing types of `current_type`, outermost first.
    pub enclosing_chain: SmallVec<[ClassId; 4]>,
    /// Import being resolved; its own alias must not match.
    pub current_import: Option<ImportId>,
}

impl ResolutionContext {
    /// Context for the body of `class`, nested in the current type if any.
    #[must_use]
    pub fn enter_type(&self, class: ClassId) -> Self {
        let mut ctx = self.clone();
        if let Some(outer) = ctx.current_type {
            ctx.enclosing_chain.push(outer);
        }
        ctx.current_type = Some(class);
        ctx
    }

    /// Copy of this context without any generic bindings (static members).
    #[must_use]
    pub fn without_generics(&self) -> Self {
        Self {
            generic_env: FxHashMap::default(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn for_import(import: ImportId) -> Self {
        Self {
            current_import: Some(import),
            ..Self::default()
        }
    }

    pub fn bind_generic(&mut self, name: &str, bound: ClassId) {
        self.generic_env
            .insert(name.to_string(), GenericBinding { bound });
    }

    #[must_use]
    pub fn generic(&self, name: &str) -> Option<GenericBinding> {
        self.generic_env.get(name).copied()
    }
}

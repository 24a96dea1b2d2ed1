//! Collaborators for types outside the compile set.
//!
//! The pass never touches class paths or build state. Everything it cannot
//! find among the compiled modules is asked of an [`ExternalResolver`].

use gsz_ast::{ClassKind, Modifiers, UnitHandle};
use rustc_hash::FxHashMap;

/// Description of an already-compiled type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassStub {
    /// Fully-qualified name, nested types joined with `$`.
    pub name: String,
    pub modifiers: Modifiers,
    pub kind: ClassKind,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassStub {
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: Modifiers::PUBLIC,
            kind: ClassKind::Class,
            super_class: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
        }
    }

    #[must_use]
    pub fn interface(name: &str) -> Self {
        Self {
            kind: ClassKind::Interface,
            super_class: None,
            ..Self::class(name)
        }
    }

    #[must_use]
    pub fn with_super(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, names: &[&str]) -> Self {
        self.interfaces = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Answer of the external resolver for one fully-qualified name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupResult {
    AlreadyCompiled(ClassStub),
    /// The name belongs to a source unit that still has to be compiled.
    PendingUnit(UnitHandle),
}

pub trait ExternalResolver {
    fn resolve_name(&self, name: &str) -> Option<LookupResult>;
}

/// Resolver that knows no external types.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExternalTypes;

impl ExternalResolver for NoExternalTypes {
    fn resolve_name(&self, _name: &str) -> Option<LookupResult> {
        None
    }
}

/// Map-backed resolver for hosts that know their external types up front.
#[derive(Clone, Debug, Default)]
pub struct StaticTypeIndex {
    entries: FxHashMap<String, LookupResult>,
}

impl StaticTypeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, stub: ClassStub) {
        self.entries
            .insert(stub.name.clone(), LookupResult::AlreadyCompiled(stub));
    }

    pub fn add_pending(&mut self, name: &str, unit: UnitHandle) {
        self.entries
            .insert(name.to_string(), LookupResult::PendingUnit(unit));
    }

    #[must_use]
    pub fn with_class(mut self, stub: ClassStub) -> Self {
        self.add_class(stub);
        self
    }

    #[must_use]
    pub fn with_pending(mut self, name: &str, unit: UnitHandle) -> Self {
        self.add_pending(name, unit);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExternalResolver for StaticTypeIndex {
    fn resolve_name(&self, name: &str) -> Option<LookupResult> {
        self.entries.get(name).cloned()
    }
}

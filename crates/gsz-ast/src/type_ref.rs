//! Type reference nodes.
//!
//! A `TypeReference` starts out as the dotted name written in source and is
//! rewritten in place by the resolution pass. Its `kind` steers which lookup
//! strategies apply; its `state` records the outcome.

use crate::class::ClassId;
use gsz_common::Span;
use serde::Serialize;

/// Resolution hint attached to a reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefKind {
    /// Ordinary name as written in source.
    #[default]
    Plain,
    /// "Some type nested inside `outer`": the reference name is appended to
    /// the outer name with `$` separators.
    NestedOf(ClassId),
    /// Name whose package prefix is fixed; only the simple-name part
    /// (`name`) takes part in nested-type mangling.
    PackageQualified { prefix: String },
    /// Bare identifier starting with a lower-case letter. Only explicit
    /// imports and declared types can make it a type.
    LowercaseVanilla,
}

/// Outcome of resolving a reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ResolvedState {
    #[default]
    Unresolved,
    Resolved(ClassId),
    /// Resolution failed and a diagnostic was recorded; the reference is opaque.
    Erroneous,
}

/// One argument of a parameterized reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenericArg {
    Type(TypeReference),
    Wildcard {
        upper: Option<Box<TypeReference>>,
        lower: Option<Box<TypeReference>>,
        span: Span,
    },
}

impl GenericArg {
    /// Every type reference embedded in this argument.
    pub fn references_mut(&mut self) -> impl Iterator<Item = &mut TypeReference> {
        let (first, second) = match self {
            GenericArg::Type(ty) => (Some(ty), None),
            GenericArg::Wildcard { upper, lower, .. } => (upper.as_deref_mut(), lower.as_deref_mut()),
        };
        first.into_iter().chain(second)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeReference {
    /// Dotted name as written (for `PackageQualified`, the part after the prefix).
    pub name: String,
    pub kind: RefKind,
    pub state: ResolvedState,
    pub is_array: bool,
    pub component: Option<Box<TypeReference>>,
    pub generics: Vec<GenericArg>,
    /// Set when the reference was bound to a generic type parameter.
    pub generics_placeholder: bool,
    pub span: Span,
}

impl TypeReference {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            ..Self::default()
        }
    }

    /// Reference already bound to a declaration.
    #[must_use]
    pub fn declared(class: ClassId) -> Self {
        Self {
            state: ResolvedState::Resolved(class),
            ..Self::default()
        }
    }

    /// Fully-qualified name as it appears in compiled metadata.
    #[must_use]
    pub fn fully_qualified(name: &str) -> Self {
        Self::new(name, Span::dummy())
    }

    #[must_use]
    pub fn nested_of(outer: ClassId, name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: RefKind::NestedOf(outer),
            span,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn package_qualified(prefix: impl Into<String>, name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: RefKind::PackageQualified {
                prefix: prefix.into(),
            },
            span,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn array_of(component: TypeReference) -> Self {
        Self {
            name: format!("{}[]", component.name),
            is_array: true,
            span: component.span,
            component: Some(Box::new(component)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: Vec<GenericArg>) -> Self {
        self.generics = generics;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, ResolvedState::Resolved(_))
    }

    #[must_use]
    pub fn is_erroneous(&self) -> bool {
        self.state == ResolvedState::Erroneous
    }

    #[must_use]
    pub fn resolved_class(&self) -> Option<ClassId> {
        match self.state {
            ResolvedState::Resolved(id) => Some(id),
            ResolvedState::Unresolved | ResolvedState::Erroneous => None,
        }
    }

    /// Whether the written name carries a qualifier in front of the simple name.
    #[must_use]
    pub fn has_package_name(&self) -> bool {
        match self.kind {
            RefKind::Plain | RefKind::LowercaseVanilla => self.name.contains('.'),
            RefKind::PackageQualified { .. } => true,
            RefKind::NestedOf(_) => false,
        }
    }

    /// Rename the reference during a trial lookup.
    ///
    /// # Panics
    /// Nested lookups derive their name from the outer type and must never be renamed.
    pub fn set_name(&mut self, name: String) {
        assert!(
            !matches!(self.kind, RefKind::NestedOf(_)),
            "cannot rename nested-type lookup {}",
            self.name
        );
        self.name = name;
    }

    pub fn resolve_to(&mut self, class: ClassId) {
        self.state = ResolvedState::Resolved(class);
    }

    pub fn mark_erroneous(&mut self) {
        self.state = ResolvedState::Erroneous;
    }

    /// Name used in diagnostics: the qualified form as written.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.kind {
            RefKind::PackageQualified { prefix } => format!("{prefix}{}", self.name),
            RefKind::Plain | RefKind::NestedOf(_) | RefKind::LowercaseVanilla => self.name.clone(),
        }
    }
}

//! Import and alias table of one module.
//!
//! Built once per module pass, incrementally while the driver resolves the
//! import declarations (single, star, static single, static star). After
//! that the table is only read.

use gsz_ast::{ClassId, ImportId, ImportKind, Module};
use gsz_common::Span;
use rustc_hash::FxHashMap;

/// `import pkg.*` or `import pkg.Outer.*`.
#[derive(Clone, Debug)]
pub struct StarImport {
    pub import: ImportId,
    /// Package prefix with trailing dot.
    pub prefix: String,
    /// Set when the star prefix itself names a type.
    pub owner: Option<ClassId>,
    pub span: Span,
}

/// `import static pkg.Owner.*`.
#[derive(Clone, Debug)]
pub struct StaticStarImport {
    pub import: ImportId,
    pub owner: ClassId,
    pub span: Span,
}

/// What an alias names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasTarget {
    Type(ClassId),
    StaticMember { owner: ClassId, member: String },
}

/// Result of an alias lookup on a dotted name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasMatch {
    pub import: ImportId,
    pub target: AliasTarget,
    /// Length of the matched prefix of the looked-up name.
    pub consumed: usize,
    /// Dotted rest after the matched prefix, `None` on a full match.
    pub remainder: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportTable {
    singles: FxHashMap<String, (ImportId, ClassId)>,
    statics: FxHashMap<String, (ImportId, ClassId, String)>,
    stars: Vec<StarImport>,
    static_stars: Vec<StaticStarImport>,
    spans: FxHashMap<ImportId, Span>,
}

impl ImportTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table of a module whose imports were already resolved.
    #[must_use]
    pub fn from_module(module: &Module) -> Self {
        let mut table = Self::new();
        for import in &module.imports {
            match &import.kind {
                ImportKind::Single { ty, alias } => {
                    if let Some(class) = ty.resolved_class() {
                        table.add_single(alias, import.id, class, import.span);
                    }
                }
                ImportKind::Star { package, owner } => {
                    let owner = owner.as_ref().and_then(|o| o.resolved_class());
                    table.add_star(import.id, package, owner, import.span);
                }
                ImportKind::StaticSingle {
                    owner,
                    member,
                    alias,
                } => {
                    if let Some(owner) = owner.resolved_class() {
                        table.add_static(alias, import.id, owner, member, import.span);
                    }
                }
                ImportKind::StaticStar { owner } => {
                    if let Some(owner) = owner.resolved_class() {
                        table.add_static_star(import.id, owner, import.span);
                    }
                }
            }
        }
        table
    }

    /// Register a single-type import. The first import of an alias wins.
    pub fn add_single(&mut self, alias: &str, import: ImportId, class: ClassId, span: Span) {
        self.singles
            .entry(alias.to_string())
            .or_insert((import, class));
        self.spans.insert(import, span);
    }

    pub fn add_static(
        &mut self,
        alias: &str,
        import: ImportId,
        owner: ClassId,
        member: &str,
        span: Span,
    ) {
        self.statics
            .entry(alias.to_string())
            .or_insert((import, owner, member.to_string()));
        self.spans.insert(import, span);
    }

    pub fn add_star(&mut self, import: ImportId, package: &str, owner: Option<ClassId>, span: Span) {
        let prefix = if package.ends_with('.') {
            package.to_string()
        } else {
            format!("{package}.")
        };
        self.stars.push(StarImport {
            import,
            prefix,
            owner,
            span,
        });
        self.spans.insert(import, span);
    }

    pub fn add_static_star(&mut self, import: ImportId, owner: ClassId, span: Span) {
        self.static_stars.push(StaticStarImport {
            import,
            owner,
            span,
        });
        self.spans.insert(import, span);
    }

    /// Match the longest dotted prefix of `name` against the single and static
    /// aliases, walking right to left. `exclude` skips the import currently
    /// being resolved.
    #[must_use]
    pub fn lookup_alias(&self, name: &str, exclude: Option<ImportId>) -> Option<AliasMatch> {
        let mut end = name.len();
        loop {
            let prefix = &name[..end];
            let remainder = (end < name.len()).then(|| name[end + 1..].to_string());

            if let Some(&(import, class)) = self.singles.get(prefix)
                && Some(import) != exclude
            {
                return Some(AliasMatch {
                    import,
                    target: AliasTarget::Type(class),
                    consumed: end,
                    remainder,
                });
            }
            if let Some((import, owner, member)) = self.statics.get(prefix)
                && Some(*import) != exclude
            {
                return Some(AliasMatch {
                    import: *import,
                    target: AliasTarget::StaticMember {
                        owner: *owner,
                        member: member.clone(),
                    },
                    consumed: end,
                    remainder,
                });
            }

            end = prefix.rfind('.')?;
        }
    }

    #[must_use]
    pub fn stars(&self) -> &[StarImport] {
        &self.stars
    }

    #[must_use]
    pub fn static_stars(&self) -> &[StaticStarImport] {
        &self.static_stars
    }

    #[must_use]
    pub fn import_span(&self, import: ImportId) -> Option<Span> {
        self.spans.get(&import).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/imports_tests.rs"]
mod tests;

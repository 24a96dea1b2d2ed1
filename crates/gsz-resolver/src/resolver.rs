//! Type resolution cascade.
//!
//! [`TypeResolver::resolve`] rewrites one [`TypeReference`] in place. After the
//! generic-argument pre-step and the early exits, the strategies are tried in
//! a fixed order and the first hit wins:
//!
//! 1. nested type of the current type's hierarchy or its lexical outers
//! 2. module classes and imports
//! 3. compile set
//! 4. default imports
//! 5. static inner class (`a.B.C` as `a.B$C`)
//! 6. nested type of a lexically enclosing type
//! 7. external resolver
//!
//! Strategies that construct candidate references resolve them recursively
//! with a restricted [`LookupFlags`] set. Trial renames are undone before a
//! failed strategy returns.

use crate::cache::FailureCache;
use crate::classifier;
use crate::context::ResolutionContext;
use crate::external::{ExternalResolver, LookupResult};
use crate::imports::{AliasTarget, ImportTable};
use crate::options::ResolverOptions;
use bitflags::bitflags;
use gsz_ast::{ClassArena, ClassId, ImportId, Module, ModuleId, RefKind, ResolvedState};
use gsz_ast::{Modifiers, TypeReference, UnitHandle};
use gsz_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use gsz_common::limits::MAX_TYPE_RESOLUTION_DEPTH;
use gsz_common::Span;
use tracing::{debug, trace};

bitflags! {
    /// Strategies a (possibly recursive) lookup may use.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LookupFlags: u8 {
        /// Import table and same-package candidates.
        const MODULE_IMPORTS = 1 << 0;
        const DEFAULT_IMPORTS = 1 << 1;
        const STATIC_INNER = 1 << 2;
        const ALL = Self::MODULE_IMPORTS.bits() | Self::DEFAULT_IMPORTS.bits() | Self::STATIC_INNER.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(ClassId),
    Failed,
}

impl ResolveOutcome {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, ResolveOutcome::Resolved(_))
    }

    #[must_use]
    pub fn class(self) -> Option<ClassId> {
        match self {
            ResolveOutcome::Resolved(id) => Some(id),
            ResolveOutcome::Failed => None,
        }
    }
}

/// State private to the resolution of one module.
#[derive(Debug)]
pub struct ModulePass {
    pub module: ModuleId,
    pub file_name: String,
    pub package: Option<String>,
    /// Classes declared in the module, nested ones included.
    pub classes: Vec<ClassId>,
    pub imports: ImportTable,
    pub failures: FailureCache,
}

impl ModulePass {
    #[must_use]
    pub fn new(module: &Module) -> Self {
        Self {
            module: module.id,
            file_name: module.file_name.clone(),
            package: module.package.clone(),
            classes: module.classes.clone(),
            imports: ImportTable::new(),
            failures: FailureCache::default(),
        }
    }
}

pub struct TypeResolver<'a> {
    pub(crate) classes: &'a mut ClassArena,
    pending: &'a mut Vec<UnitHandle>,
    pub(crate) pass: &'a mut ModulePass,
    external: &'a dyn ExternalResolver,
    options: &'a ResolverOptions,
    pub(crate) diagnostics: &'a mut Vec<Diagnostic>,
    depth: u32,
    depth_reported: bool,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        classes: &'a mut ClassArena,
        pending: &'a mut Vec<UnitHandle>,
        pass: &'a mut ModulePass,
        external: &'a dyn ExternalResolver,
        options: &'a ResolverOptions,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            classes,
            pending,
            pass,
            external,
            options,
            diagnostics,
            depth: 0,
            depth_reported: false,
        }
    }

    /// Resolve `reference` with every strategy enabled. Never reports the
    /// reference itself as unresolved; see [`Self::resolve_or_report`].
    pub fn resolve(&mut self, reference: &mut TypeReference, ctx: &ResolutionContext) -> ResolveOutcome {
        self.resolve_with(reference, ctx, LookupFlags::ALL)
    }

    /// Resolve `reference`, reporting and marking it erroneous on failure.
    /// Erroneous references stay silent failures.
    pub fn resolve_or_report(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> ResolveOutcome {
        if reference.is_erroneous() {
            return ResolveOutcome::Failed;
        }
        let outcome = self.resolve(reference, ctx);
        if outcome == ResolveOutcome::Failed {
            let name = reference.display_name();
            self.report(
                reference.span,
                &diagnostic_messages::UNABLE_TO_RESOLVE_TYPE,
                &[&name],
            );
            reference.mark_erroneous();
        }
        outcome
    }

    #[tracing::instrument(level = "trace", skip(self, reference, ctx), fields(name = %reference.name, depth = self.depth))]
    pub fn resolve_with(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> ResolveOutcome {
        if self.depth >= MAX_TYPE_RESOLUTION_DEPTH {
            if !self.depth_reported {
                self.depth_reported = true;
                let name = reference.display_name();
                self.report(reference.span, &diagnostic_messages::RESOLUTION_TOO_DEEP, &[&name]);
            }
            return ResolveOutcome::Failed;
        }
        self.depth += 1;
        let outcome = self.resolve_inner(reference, ctx, flags);
        self.depth -= 1;
        outcome
    }

    fn resolve_inner(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> ResolveOutcome {
        self.resolve_generics(reference, ctx);

        match reference.state {
            ResolvedState::Resolved(id) => return ResolveOutcome::Resolved(id),
            ResolvedState::Erroneous => return ResolveOutcome::Failed,
            ResolvedState::Unresolved => {}
        }

        if reference.is_array {
            return self.resolve_array(reference, ctx, flags);
        }

        if reference.kind == RefKind::Plain
            && classifier::is_primitive_type_name(&reference.name)
            && let Some(id) = self.classes.primitive(&reference.name)
        {
            reference.resolve_to(id);
            return ResolveOutcome::Resolved(id);
        }

        reference.kind = classifier::classify(reference, self.options);

        if let Some(id) = self.resolve_generic_placeholder(reference, ctx) {
            return ResolveOutcome::Resolved(id);
        }
        if let Some(id) = self.resolve_self_reference(reference, ctx) {
            return ResolveOutcome::Resolved(id);
        }

        let hit = self.resolve_nested_in_hierarchy(reference, ctx)
            || self.resolve_from_module(reference, ctx, flags)
            || self.resolve_from_compile_set(reference)
            || self.resolve_from_default_imports(reference, ctx, flags)
            || self.resolve_static_inner(reference, ctx, flags)
            || self.resolve_outward_nesting(reference, ctx)
            || self.resolve_external(reference);

        match reference.resolved_class() {
            Some(id) if hit => ResolveOutcome::Resolved(id),
            _ => ResolveOutcome::Failed,
        }
    }

    /// Every argument is resolved on its own; failures are reported one by
    /// one and do not fail the parameterized reference.
    fn resolve_generics(&mut self, reference: &mut TypeReference, ctx: &ResolutionContext) {
        for arg in &mut reference.generics {
            for nested in arg.references_mut() {
                self.resolve_or_report(nested, ctx);
            }
        }
    }

    fn resolve_array(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> ResolveOutcome {
        let Some(component) = reference.component.as_deref_mut() else {
            return ResolveOutcome::Failed;
        };
        match self.resolve_with(component, ctx, flags) {
            ResolveOutcome::Resolved(component) => {
                let id = self.classes.array_of(component);
                reference.resolve_to(id);
                ResolveOutcome::Resolved(id)
            }
            ResolveOutcome::Failed => ResolveOutcome::Failed,
        }
    }

    fn resolve_generic_placeholder(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> Option<ClassId> {
        if !matches!(reference.kind, RefKind::Plain | RefKind::LowercaseVanilla)
            || reference.name.contains('.')
        {
            return None;
        }
        let binding = ctx.generic(&reference.name)?;
        reference.resolve_to(binding.bound);
        reference.generics_placeholder = true;
        Some(binding.bound)
    }

    fn resolve_self_reference(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> Option<ClassId> {
        if !matches!(reference.kind, RefKind::Plain | RefKind::LowercaseVanilla) {
            return None;
        }
        let current = ctx.current_type?;
        let decl = &self.classes[current];
        let matches = reference.name == decl.name
            || (!reference.has_package_name() && reference.name == decl.simple_name());
        if !matches {
            return None;
        }
        reference.resolve_to(current);
        Some(current)
    }

    /// Fully-qualified lookup name of a reference.
    pub(crate) fn lookup_name(&self, reference: &TypeReference) -> String {
        match &reference.kind {
            RefKind::Plain | RefKind::LowercaseVanilla => reference.name.clone(),
            RefKind::PackageQualified { prefix } => format!("{prefix}{}", reference.name),
            RefKind::NestedOf(outer) => {
                format!("{}${}", self.classes[*outer].name, reference.name.replace('.', "$"))
            }
        }
    }

    // =========================================================================
    // 1. Nested types of the current hierarchy
    // =========================================================================

    fn resolve_nested_in_hierarchy(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> bool {
        if reference.kind != RefKind::Plain || reference.has_package_name() {
            return false;
        }
        let Some(current) = ctx.current_type else {
            return false;
        };

        let chain = self.superclass_chain(current);
        let interfaces = self.all_interfaces(&chain);
        let lexical_outers = self.classes.outer_classes(current);
        // lexical outers come last so inherited members shadow them
        let outers: Vec<ClassId> = lexical_outers
            .iter()
            .copied()
            .filter(|outer| !chain.contains(outer) && !interfaces.contains(outer))
            .collect();

        for ancestor in chain.into_iter().chain(interfaces).chain(outers) {
            if self.classes[ancestor].name == reference.name {
                continue;
            }
            let mut nested = TypeReference::nested_of(ancestor, reference.name.clone(), reference.span);
            let ResolveOutcome::Resolved(found) =
                self.resolve_with(&mut nested, ctx, LookupFlags::empty())
            else {
                continue;
            };
            let trusted = ancestor == current || lexical_outers.contains(&ancestor);
            if trusted || self.is_visible(found, current) {
                trace!(name = %reference.name, ancestor = %self.classes[ancestor].name, "nested type in hierarchy");
                reference.resolve_to(found);
                return true;
            }
        }
        false
    }

    /// Whether nested type `nested` may be named from inside `from`.
    ///
    /// Package-private members are compared against the package of the type
    /// doing the search, not the type that declares the member.
    pub(crate) fn is_visible(&self, nested: ClassId, from: ClassId) -> bool {
        let modifiers = self.classes[nested].modifiers;
        if modifiers.intersects(Modifiers::PUBLIC | Modifiers::PROTECTED) {
            return true;
        }
        if modifiers.contains(Modifiers::PRIVATE) {
            return self.classes.top_level(nested) == self.classes.top_level(from);
        }
        self.classes[nested].package_name() == self.classes[from].package_name()
    }

    // =========================================================================
    // 2. Module classes and imports
    // =========================================================================

    fn resolve_from_module(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> bool {
        if matches!(reference.kind, RefKind::NestedOf(_)) {
            return false;
        }
        let bare = !reference.has_package_name();
        let local_name = match &self.pass.package {
            Some(package)
                if bare && matches!(reference.kind, RefKind::Plain | RefKind::LowercaseVanilla) =>
            {
                format!("{package}.{}", reference.name)
            }
            _ => self.lookup_name(reference),
        };
        if let Some(&id) = self
            .pass
            .classes
            .iter()
            .find(|&&id| self.classes[id].name == local_name)
        {
            reference.resolve_to(id);
            return true;
        }

        if !flags.contains(LookupFlags::MODULE_IMPORTS) {
            return false;
        }
        match reference.kind {
            RefKind::Plain => {}
            RefKind::LowercaseVanilla => return self.resolve_alias(reference, ctx),
            RefKind::NestedOf(_) | RefKind::PackageQualified { .. } => return false,
        }
        if self.resolve_alias(reference, ctx) {
            return true;
        }
        if !bare {
            return false;
        }
        if let Some(package) = self.pass.package.clone() {
            let mut candidate =
                TypeReference::package_qualified(format!("{package}."), reference.name.clone(), reference.span);
            if let ResolveOutcome::Resolved(id) =
                self.resolve_with(&mut candidate, ctx, LookupFlags::empty())
            {
                reference.resolve_to(id);
                return true;
            }
        }
        self.resolve_from_star_imports(reference, ctx)
    }

    fn resolve_alias(&mut self, reference: &mut TypeReference, ctx: &ResolutionContext) -> bool {
        let Some(hit) = self
            .pass
            .imports
            .lookup_alias(&reference.name, ctx.current_import)
        else {
            return false;
        };

        let found = match (hit.target, hit.remainder) {
            (AliasTarget::Type(id), None) => Some(id),
            (AliasTarget::Type(id), Some(rest)) => {
                let outer = &self.classes[id];
                let mut candidate = TypeReference::package_qualified(
                    outer.package_prefix().to_string(),
                    format!("{}${}", outer.name_without_package(), rest.replace('.', "$")),
                    reference.span,
                );
                let flags = LookupFlags::ALL.difference(LookupFlags::MODULE_IMPORTS);
                self.resolve_with(&mut candidate, ctx, flags).class()
            }
            (AliasTarget::StaticMember { owner, member }, rest) => {
                let name = match rest {
                    Some(rest) => format!("{member}.{rest}"),
                    None => member,
                };
                let mut nested = TypeReference::nested_of(owner, name, reference.span);
                self.resolve_with(&mut nested, ctx, LookupFlags::empty())
                    .class()
                    .filter(|&id| self.classes.is_static_member(id))
            }
        };

        match found {
            Some(id) => {
                trace!(name = %reference.name, import = hit.import.0, "alias import");
                reference.resolve_to(id);
                true
            }
            None => false,
        }
    }

    /// Star and static-star imports. All of them are tried so that two
    /// different matches can be reported; the first match is kept.
    fn resolve_from_star_imports(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> bool {
        let mut first: Option<(ClassId, ImportId)> = None;
        let stars = self.pass.imports.stars().to_vec();
        let static_stars = self.pass.imports.static_stars().to_vec();

        let star_candidates = stars.iter().map(|star| (star.import, StarSource::Package(star.owner, star.prefix.clone())));
        let static_candidates = static_stars.iter().map(|star| (star.import, StarSource::StaticOwner(star.owner)));

        for (import, source) in star_candidates.chain(static_candidates) {
            let Some(found) = self.lookup_in_star(reference, ctx, source) else {
                continue;
            };
            match first {
                None => first = Some((found, import)),
                Some((kept, _)) if kept == found => {}
                Some((kept, _)) => {
                    if self.options.report_ambiguity {
                        self.report_ambiguity(reference, kept, found, import);
                    }
                    break;
                }
            }
        }

        match first {
            Some((id, _)) => {
                reference.resolve_to(id);
                true
            }
            None => false,
        }
    }

    fn lookup_in_star(
        &mut self,
        reference: &TypeReference,
        ctx: &ResolutionContext,
        source: StarSource,
    ) -> Option<ClassId> {
        match source {
            StarSource::Package(owner, prefix) => {
                if let Some(owner) = owner {
                    let mut nested = TypeReference::nested_of(owner, reference.name.clone(), reference.span);
                    if let Some(id) = self.resolve_with(&mut nested, ctx, LookupFlags::empty()).class() {
                        return Some(id);
                    }
                }
                let mut candidate =
                    TypeReference::package_qualified(prefix, reference.name.clone(), reference.span);
                self.resolve_with(&mut candidate, ctx, LookupFlags::empty()).class()
            }
            StarSource::StaticOwner(owner) => {
                let mut nested = TypeReference::nested_of(owner, reference.name.clone(), reference.span);
                self.resolve_with(&mut nested, ctx, LookupFlags::empty())
                    .class()
                    .filter(|&id| self.classes.is_static_member(id))
            }
        }
    }

    fn report_ambiguity(&mut self, reference: &TypeReference, kept: ClassId, other: ClassId, import: ImportId) {
        let name = reference.display_name();
        let kept_name = self.classes[kept].name.clone();
        let other_name = self.classes[other].name.clone();
        debug!(name = %name, kept = %kept_name, other = %other_name, "ambiguous star import");
        let mut diagnostic = Diagnostic::from_message(
            &self.pass.file_name,
            reference.span,
            &diagnostic_messages::AMBIGUOUS_REFERENCE,
            &[&name, &kept_name, &other_name],
        );
        if let Some(span) = self.pass.imports.import_span(import) {
            diagnostic = diagnostic.with_related(
                self.pass.file_name.clone(),
                span.start,
                span.len(),
                format!("{other_name} is imported here"),
            );
        }
        self.diagnostics.push(diagnostic);
    }

    // =========================================================================
    // 3. Compile set
    // =========================================================================

    fn resolve_from_compile_set(&mut self, reference: &mut TypeReference) -> bool {
        let name = self.lookup_name(reference);
        match self.classes.find_local(&name) {
            Some(id) => {
                reference.resolve_to(id);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // 4. Default imports
    // =========================================================================

    fn resolve_from_default_imports(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> bool {
        if reference.kind != RefKind::Plain
            || reference.has_package_name()
            || !flags.contains(LookupFlags::DEFAULT_IMPORTS)
        {
            return false;
        }
        // candidates would be cut off by the depth guard; such misses must not be cached
        if self.depth >= MAX_TYPE_RESOLUTION_DEPTH {
            return false;
        }
        let options = self.options;

        for prefix in &options.default_imports {
            let key = format!("{prefix}{}", reference.name);
            if self.pass.failures.contains(&key) {
                continue;
            }
            let mut candidate =
                TypeReference::package_qualified(prefix.clone(), reference.name.clone(), reference.span);
            if let ResolveOutcome::Resolved(id) =
                self.resolve_with(&mut candidate, ctx, LookupFlags::empty())
            {
                trace!(name = %reference.name, prefix = %prefix, "default import");
                reference.resolve_to(id);
                return true;
            }
            self.pass.failures.insert(key);
        }

        for (simple, full) in &options.implicit_types {
            if *simple == reference.name
                && let Some(id) = self.classes.lookup_known(full)
            {
                reference.resolve_to(id);
                return true;
            }
        }
        false
    }

    // =========================================================================
    // 5. Static inner classes
    // =========================================================================

    /// `a.B.C` is retried as `a.B$C`; recursion keeps shifting the separator
    /// left. The name and kind are restored when nothing matches.
    fn resolve_static_inner(
        &mut self,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        flags: LookupFlags,
    ) -> bool {
        if !matches!(reference.kind, RefKind::Plain | RefKind::PackageQualified { .. })
            || !flags.contains(LookupFlags::STATIC_INNER)
            || !reference.has_package_name()
        {
            return false;
        }
        let Some(dot) = reference.name.rfind('.') else {
            return false;
        };

        let saved_name = reference.name.clone();
        let saved_kind = reference.kind.clone();
        reference.set_name(format!("{}${}", &saved_name[..dot], &saved_name[dot + 1..]));

        if self.resolve_with(reference, ctx, flags).is_resolved() {
            return true;
        }
        reference.kind = saved_kind;
        reference.set_name(saved_name);
        false
    }

    // =========================================================================
    // 6. Lexically enclosing types
    // =========================================================================

    fn resolve_outward_nesting(&mut self, reference: &mut TypeReference, ctx: &ResolutionContext) -> bool {
        if reference.kind != RefKind::Plain || reference.has_package_name() {
            return false;
        }
        for &outer in &ctx.enclosing_chain {
            let mut nested = TypeReference::nested_of(outer, reference.name.clone(), reference.span);
            if let ResolveOutcome::Resolved(id) =
                self.resolve_with(&mut nested, ctx, LookupFlags::empty())
            {
                reference.resolve_to(id);
                return true;
            }
            for iface in self.interfaces_of(outer) {
                let mut nested = TypeReference::nested_of(iface, reference.name.clone(), reference.span);
                if let ResolveOutcome::Resolved(id) =
                    self.resolve_with(&mut nested, ctx, LookupFlags::empty())
                {
                    reference.resolve_to(id);
                    return true;
                }
            }
        }
        false
    }

    // =========================================================================
    // 7. External resolver
    // =========================================================================

    fn resolve_external(&mut self, reference: &mut TypeReference) -> bool {
        match reference.kind {
            RefKind::LowercaseVanilla => return false,
            // the package-completed form was already tried by the module lookup
            RefKind::Plain if !reference.has_package_name() && self.pass.package.is_some() => {
                return false;
            }
            _ => {}
        }
        let name = self.lookup_name(reference);
        match self.fetch_external(&name) {
            Some(id) => {
                reference.resolve_to(id);
                true
            }
            None => false,
        }
    }

    /// Class known under the fully-qualified `name`, asking the external
    /// resolver at most once per name and module pass.
    pub(crate) fn fetch_external(&mut self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.classes.lookup_known(name) {
            return Some(id);
        }
        if self.pass.failures.contains(name) {
            return None;
        }
        match self.external.resolve_name(name) {
            Some(LookupResult::AlreadyCompiled(stub)) if stub.name != name => {
                debug!(name, answered = %stub.name, "external resolver answered for another name");
                self.pass.failures.insert(name);
                None
            }
            Some(LookupResult::AlreadyCompiled(stub)) => {
                Some(self.classes.intern_external(
                    name,
                    stub.modifiers,
                    stub.kind,
                    stub.super_class.as_deref(),
                    &stub.interfaces,
                ))
            }
            Some(LookupResult::PendingUnit(unit)) => {
                let id = self.classes.declare_pending(name, unit);
                if !self.pending.contains(&unit) {
                    debug!(name, unit = unit.0, "scheduling source unit");
                    self.pending.push(unit);
                }
                Some(id)
            }
            None => {
                self.pass.failures.insert(name);
                None
            }
        }
    }

    pub(crate) fn report(
        &mut self,
        span: Span,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        self.diagnostics.push(Diagnostic::from_message(
            &self.pass.file_name,
            span,
            message,
            args,
        ));
    }
}

/// One star-import entry to search.
enum StarSource {
    /// `import pkg.*`; the owner is set when the prefix names a type.
    Package(Option<ClassId>, String),
    /// `import static pkg.Owner.*`
    StaticOwner(ClassId),
}

//! Resolution driver.
//!
//! Walks every module of a compile unit and resolves each embedded type
//! reference:
//!
//! 1. imports, once per module: single, star, static single, static star
//! 2. class headers: type parameters, superclass, interfaces
//! 3. inheritance cycle check for every class of the module
//! 4. class members: annotations, fields, method signatures and bodies
//!
//! [`ResolutionDriver::resolve_all`] finishes steps 1 to 3 for every module
//! before it starts step 4 anywhere, so results do not depend on module order.
//!
//! Parts of a class are taken out of the arena while they are resolved and
//! put back afterwards, so the resolver can walk the hierarchy freely.
//! Expression and statement handling lives in `driver_expressions`.

use crate::context::ResolutionContext;
use crate::external::ExternalResolver;
use crate::hierarchy::InheritanceChecker;
use crate::imports::ImportTable;
use crate::options::ResolverOptions;
use crate::resolver::{ModulePass, TypeResolver};
use crate::scope::ScopeStack;
use gsz_ast::{
    ClassFlags, ClassId, CompileUnit, ImportDecl, ImportKind, MethodDecl, ModuleId, TypeParam,
    TypeReference, UnitHandle,
};
use gsz_common::diagnostics::{
    Diagnostic, DiagnosticCategory, diagnostic_codes, diagnostic_messages,
};
use gsz_common::limits::MAX_TYPE_DECLARATION_DEPTH;
use tracing::debug;

/// Everything a resolution run produced besides the rewritten tree.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Source units referenced by the compile unit that must be compiled too.
    pub pending_units: Vec<UnitHandle>,
}

impl ResolutionReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }
}

pub struct ResolutionDriver<'a> {
    pub(crate) unit: &'a mut CompileUnit,
    external: &'a dyn ExternalResolver,
    pub(crate) options: ResolverOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ResolutionDriver<'a> {
    pub fn new(unit: &'a mut CompileUnit, external: &'a dyn ExternalResolver) -> Self {
        Self {
            unit,
            external,
            options: ResolverOptions::default(),
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve every module. Imports and class headers of all modules are
    /// resolved before any member, so hierarchy walks from a member see the
    /// supertypes of every module whatever the module order.
    pub fn resolve_all(mut self) -> ResolutionReport {
        let modules: Vec<ModuleId> = (0..self.unit.modules.len())
            .map(|index| ModuleId(index as u32))
            .collect();
        let mut passes: Vec<ModulePass> = modules
            .into_iter()
            .map(|module| self.resolve_headers(module))
            .collect();
        for pass in &mut passes {
            self.sweep_headers(pass, HeaderSweep::Final);
        }
        for pass in &passes {
            self.check_inheritance(pass);
        }
        for pass in &mut passes {
            self.resolve_members(pass);
        }
        self.finish()
    }

    #[must_use]
    pub fn finish(self) -> ResolutionReport {
        ResolutionReport {
            diagnostics: self.diagnostics,
            pending_units: self.unit.pending_units.clone(),
        }
    }

    /// Resolve one module on its own. Running it again on a resolved module
    /// is a no-op.
    pub fn resolve_module(&mut self, module: ModuleId) {
        let mut pass = self.resolve_headers(module);
        self.sweep_headers(&mut pass, HeaderSweep::Final);
        self.check_inheritance(&pass);
        self.resolve_members(&mut pass);
    }

    /// Imports of `module` and a trial sweep over its class headers.
    #[tracing::instrument(level = "debug", skip(self), fields(file = %self.unit.module(module).file_name))]
    fn resolve_headers(&mut self, module: ModuleId) -> ModulePass {
        let mut pass = ModulePass::new(self.unit.module(module));
        self.resolve_imports(&mut pass);
        self.sweep_headers(&mut pass, HeaderSweep::Trial);
        pass
    }

    fn sweep_headers(&mut self, pass: &mut ModulePass, sweep: HeaderSweep) {
        let root = ResolutionContext::default();
        for class in self.top_level_classes(pass) {
            self.resolve_class_header(pass, class, &root, 0, sweep);
        }
    }

    fn check_inheritance(&mut self, pass: &ModulePass) {
        for &class in &pass.classes {
            InheritanceChecker::new(&mut self.unit.classes, &pass.file_name, &mut self.diagnostics)
                .check(class);
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = %pass.file_name))]
    fn resolve_members(&mut self, pass: &mut ModulePass) {
        let reported_before = self.diagnostics.len();
        let root = ResolutionContext::default();
        for class in self.top_level_classes(pass) {
            self.resolve_class_members(pass, class, &root, 0);
        }

        debug!(
            classes = pass.classes.len(),
            diagnostics = self.diagnostics.len() - reported_before,
            cached_failures = pass.failures.len(),
            "module resolved"
        );
    }

    fn top_level_classes(&self, pass: &ModulePass) -> Vec<ClassId> {
        pass.classes
            .iter()
            .copied()
            .filter(|&id| self.unit.classes[id].outer.is_none())
            .collect()
    }

    pub(crate) fn resolver<'s>(&'s mut self, pass: &'s mut ModulePass) -> TypeResolver<'s> {
        TypeResolver::new(
            &mut self.unit.classes,
            &mut self.unit.pending_units,
            pass,
            self.external,
            &self.options,
            &mut self.diagnostics,
        )
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn resolve_imports(&mut self, pass: &mut ModulePass) {
        let module = pass.module;
        if self.unit.module(module).imports_resolved {
            pass.imports = ImportTable::from_module(self.unit.module(module));
            return;
        }

        let mut imports = std::mem::take(&mut self.unit.module_mut(module).imports);
        for phase in 0..4 {
            for import in imports.iter_mut().filter(|i| import_phase(&i.kind) == phase) {
                self.resolve_import(pass, import);
            }
        }

        let module = self.unit.module_mut(module);
        module.imports = imports;
        module.imports_resolved = true;
    }

    fn resolve_import(&mut self, pass: &mut ModulePass, import: &mut ImportDecl) {
        let id = import.id;
        let span = import.span;
        let ctx = ResolutionContext::for_import(id);

        match &mut import.kind {
            ImportKind::Single { ty, alias } => {
                if let Some(class) = self.resolve_import_target(pass, ty, &ctx) {
                    pass.imports.add_single(alias, id, class, span);
                }
            }
            ImportKind::Star { package, owner } => {
                // the prefix may name a type; that is not an error when it does not
                let owner_id = match owner {
                    Some(reference) => reference.resolved_class(),
                    None => {
                        let mut candidate = TypeReference::new(package.clone(), span);
                        let found = self.resolver(pass).resolve(&mut candidate, &ctx).class();
                        if found.is_some() {
                            *owner = Some(candidate);
                        }
                        found
                    }
                };
                pass.imports.add_star(id, package, owner_id, span);
            }
            ImportKind::StaticSingle {
                owner,
                member,
                alias,
            } => {
                if let Some(owner) = self.resolve_import_target(pass, owner, &ctx) {
                    pass.imports.add_static(alias, id, owner, member, span);
                }
            }
            ImportKind::StaticStar { owner } => {
                if let Some(owner) = self.resolve_import_target(pass, owner, &ctx) {
                    pass.imports.add_static_star(id, owner, span);
                }
            }
        }
    }

    fn resolve_import_target(
        &mut self,
        pass: &mut ModulePass,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
    ) -> Option<ClassId> {
        if reference.is_erroneous() {
            return None;
        }
        let mut resolver = self.resolver(pass);
        let outcome = resolver.resolve(reference, ctx);
        if outcome.class().is_none() {
            let name = reference.display_name();
            resolver.report(
                reference.span,
                &diagnostic_messages::UNABLE_TO_RESOLVE_IMPORT,
                &[&name],
            );
            reference.mark_erroneous();
        }
        outcome.class()
    }

    // =========================================================================
    // Class headers
    // =========================================================================

    /// Context for the body of `class`. Static nested types do not see the
    /// type parameters of their enclosing types.
    fn enter_class(&self, class: ClassId, parent: &ResolutionContext) -> ResolutionContext {
        let classes = &self.unit.classes;
        let ctx = parent.enter_type(class);
        if classes[class].outer.is_some() && classes.is_static_member(class) {
            ctx.without_generics()
        } else {
            ctx
        }
    }

    /// Bind the names first so bounds may mention them, then resolve the
    /// bounds and rebind each name to its first bound.
    fn bind_type_params(
        &mut self,
        pass: &mut ModulePass,
        params: &mut [TypeParam],
        ctx: &mut ResolutionContext,
    ) {
        for param in params.iter() {
            ctx.bind_generic(&param.name, ClassId::OBJECT);
        }
        for param in params.iter_mut() {
            let mut resolver = self.resolver(pass);
            for bound in &mut param.bounds {
                resolver.resolve_or_report(bound, ctx);
            }
            let bound = param
                .bounds
                .first()
                .and_then(TypeReference::resolved_class)
                .unwrap_or(ClassId::OBJECT);
            ctx.bind_generic(&param.name, bound);
        }
    }

    /// Supertypes and type-parameter bounds of `class` and its nested classes.
    ///
    /// A trial sweep leaves failed supertypes unresolved and silent, because
    /// they may name a nested type inherited through a supertype whose own
    /// module has not been visited yet. The final sweep retries and reports.
    fn resolve_class_header(
        &mut self,
        pass: &mut ModulePass,
        class: ClassId,
        parent: &ResolutionContext,
        depth: u32,
        sweep: HeaderSweep,
    ) {
        if depth > MAX_TYPE_DECLARATION_DEPTH {
            return;
        }
        let mut ctx = self.enter_class(class, parent);

        let mut type_params = std::mem::take(&mut self.unit.classes[class].type_params);
        self.bind_type_params(pass, &mut type_params, &mut ctx);
        self.unit.classes[class].type_params = type_params;

        if !self.unit.classes[class].flags.contains(ClassFlags::HEADER_RESOLVED) {
            let mut complete = true;
            // the superclass goes back first so interface lookups can walk it
            if let Some(mut super_class) = self.unit.classes[class].super_class.take() {
                complete &= self.resolve_header_reference(pass, &mut super_class, &ctx, sweep);
                self.unit.classes[class].super_class = Some(super_class);
            }
            let mut interfaces = std::mem::take(&mut self.unit.classes[class].interfaces);
            for reference in &mut interfaces {
                complete &= self.resolve_header_reference(pass, reference, &ctx, sweep);
            }

            let decl = &mut self.unit.classes[class];
            decl.interfaces = interfaces;
            if complete || sweep == HeaderSweep::Final {
                decl.flags |= ClassFlags::HEADER_RESOLVED;
            }
        }

        for nested in self.unit.classes[class].inner_classes.clone() {
            self.resolve_class_header(pass, nested, &ctx, depth + 1, sweep);
        }
    }

    fn resolve_header_reference(
        &mut self,
        pass: &mut ModulePass,
        reference: &mut TypeReference,
        ctx: &ResolutionContext,
        sweep: HeaderSweep,
    ) -> bool {
        let reported_before = self.diagnostics.len();
        let mut resolver = self.resolver(pass);
        let outcome = match sweep {
            HeaderSweep::Trial => resolver.resolve(reference, ctx),
            HeaderSweep::Final => resolver.resolve_or_report(reference, ctx),
        };
        // a reference cut off by the depth guard is already reported
        if !outcome.is_resolved()
            && self.diagnostics[reported_before..]
                .iter()
                .any(|d| d.code == diagnostic_codes::RESOLUTION_TOO_DEEP)
        {
            reference.mark_erroneous();
        }
        outcome.is_resolved()
    }

    // =========================================================================
    // Class members
    // =========================================================================

    fn resolve_class_members(
        &mut self,
        pass: &mut ModulePass,
        class: ClassId,
        parent: &ResolutionContext,
        depth: u32,
    ) {
        if depth > MAX_TYPE_DECLARATION_DEPTH {
            return;
        }
        let mut ctx = self.enter_class(class, parent);

        // bounds are already resolved; this only rebuilds the bindings
        let mut type_params = std::mem::take(&mut self.unit.classes[class].type_params);
        self.bind_type_params(pass, &mut type_params, &mut ctx);
        self.unit.classes[class].type_params = type_params;

        let mut annotations = std::mem::take(&mut self.unit.classes[class].annotations);
        self.resolve_annotations(pass, &mut annotations, &ctx);
        self.unit.classes[class].annotations = annotations;

        for index in 0..self.unit.classes[class].fields.len() {
            self.resolve_field(pass, class, index, &ctx);
        }

        let mut methods = std::mem::take(&mut self.unit.classes[class].methods);
        for method in &mut methods {
            self.resolve_method(pass, class, method, &ctx);
        }
        self.unit.classes[class].methods = methods;

        for nested in self.unit.classes[class].inner_classes.clone() {
            self.resolve_class_members(pass, nested, &ctx, depth + 1);
        }
    }

    fn resolve_field(
        &mut self,
        pass: &mut ModulePass,
        class: ClassId,
        index: usize,
        ctx: &ResolutionContext,
    ) {
        let field = &mut self.unit.classes[class].fields[index];
        let mut ty = std::mem::take(&mut field.ty);
        let mut annotations = std::mem::take(&mut field.annotations);
        let mut initializer = field.initializer.take();

        self.resolver(pass).resolve_or_report(&mut ty, ctx);
        self.resolve_annotations(pass, &mut annotations, ctx);
        if let Some(init) = initializer.as_mut() {
            let mut scope = self.member_scope(class);
            self.resolve_expr(pass, init, ctx, &mut scope);
        }

        let field = &mut self.unit.classes[class].fields[index];
        field.ty = ty;
        field.annotations = annotations;
        field.initializer = initializer;
    }

    fn resolve_method(
        &mut self,
        pass: &mut ModulePass,
        class: ClassId,
        method: &mut MethodDecl,
        class_ctx: &ResolutionContext,
    ) {
        let mut ctx = if method.is_static() {
            class_ctx.without_generics()
        } else {
            class_ctx.clone()
        };
        self.bind_type_params(pass, &mut method.type_params, &mut ctx);

        let mut resolver = self.resolver(pass);
        for param in &mut method.params {
            resolver.resolve_or_report(&mut param.ty, &ctx);
        }
        if let Some(return_type) = method.return_type.as_mut() {
            resolver.resolve_or_report(return_type, &ctx);
        }
        for thrown in &mut method.throws {
            resolver.resolve_or_report(thrown, &ctx);
        }

        self.resolve_annotations(pass, &mut method.annotations, &ctx);
        for param in &mut method.params {
            self.resolve_annotations(pass, &mut param.annotations, &ctx);
        }

        if let Some(body) = method.body.as_mut() {
            let mut scope = self.member_scope(class);
            for param in &method.params {
                scope.declare(&param.name);
            }
            for stmt in body.iter_mut() {
                self.resolve_stmt(pass, stmt, &ctx, &mut scope);
            }
            method.dynamic_variables = scope.into_dynamic_variables();
        }
    }

    /// Scope whose outermost frame holds the fields of `class` and of its
    /// lexically enclosing classes.
    fn member_scope(&self, class: ClassId) -> ScopeStack {
        let classes = &self.unit.classes;
        let mut scope = ScopeStack::new();
        for id in std::iter::once(class).chain(classes.outer_classes(class)) {
            for field in &classes[id].fields {
                scope.declare(&field.name);
            }
        }
        scope.push();
        scope
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderSweep {
    Trial,
    Final,
}

fn import_phase(kind: &ImportKind) -> u8 {
    match kind {
        ImportKind::Single { .. } => 0,
        ImportKind::Star { .. } => 1,
        ImportKind::StaticSingle { .. } => 2,
        ImportKind::StaticStar { .. } => 3,
    }
}

/// Resolve every module of `unit` with the given options.
pub fn resolve_compile_unit(
    unit: &mut CompileUnit,
    external: &dyn ExternalResolver,
    options: ResolverOptions,
) -> ResolutionReport {
    ResolutionDriver::new(unit, external)
        .with_options(options)
        .resolve_all()
}

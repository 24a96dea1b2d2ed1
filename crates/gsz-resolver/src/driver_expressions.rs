//! Statement and expression walking for the resolution driver.
//!
//! Identifiers and dotted chains that are not local variables may name a type
//! (`String.valueOf(x)`, `java.util.Collections.emptyList()`). They are tried
//! as type references without reporting; a hit rewrites the node to a
//! `ClassRef`, a miss records a dynamic variable.

use crate::context::ResolutionContext;
use crate::driver::ResolutionDriver;
use crate::resolver::ModulePass;
use crate::scope::ScopeStack;
use gsz_ast::{Annotation, Expr, ExprKind, FieldDecl, Stmt, TypeReference};
use gsz_common::Span;
use tracing::trace;

impl ResolutionDriver<'_> {
    pub(crate) fn resolve_stmt(
        &mut self,
        pass: &mut ModulePass,
        stmt: &mut Stmt,
        ctx: &ResolutionContext,
        scope: &mut ScopeStack,
    ) {
        match stmt {
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.resolve_expr(pass, expr, ctx, scope),
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.resolve_expr(pass, expr, ctx, scope);
                }
            }
            Stmt::VarDecl { name, ty, init, .. } => {
                if let Some(ty) = ty {
                    self.resolver(pass).resolve_or_report(ty, ctx);
                }
                // the initializer cannot see the variable it initializes
                if let Some(init) = init {
                    self.resolve_expr(pass, init, ctx, scope);
                }
                scope.declare(name);
            }
            Stmt::Block(stmts) => self.resolve_block(pass, stmts, ctx, scope),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(pass, cond, ctx, scope);
                self.resolve_scoped(pass, then_branch, ctx, scope);
                if let Some(else_branch) = else_branch {
                    self.resolve_scoped(pass, else_branch, ctx, scope);
                }
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(pass, cond, ctx, scope);
                self.resolve_scoped(pass, body, ctx, scope);
            }
            Stmt::For {
                var,
                iterable,
                body,
            } => {
                self.resolve_expr(pass, iterable, ctx, scope);
                scope.push();
                self.resolver(pass).resolve_or_report(&mut var.ty, ctx);
                scope.declare(&var.name);
                self.resolve_stmt(pass, body, ctx, scope);
                scope.pop();
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.resolve_block(pass, body, ctx, scope);
                for clause in catches {
                    scope.push();
                    self.resolver(pass)
                        .resolve_or_report(&mut clause.param.ty, ctx);
                    scope.declare(&clause.param.name);
                    for stmt in &mut clause.body {
                        self.resolve_stmt(pass, stmt, ctx, scope);
                    }
                    scope.pop();
                }
                if let Some(finally) = finally {
                    self.resolve_block(pass, finally, ctx, scope);
                }
            }
        }
    }

    fn resolve_block(
        &mut self,
        pass: &mut ModulePass,
        stmts: &mut [Stmt],
        ctx: &ResolutionContext,
        scope: &mut ScopeStack,
    ) {
        scope.push();
        for stmt in stmts {
            self.resolve_stmt(pass, stmt, ctx, scope);
        }
        scope.pop();
    }

    /// Branch bodies get their own frame even when they are a single statement.
    fn resolve_scoped(
        &mut self,
        pass: &mut ModulePass,
        stmt: &mut Stmt,
        ctx: &ResolutionContext,
        scope: &mut ScopeStack,
    ) {
        scope.push();
        self.resolve_stmt(pass, stmt, ctx, scope);
        scope.pop();
    }

    pub(crate) fn resolve_expr(
        &mut self,
        pass: &mut ModulePass,
        expr: &mut Expr,
        ctx: &ResolutionContext,
        scope: &mut ScopeStack,
    ) {
        if matches!(expr.kind, ExprKind::Property { .. }) {
            self.resolve_property(pass, expr, ctx, scope);
            return;
        }

        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Identifier(name) => {
                if is_receiver_keyword(name) || scope.is_declared(name) {
                    return;
                }
                let name = name.clone();
                match self.trial_resolve(pass, &name, span, ctx) {
                    Some(reference) => {
                        scope.forget_reference(&name);
                        expr.kind = ExprKind::ClassRef(reference);
                    }
                    None => scope.note_reference(&name),
                }
            }
            ExprKind::ClassRef(reference) => {
                self.resolver(pass).resolve_or_report(reference, ctx);
            }
            ExprKind::Cast { ty, expr: inner } | ExprKind::InstanceOf { expr: inner, ty } => {
                self.resolver(pass).resolve_or_report(ty, ctx);
                self.resolve_expr(pass, inner, ctx, scope);
            }
            ExprKind::New { ty, args } => {
                self.resolver(pass).resolve_or_report(ty, ctx);
                for arg in args {
                    self.resolve_expr(pass, arg, ctx, scope);
                }
            }
            ExprKind::Call { receiver, args, .. } => {
                if let Some(receiver) = receiver {
                    self.resolve_expr(pass, receiver, ctx, scope);
                }
                for arg in args {
                    self.resolve_expr(pass, arg, ctx, scope);
                }
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                self.resolve_expr(pass, lhs, ctx, scope);
                self.resolve_expr(pass, rhs, ctx, scope);
            }
            ExprKind::Closure { params, body } => {
                scope.push();
                let mut resolver = self.resolver(pass);
                for param in params.iter_mut() {
                    resolver.resolve_or_report(&mut param.ty, ctx);
                }
                for param in params.iter() {
                    scope.declare(&param.name);
                }
                if params.is_empty() {
                    scope.declare("it");
                }
                for stmt in body {
                    self.resolve_stmt(pass, stmt, ctx, scope);
                }
                scope.pop();
            }
            ExprKind::List(items) => {
                for item in items {
                    self.resolve_expr(pass, item, ctx, scope);
                }
            }
            ExprKind::Constant(_) | ExprKind::Property { .. } => {}
        }
    }

    /// `a.b.C.d`: when every segment is a plain identifier and the head is not
    /// a variable, the longest prefix naming a type becomes a `ClassRef` and
    /// the rest stays property access on it.
    fn resolve_property(
        &mut self,
        pass: &mut ModulePass,
        expr: &mut Expr,
        ctx: &ResolutionContext,
        scope: &mut ScopeStack,
    ) {
        if let Some(segments) = dotted_segments(expr)
            && !is_receiver_keyword(&segments[0])
            && !scope.is_declared(&segments[0])
        {
            let span = expr.span;
            for len in (1..=segments.len()).rev() {
                let name = segments[..len].join(".");
                let Some(reference) = self.trial_resolve(pass, &name, span, ctx) else {
                    continue;
                };
                trace!(name = %name, rest = segments.len() - len, "dotted chain names a type");
                scope.forget_reference(&segments[0]);
                *expr = segments[len..].iter().fold(
                    Expr::new(ExprKind::ClassRef(reference), span),
                    |object, segment| {
                        Expr::new(
                            ExprKind::Property {
                                object: Box::new(object),
                                name: segment.clone(),
                            },
                            span,
                        )
                    },
                );
                return;
            }
            scope.note_reference(&segments[0]);
            return;
        }

        if let ExprKind::Property { object, .. } = &mut expr.kind {
            self.resolve_expr(pass, object, ctx, scope);
        }
    }

    fn trial_resolve(
        &mut self,
        pass: &mut ModulePass,
        name: &str,
        span: Span,
        ctx: &ResolutionContext,
    ) -> Option<TypeReference> {
        let mut reference = TypeReference::new(name, span);
        self.resolver(pass)
            .resolve(&mut reference, ctx)
            .is_resolved()
            .then_some(reference)
    }

    pub(crate) fn resolve_annotations(
        &mut self,
        pass: &mut ModulePass,
        annotations: &mut [Annotation],
        ctx: &ResolutionContext,
    ) {
        for annotation in annotations {
            self.resolver(pass).resolve_or_report(&mut annotation.ty, ctx);
            for (_, value) in &mut annotation.members {
                let mut scope = ScopeStack::new();
                self.resolve_expr(pass, value, ctx, &mut scope);
                if self.options.fold_annotation_constants {
                    self.fold_constant(value);
                }
            }
        }
    }

    /// Replace `Owner.NAME` by the literal initializer of a constant field
    /// declared in source.
    fn fold_constant(&self, expr: &mut Expr) {
        if let ExprKind::List(items) = &mut expr.kind {
            for item in items {
                self.fold_constant(item);
            }
            return;
        }
        let ExprKind::Property { object, name } = &expr.kind else {
            return;
        };
        let Some(owner) = object.as_class_ref().and_then(TypeReference::resolved_class) else {
            return;
        };
        let decl = &self.unit.classes[owner];
        if !decl.is_source() {
            return;
        }
        let Some(value) = decl.field(name).and_then(FieldDecl::constant_value).cloned() else {
            return;
        };
        trace!(owner = %decl.name, field = %name, "folded annotation constant");
        expr.kind = ExprKind::Constant(value);
    }
}

fn is_receiver_keyword(name: &str) -> bool {
    matches!(name, "this" | "super")
}

/// Segments of a chain made only of identifiers and property accesses.
fn dotted_segments(expr: &Expr) -> Option<Vec<String>> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some(vec![name.clone()]),
        ExprKind::Property { object, name } => {
            let mut segments = dotted_segments(object)?;
            segments.push(name.clone());
            Some(segments)
        }
        _ => None,
    }
}

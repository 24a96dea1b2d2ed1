//! Fluent construction of compile units.
//!
//! Parsing is not part of this workspace; hosts and tests build trees through
//! these helpers instead.
//!
//! ```
//! use gsz_ast::builder::{CompileUnitBuilder, ty};
//!
//! let mut builder = CompileUnitBuilder::new();
//! let module = builder.module("Shapes.groovy", Some("geo"));
//! builder.import(module, "java.util.List");
//! let shape = builder.interface(module, "Shape").build();
//! let circle = builder.class(module, "Circle").implements(ty("Shape")).build();
//! let unit = builder.finish();
//! assert_eq!(unit.classes[circle].name, "geo.Circle");
//! assert_eq!(unit.classes[shape].name, "geo.Shape");
//! ```

use crate::class::{ClassDecl, ClassId, ClassKind, ClassOrigin, Modifiers};
use crate::module::{CompileUnit, ImportId, ImportKind, ModuleId};
use crate::node::{
    Annotation, BinaryOp, Constant, Expr, ExprKind, FieldDecl, MethodDecl, Parameter, Stmt,
    TypeParam,
};
use crate::type_ref::{GenericArg, TypeReference};
use gsz_common::Span;

// =============================================================================
// Type references
// =============================================================================

#[must_use]
pub fn ty(name: &str) -> TypeReference {
    TypeReference::new(name, Span::dummy())
}

#[must_use]
pub fn ty_at(name: &str, start: u32) -> TypeReference {
    TypeReference::new(name, Span::at(start, name.len() as u32))
}

#[must_use]
pub fn generic_ty(name: &str, args: Vec<TypeReference>) -> TypeReference {
    ty(name).with_generics(args.into_iter().map(GenericArg::Type).collect())
}

#[must_use]
pub fn array_ty(component: TypeReference) -> TypeReference {
    TypeReference::array_of(component)
}

#[must_use]
pub fn wildcard(upper: Option<TypeReference>, lower: Option<TypeReference>) -> GenericArg {
    GenericArg::Wildcard {
        upper: upper.map(Box::new),
        lower: lower.map(Box::new),
        span: Span::dummy(),
    }
}

// =============================================================================
// Expressions and statements
// =============================================================================

#[must_use]
pub fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Identifier(name.to_string()), Span::dummy())
}

#[must_use]
pub fn prop(object: Expr, name: &str) -> Expr {
    let span = object.span;
    Expr::new(
        ExprKind::Property {
            object: Box::new(object),
            name: name.to_string(),
        },
        span,
    )
}

/// `a.b.C` as a chain of property accesses on the identifier `a`.
#[must_use]
pub fn dotted(path: &str) -> Expr {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or_default();
    segments.fold(ident(head), prop)
}

#[must_use]
pub fn constant(value: Constant) -> Expr {
    Expr::new(ExprKind::Constant(value), Span::dummy())
}

#[must_use]
pub fn int(value: i64) -> Expr {
    constant(Constant::Int(value))
}

#[must_use]
pub fn string(value: &str) -> Expr {
    constant(Constant::Str(value.to_string()))
}

#[must_use]
pub fn class_ref(reference: TypeReference) -> Expr {
    let span = reference.span;
    Expr::new(ExprKind::ClassRef(reference), span)
}

#[must_use]
pub fn call(receiver: Option<Expr>, method: &str, args: Vec<Expr>) -> Expr {
    Expr::new(
        ExprKind::Call {
            receiver: receiver.map(Box::new),
            method: method.to_string(),
            args,
        },
        Span::dummy(),
    )
}

#[must_use]
pub fn new_instance(reference: TypeReference, args: Vec<Expr>) -> Expr {
    let span = reference.span;
    Expr::new(ExprKind::New { ty: reference, args }, span)
}

#[must_use]
pub fn cast(reference: TypeReference, expr: Expr) -> Expr {
    let span = reference.span;
    Expr::new(
        ExprKind::Cast {
            ty: reference,
            expr: Box::new(expr),
        },
        span,
    )
}

#[must_use]
pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        Span::dummy(),
    )
}

#[must_use]
pub fn closure(params: Vec<Parameter>, body: Vec<Stmt>) -> Expr {
    Expr::new(ExprKind::Closure { params, body }, Span::dummy())
}

#[must_use]
pub fn list(items: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::List(items), Span::dummy())
}

#[must_use]
pub fn var(name: &str, reference: Option<TypeReference>, init: Option<Expr>) -> Stmt {
    Stmt::VarDecl {
        name: name.to_string(),
        ty: reference,
        init,
        span: Span::dummy(),
    }
}

// =============================================================================
// Members
// =============================================================================

#[must_use]
pub fn param(name: &str, reference: TypeReference) -> Parameter {
    Parameter {
        name: name.to_string(),
        ty: reference,
        annotations: Vec::new(),
        span: Span::dummy(),
    }
}

#[must_use]
pub fn field(name: &str, reference: TypeReference) -> FieldDecl {
    FieldDecl {
        name: name.to_string(),
        modifiers: Modifiers::PRIVATE,
        ty: reference,
        initializer: None,
        annotations: Vec::new(),
        span: Span::dummy(),
    }
}

/// `public static final <ty> <name> = <value>`
#[must_use]
pub fn constant_field(name: &str, reference: TypeReference, value: Constant) -> FieldDecl {
    FieldDecl {
        modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
        initializer: Some(constant(value)),
        ..field(name, reference)
    }
}

#[must_use]
pub fn annotation(reference: TypeReference, members: Vec<(&str, Expr)>) -> Annotation {
    let span = reference.span;
    Annotation {
        ty: reference,
        members: members
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
        span,
    }
}

#[must_use]
pub fn type_param(name: &str, bounds: Vec<TypeReference>) -> TypeParam {
    TypeParam {
        name: name.to_string(),
        bounds,
        span: Span::dummy(),
    }
}

pub struct MethodBuilder {
    decl: MethodDecl,
}

impl MethodBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            decl: MethodDecl {
                name: name.to_string(),
                modifiers: Modifiers::PUBLIC,
                is_constructor: false,
                type_params: Vec::new(),
                params: Vec::new(),
                return_type: None,
                throws: Vec::new(),
                body: None,
                annotations: Vec::new(),
                dynamic_variables: Vec::new(),
                span: Span::dummy(),
            },
        }
    }

    #[must_use]
    pub fn constructor() -> Self {
        let mut builder = Self::new("<init>");
        builder.decl.is_constructor = true;
        builder
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: &str, bounds: Vec<TypeReference>) -> Self {
        self.decl.type_params.push(type_param(name, bounds));
        self
    }

    #[must_use]
    pub fn param(mut self, name: &str, reference: TypeReference) -> Self {
        self.decl.params.push(param(name, reference));
        self
    }

    #[must_use]
    pub fn returns(mut self, reference: TypeReference) -> Self {
        self.decl.return_type = Some(reference);
        self
    }

    #[must_use]
    pub fn throws(mut self, reference: TypeReference) -> Self {
        self.decl.throws.push(reference);
        self
    }

    #[must_use]
    pub fn body(mut self, body: Vec<Stmt>) -> Self {
        self.decl.body = Some(body);
        self
    }

    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.decl.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn build(self) -> MethodDecl {
        self.decl
    }
}

// =============================================================================
// Compile units
// =============================================================================

#[derive(Default)]
pub struct CompileUnitBuilder {
    unit: CompileUnit,
}

impl CompileUnitBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&mut self, file_name: &str, package: Option<&str>) -> ModuleId {
        self.unit.add_module(file_name, package)
    }

    /// `import a.b.C`
    pub fn import(&mut self, module: ModuleId, name: &str) -> ImportId {
        let alias = name.rsplit('.').next().unwrap_or(name).to_string();
        self.import_as(module, name, &alias)
    }

    /// `import a.b.C as D`
    pub fn import_as(&mut self, module: ModuleId, name: &str, alias: &str) -> ImportId {
        self.unit.module_mut(module).add_import(
            ImportKind::Single {
                ty: ty(name),
                alias: alias.to_string(),
            },
            Span::dummy(),
        )
    }

    /// `import a.b.*`
    pub fn star_import(&mut self, module: ModuleId, package: &str) -> ImportId {
        self.unit.module_mut(module).add_import(
            ImportKind::Star {
                package: package.to_string(),
                owner: None,
            },
            Span::dummy(),
        )
    }

    /// `import static a.b.C.member`
    pub fn static_import(&mut self, module: ModuleId, owner: &str, member: &str) -> ImportId {
        self.static_import_as(module, owner, member, member)
    }

    /// `import static a.b.C.member as alias`
    pub fn static_import_as(
        &mut self,
        module: ModuleId,
        owner: &str,
        member: &str,
        alias: &str,
    ) -> ImportId {
        self.unit.module_mut(module).add_import(
            ImportKind::StaticSingle {
                owner: ty(owner),
                member: member.to_string(),
                alias: alias.to_string(),
            },
            Span::dummy(),
        )
    }

    /// `import static a.b.C.*`
    pub fn static_star_import(&mut self, module: ModuleId, owner: &str) -> ImportId {
        self.unit
            .module_mut(module)
            .add_import(ImportKind::StaticStar { owner: ty(owner) }, Span::dummy())
    }

    pub fn class(&mut self, module: ModuleId, simple_name: &str) -> ClassBuilder<'_> {
        let name = format!("{}{simple_name}", self.unit.module(module).package_prefix());
        let decl = ClassDecl::new(name, ClassKind::Class, ClassOrigin::Source(module));
        self.declare(module, decl)
    }

    pub fn interface(&mut self, module: ModuleId, simple_name: &str) -> ClassBuilder<'_> {
        self.class(module, simple_name).kind(ClassKind::Interface)
    }

    /// Class nested directly inside `outer`, declared in the module of `outer`.
    ///
    /// # Panics
    /// If `outer` is not a source class.
    pub fn nested(&mut self, outer: ClassId, simple_name: &str) -> ClassBuilder<'_> {
        let ClassOrigin::Source(module) = self.unit.classes[outer].origin else {
            panic!("nested classes can only be declared inside source classes");
        };
        let mut decl = ClassDecl::new(
            format!("{}${simple_name}", self.unit.classes[outer].name),
            ClassKind::Class,
            ClassOrigin::Source(module),
        );
        decl.outer = Some(outer);
        let mut builder = self.declare(module, decl);
        let id = builder.id;
        builder.unit.classes[outer].inner_classes.push(id);
        builder
    }

    fn declare(&mut self, module: ModuleId, decl: ClassDecl) -> ClassBuilder<'_> {
        let id = self.unit.classes.alloc(decl);
        self.unit.module_mut(module).classes.push(id);
        ClassBuilder {
            unit: &mut self.unit,
            id,
        }
    }

    pub fn unit_mut(&mut self) -> &mut CompileUnit {
        &mut self.unit
    }

    #[must_use]
    pub fn finish(self) -> CompileUnit {
        self.unit
    }
}

pub struct ClassBuilder<'a> {
    unit: &'a mut CompileUnit,
    id: ClassId,
}

impl ClassBuilder<'_> {
    fn decl(&mut self) -> &mut ClassDecl {
        &mut self.unit.classes[self.id]
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl().modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.decl().kind = kind;
        self
    }

    #[must_use]
    pub fn extends(mut self, reference: TypeReference) -> Self {
        self.decl().super_class = Some(reference);
        self
    }

    #[must_use]
    pub fn implements(mut self, reference: TypeReference) -> Self {
        self.decl().interfaces.push(reference);
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: &str, bounds: Vec<TypeReference>) -> Self {
        self.decl().type_params.push(type_param(name, bounds));
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.decl().fields.push(field);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.decl().methods.push(method);
        self
    }

    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.decl().annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.decl().span = span;
        self
    }

    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn build(self) -> ClassId {
        self.id
    }
}

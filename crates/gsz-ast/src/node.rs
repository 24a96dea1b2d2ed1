//! Members, statements and expressions.
//!
//! Only the shapes that embed type references, introduce variables, or can be
//! rewritten by the resolution pass are modelled.

use crate::class::Modifiers;
use crate::type_ref::TypeReference;
use gsz_common::Span;

/// Declared type parameter: `T extends Bound1 & Bound2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeReference>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub ty: TypeReference,
    pub members: Vec<(String, Expr)>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: TypeReference,
    pub initializer: Option<Expr>,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

impl FieldDecl {
    /// Constant value of a `static final` field initialized with a literal.
    #[must_use]
    pub fn constant_value(&self) -> Option<&Constant> {
        if !self.modifiers.contains(Modifiers::STATIC | Modifiers::FINAL) {
            return None;
        }
        match &self.initializer {
            Some(Expr {
                kind: ExprKind::Constant(value),
                ..
            }) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeReference,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub is_constructor: bool,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Parameter>,
    /// `None` for constructors.
    pub return_type: Option<TypeReference>,
    pub throws: Vec<TypeReference>,
    pub body: Option<Vec<Stmt>>,
    pub annotations: Vec<Annotation>,
    /// Names read in the body that no enclosing scope declares, in first-use order.
    pub dynamic_variables: Vec<String>,
    pub span: Span,
}

impl MethodDecl {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Parameter,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    VarDecl {
        name: String,
        ty: Option<TypeReference>,
        init: Option<Expr>,
        span: Span,
    },
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        var: Parameter,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Try {
        body: Vec<Stmt>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    And,
    Or,
    Assign,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    Property {
        object: Box<Expr>,
        name: String,
    },
    /// Expression denoting a type (`String` in `String.valueOf(x)`).
    ClassRef(TypeReference),
    Constant(Constant),
    Cast {
        ty: TypeReference,
        expr: Box<Expr>,
    },
    New {
        ty: TypeReference,
        args: Vec<Expr>,
    },
    Call {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeReference,
    },
    Closure {
        params: Vec<Parameter>,
        body: Vec<Stmt>,
    },
    List(Vec<Expr>),
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Type reference carried by a `ClassRef` expression.
    #[must_use]
    pub fn as_class_ref(&self) -> Option<&TypeReference> {
        match &self.kind {
            ExprKind::ClassRef(ty) => Some(ty),
            _ => None,
        }
    }
}

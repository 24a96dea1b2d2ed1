//! Module tree for the gsz compiler front end.
//!
//! The tree is what the resolution pass consumes and rewrites in place:
//! - `ClassArena` / `ClassDecl` / `ClassId`: every declared, built-in, external
//!   or pending type visible to one compilation
//! - `TypeReference`: the mutable node naming a type
//! - `Module` / `ImportDecl` / `CompileUnit`: source units and their imports
//! - `node`: members, statements and expressions that embed type references
//! - `builder`: fluent construction of trees without a parser

pub mod class;
pub use class::{
    ClassArena, ClassDecl, ClassFlags, ClassId, ClassKind, ClassOrigin, Modifiers, UnitHandle,
};

pub mod type_ref;
pub use type_ref::{GenericArg, RefKind, ResolvedState, TypeReference};

pub mod module;
pub use module::{CompileUnit, ImportDecl, ImportId, ImportKind, Module, ModuleId};

pub mod node;
pub use node::{
    Annotation, BinaryOp, CatchClause, Constant, Expr, ExprKind, FieldDecl, MethodDecl, Parameter,
    Stmt, TypeParam,
};

pub mod builder;

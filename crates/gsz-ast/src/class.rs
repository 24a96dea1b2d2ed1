//! Class declarations and the arena that owns them.
//!
//! A `ClassId` is the handle every resolved `TypeReference` points at. The arena
//! holds source declarations of the whole compile set together with the types
//! the resolver learns about on the way: built-ins, already-compiled external
//! types, placeholders for source units that still have to be scheduled, and
//! synthesized array types.

use crate::module::ModuleId;
use crate::node::{Annotation, FieldDecl, MethodDecl, TypeParam};
use crate::type_ref::TypeReference;
use bitflags::bitflags;
use gsz_common::Span;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::ops::{Index, IndexMut};

/// Handle of a type in a [`ClassArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

impl ClassId {
    /// The universal root type, always the first class of every arena.
    pub const OBJECT: ClassId = ClassId(0);
}

/// Handle of a source unit owned by the surrounding compilation driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct UnitHandle(pub u32);

bitflags! {
    /// Declaration modifiers relevant to name resolution.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
    }
}

bitflags! {
    /// Per-class state written by the resolution pass.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ClassFlags: u8 {
        /// The class takes part in an inheritance cycle. Later phases consult
        /// this to suppress cascading errors.
        const INCONSISTENT_HIERARCHY = 1 << 0;
        /// Supertypes and type-parameter bounds have been resolved.
        const HEADER_RESOLVED = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Primitive,
}

/// Where a class in the arena came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Declared in a module of the compile set.
    Source(ModuleId),
    /// Seeded by the arena itself (root, primitives, implicit numeric types).
    Builtin,
    /// Already compiled, described by the external resolver.
    External,
    /// Belongs to a source unit that has been scheduled but not parsed yet.
    Pending(UnitHandle),
    /// Synthesized array of the component type.
    Array(ClassId),
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    /// Fully-qualified name, nested types joined with `$` (`pkg.Outer$Inner`).
    pub name: String,
    pub modifiers: Modifiers,
    pub kind: ClassKind,
    /// Lexically enclosing class for nested declarations.
    pub outer: Option<ClassId>,
    pub origin: ClassOrigin,
    pub type_params: Vec<TypeParam>,
    pub super_class: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    /// Nested declarations in source order.
    pub inner_classes: Vec<ClassId>,
    pub flags: ClassFlags,
    pub span: Span,
}

impl ClassDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ClassKind, origin: ClassOrigin) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            kind,
            outer: None,
            origin,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
            flags: ClassFlags::empty(),
            span: Span::dummy(),
        }
    }

    /// Package part of the name without the trailing dot, empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[..dot],
            None => "",
        }
    }

    /// Package part including the trailing dot, as used when building candidate names.
    #[must_use]
    pub fn package_prefix(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[..=dot],
            None => "",
        }
    }

    /// Name without the package (`Outer$Inner`).
    #[must_use]
    pub fn name_without_package(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[dot + 1..],
            None => &self.name,
        }
    }

    /// Innermost simple name (`Inner` for `pkg.Outer$Inner`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let base = self.name_without_package();
        match base.rfind('$') {
            Some(dollar) => &base[dollar + 1..],
            None => base,
        }
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    #[must_use]
    pub fn is_source(&self) -> bool {
        matches!(self.origin, ClassOrigin::Source(_))
    }

    #[must_use]
    pub fn has_inconsistent_hierarchy(&self) -> bool {
        self.flags.contains(ClassFlags::INCONSISTENT_HIERARCHY)
    }

    /// Resolved superclass link, if the reference has been resolved.
    #[must_use]
    pub fn resolved_super(&self) -> Option<ClassId> {
        self.super_class.as_ref().and_then(TypeReference::resolved_class)
    }

    /// Resolved interface links; unresolved entries are skipped.
    pub fn resolved_interfaces(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.interfaces.iter().filter_map(TypeReference::resolved_class)
    }

    /// Field lookup by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Names of the primitive types seeded into every arena.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Fully-qualified names of the non-primitive built-ins seeded into every arena.
pub const BUILTIN_TYPES: &[&str] = &["java.lang.Object", "java.math.BigInteger", "java.math.BigDecimal"];

/// Arena of all classes visible to one compilation.
#[derive(Debug)]
pub struct ClassArena {
    classes: Vec<ClassDecl>,
    by_name: FxHashMap<String, ClassId>,
    arrays: FxHashMap<ClassId, ClassId>,
}

impl Default for ClassArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassArena {
    pub fn new() -> ClassArena {
        let mut arena = ClassArena {
            classes: Vec::new(),
            by_name: FxHashMap::default(),
            arrays: FxHashMap::default(),
        };
        for &name in BUILTIN_TYPES {
            arena.alloc(ClassDecl::new(name, ClassKind::Class, ClassOrigin::Builtin));
        }
        for &name in PRIMITIVE_TYPES {
            let mut decl = ClassDecl::new(name, ClassKind::Primitive, ClassOrigin::Builtin);
            decl.modifiers = Modifiers::PUBLIC | Modifiers::FINAL;
            arena.alloc(decl);
        }
        debug_assert_eq!(arena.classes[ClassId::OBJECT.0 as usize].name, "java.lang.Object");
        arena
    }

    /// Add a class. The first declaration of a name wins the name index.
    pub fn alloc(&mut self, decl: ClassDecl) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.entry(decl.name.clone()).or_insert(id);
        self.classes.push(decl);
        id
    }

    #[must_use]
    pub fn get(&self, id: ClassId) -> Option<&ClassDecl> {
        self.classes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassDecl> {
        self.classes.get_mut(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDecl)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, decl)| (ClassId(i as u32), decl))
    }

    /// Compile-set lookup: only classes declared in source modules answer.
    #[must_use]
    pub fn find_local(&self, name: &str) -> Option<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .filter(|&id| self[id].is_source())
    }

    /// Any class the arena already knows under `name`, whatever its origin.
    #[must_use]
    pub fn lookup_known(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Built-in primitive class for `name`.
    #[must_use]
    pub fn primitive(&self, name: &str) -> Option<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .filter(|&id| self[id].kind == ClassKind::Primitive)
    }

    /// Intern an already-compiled type. Supertypes are kept as unresolved
    /// fully-qualified references and resolved when a hierarchy walk needs them.
    pub fn intern_external(
        &mut self,
        name: &str,
        modifiers: Modifiers,
        kind: ClassKind,
        super_class: Option<&str>,
        interfaces: &[String],
    ) -> ClassId {
        if let Some(id) = self.lookup_known(name) {
            return id;
        }
        let mut decl = ClassDecl::new(name, kind, ClassOrigin::External);
        decl.modifiers = modifiers;
        decl.super_class = super_class.map(TypeReference::fully_qualified);
        decl.interfaces = interfaces
            .iter()
            .map(|i| TypeReference::fully_qualified(i))
            .collect();
        self.alloc(decl)
    }

    /// Intern a placeholder for a type whose source unit still has to be compiled.
    pub fn declare_pending(&mut self, name: &str, unit: UnitHandle) -> ClassId {
        if let Some(id) = self.lookup_known(name) {
            return id;
        }
        self.alloc(ClassDecl::new(name, ClassKind::Class, ClassOrigin::Pending(unit)))
    }

    /// Array class of `component`, synthesized once per component.
    pub fn array_of(&mut self, component: ClassId) -> ClassId {
        if let Some(&id) = self.arrays.get(&component) {
            return id;
        }
        let name = format!("{}[]", self[component].name);
        let mut decl = ClassDecl::new(name, ClassKind::Class, ClassOrigin::Array(component));
        decl.super_class = Some(TypeReference::declared(ClassId::OBJECT));
        let id = ClassId(self.classes.len() as u32);
        // array names never enter the name index
        self.classes.push(decl);
        self.arrays.insert(component, id);
        id
    }

    /// Lexical outer chain of `id`, innermost first (excluding `id` itself).
    #[must_use]
    pub fn outer_classes(&self, id: ClassId) -> Vec<ClassId> {
        let mut result = Vec::new();
        let mut current = self[id].outer;
        while let Some(outer) = current {
            if result.contains(&outer) {
                break;
            }
            result.push(outer);
            current = self[outer].outer;
        }
        result
    }

    /// Outermost lexically enclosing class (or `id` itself for top-level classes).
    #[must_use]
    pub fn top_level(&self, id: ClassId) -> ClassId {
        self.outer_classes(id).last().copied().unwrap_or(id)
    }

    /// Whether `id` is a nested type that can be named without an outer instance.
    #[must_use]
    pub fn is_static_member(&self, id: ClassId) -> bool {
        let decl = &self[id];
        if decl.modifiers.contains(Modifiers::STATIC) || decl.kind != ClassKind::Class {
            return true;
        }
        decl.outer.is_some_and(|outer| self[outer].is_interface())
    }
}

impl Index<ClassId> for ClassArena {
    type Output = ClassDecl;

    fn index(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.0 as usize]
    }
}

impl IndexMut<ClassId> for ClassArena {
    fn index_mut(&mut self, id: ClassId) -> &mut ClassDecl {
        &mut self.classes[id.0 as usize]
    }
}

#[cfg(test)]
#[path = "tests/class_tests.rs"]
mod tests;

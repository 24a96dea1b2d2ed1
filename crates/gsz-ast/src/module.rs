//! Modules, imports and the compile unit.

use crate::class::{ClassArena, ClassId, UnitHandle};
use crate::type_ref::TypeReference;
use gsz_common::Span;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub u32);

/// Identity of one import declaration, unique within its module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ImportId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportKind {
    /// `import a.b.C` or `import a.b.C as D`
    Single { ty: TypeReference, alias: String },
    /// `import a.b.*`; `owner` is set when the prefix itself names a type.
    Star {
        package: String,
        owner: Option<TypeReference>,
    },
    /// `import static a.b.C.m` or `import static a.b.C.m as n`
    StaticSingle {
        owner: TypeReference,
        member: String,
        alias: String,
    },
    /// `import static a.b.C.*`
    StaticStar { owner: TypeReference },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub id: ImportId,
    pub kind: ImportKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub file_name: String,
    /// Package name without trailing dot.
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    /// Every class declared in this module, nested ones included, in source order.
    pub classes: Vec<ClassId>,
    /// Set once the import declarations have been resolved.
    pub imports_resolved: bool,
}

impl Module {
    #[must_use]
    pub fn new(id: ModuleId, file_name: impl Into<String>, package: Option<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            package,
            imports: Vec::new(),
            classes: Vec::new(),
            imports_resolved: false,
        }
    }

    #[must_use]
    pub fn has_package(&self) -> bool {
        self.package.is_some()
    }

    /// Package name with trailing dot, empty for the default package.
    #[must_use]
    pub fn package_prefix(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}."),
            None => String::new(),
        }
    }

    /// Allocate the identity for the next import declaration.
    pub fn add_import(&mut self, kind: ImportKind, span: Span) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        self.imports.push(ImportDecl { id, kind, span });
        id
    }
}

/// The set of modules compiled together, plus every type they can see.
#[derive(Debug, Default)]
pub struct CompileUnit {
    pub classes: ClassArena,
    pub modules: Vec<Module>,
    /// Source units the resolver found references to and that must be compiled too.
    pub pending_units: Vec<UnitHandle>,
}

impl CompileUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, file_name: impl Into<String>, package: Option<&str>) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules
            .push(Module::new(id, file_name, package.map(str::to_string)));
        id
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0 as usize]
    }
}

//! Supertype walks and inheritance cycle detection.
//!
//! The walks used by the nested-type strategies live on [`TypeResolver`]
//! because external supertypes are resolved lazily on first use. The cycle
//! checker only follows links that are already resolved, so an unresolved
//! reference is never mistaken for a cycle.

use crate::resolver::TypeResolver;
use gsz_ast::{ClassArena, ClassFlags, ClassId, ResolvedState, TypeReference};
use gsz_common::Span;
use gsz_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use gsz_common::limits::MAX_HIERARCHY_WALK;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

impl TypeResolver<'_> {
    /// Resolved superclass of `class`. Supertypes of external classes are
    /// looked up on first use; source supertypes belong to the driver.
    pub(crate) fn superclass_of(&mut self, class: ClassId) -> Option<ClassId> {
        let decl = &self.classes[class];
        let reference = decl.super_class.as_ref()?;
        let (state, is_source) = (reference.state, decl.is_source());
        match state {
            ResolvedState::Resolved(id) => Some(id),
            ResolvedState::Erroneous => None,
            ResolvedState::Unresolved if is_source => None,
            ResolvedState::Unresolved => {
                let name = reference.name.clone();
                let found = self.fetch_external(&name);
                if let Some(reference) = self.classes[class].super_class.as_mut() {
                    settle(reference, found);
                }
                found
            }
        }
    }

    /// Resolved direct interfaces of `class`, external ones looked up lazily.
    pub(crate) fn interfaces_of(&mut self, class: ClassId) -> SmallVec<[ClassId; 4]> {
        let decl = &self.classes[class];
        let is_source = decl.is_source();
        let mut result = SmallVec::new();
        let mut lazy = Vec::new();
        for (index, reference) in decl.interfaces.iter().enumerate() {
            match reference.state {
                ResolvedState::Resolved(id) => result.push(id),
                ResolvedState::Unresolved if !is_source => lazy.push((index, reference.name.clone())),
                ResolvedState::Unresolved | ResolvedState::Erroneous => {}
            }
        }
        for (index, name) in lazy {
            let found = self.fetch_external(&name);
            settle(&mut self.classes[class].interfaces[index], found);
            result.extend(found);
        }
        result
    }

    /// `start` followed by its superclasses, stopping before the root type
    /// or at the first repeat.
    pub(crate) fn superclass_chain(&mut self, start: ClassId) -> Vec<ClassId> {
        let mut chain = vec![start];
        let mut current = start;
        while chain.len() < MAX_HIERARCHY_WALK {
            match self.superclass_of(current) {
                Some(next) if next != ClassId::OBJECT && !chain.contains(&next) => {
                    chain.push(next);
                    current = next;
                }
                _ => break,
            }
        }
        chain
    }

    /// Every interface implemented by `classes`, transitively, each once.
    pub(crate) fn all_interfaces(&mut self, classes: &[ClassId]) -> Vec<ClassId> {
        let mut seen: FxHashSet<ClassId> = classes.iter().copied().collect();
        let mut result = Vec::new();
        let mut stack: Vec<ClassId> = classes.iter().rev().copied().collect();
        while let Some(class) = stack.pop() {
            if result.len() >= MAX_HIERARCHY_WALK {
                break;
            }
            let direct = self.interfaces_of(class);
            for &iface in direct.iter().rev() {
                if seen.insert(iface) {
                    stack.push(iface);
                }
            }
            for iface in direct {
                if !result.contains(&iface) && !classes.contains(&iface) {
                    result.push(iface);
                }
            }
        }
        result
    }
}

fn settle(reference: &mut TypeReference, found: Option<ClassId>) {
    match found {
        Some(id) => reference.resolve_to(id),
        None => reference.mark_erroneous(),
    }
}

/// Reports types that are their own (in)direct supertype and poisons every
/// class on the cycle with [`ClassFlags::INCONSISTENT_HIERARCHY`].
pub struct InheritanceChecker<'a> {
    classes: &'a mut ClassArena,
    file: &'a str,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> InheritanceChecker<'a> {
    pub fn new(classes: &'a mut ClassArena, file: &'a str, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            classes,
            file,
            diagnostics,
        }
    }

    /// Check `class`; returns true when a cycle was reported.
    /// Already poisoned classes are skipped, so each cycle is reported once.
    pub fn check(&mut self, class: ClassId) -> bool {
        if self.classes[class].has_inconsistent_hierarchy() {
            return false;
        }
        if self.classes[class].is_interface() {
            self.check_interface(class)
        } else {
            self.check_class(class)
        }
    }

    fn check_class(&mut self, class: ClassId) -> bool {
        let decl = &self.classes[class];
        if let Some(reference) = decl
            .interfaces
            .iter()
            .find(|r| r.resolved_class() == Some(class))
        {
            let span = reference.span;
            let name = decl.name.clone();
            self.emit(span, &diagnostic_messages::TYPE_CANNOT_IMPLEMENT_ITSELF, &[&name]);
            self.poison(&[class]);
            return true;
        }

        let mut path = vec![class];
        let mut current = class;
        while path.len() <= MAX_HIERARCHY_WALK {
            let Some(next) = self.classes[current].resolved_super() else {
                return false;
            };
            if next == class {
                let involving = self.classes[path.get(1).copied().unwrap_or(class)].name.clone();
                let name = self.classes[class].name.clone();
                let span = self.classes[class]
                    .super_class
                    .as_ref()
                    .map_or(self.classes[class].span, |r| r.span);
                debug!(class = %name, involving = %involving, "cyclic class inheritance");
                self.emit(span, &diagnostic_messages::CYCLIC_INHERITANCE_IN_CLASS, &[&involving, &name]);
                self.poison(&path);
                return true;
            }
            if next == ClassId::OBJECT
                || path.contains(&next)
                || self.classes[next].has_inconsistent_hierarchy()
            {
                return false;
            }
            path.push(next);
            current = next;
        }
        false
    }

    /// Interface cycles: each level's interfaces are checked for the origin
    /// before descending into them.
    fn check_interface(&mut self, class: ClassId) -> bool {
        let mut path = vec![class];
        let mut visited = FxHashSet::default();
        visited.insert(class);
        if !self.find_interface_cycle(class, class, &mut path, &mut visited) {
            return false;
        }

        let involving_id = path.get(1).copied().unwrap_or(class);
        let involving = self.classes[involving_id].name.clone();
        let name = self.classes[class].name.clone();
        let span = self.classes[class]
            .interfaces
            .iter()
            .find(|r| r.resolved_class() == Some(involving_id))
            .map_or(self.classes[class].span, |r| r.span);
        debug!(interface = %name, involving = %involving, "cyclic interface inheritance");
        self.emit(span, &diagnostic_messages::CYCLIC_INHERITANCE_IN_INTERFACE, &[&involving, &name]);
        self.poison(&path);
        true
    }

    fn find_interface_cycle(
        &self,
        origin: ClassId,
        current: ClassId,
        path: &mut Vec<ClassId>,
        visited: &mut FxHashSet<ClassId>,
    ) -> bool {
        if path.len() > MAX_HIERARCHY_WALK {
            return false;
        }
        let direct: SmallVec<[ClassId; 4]> = self.classes[current].resolved_interfaces().collect();
        if direct.contains(&origin) {
            return true;
        }
        for next in direct {
            if self.classes[next].has_inconsistent_hierarchy() || !visited.insert(next) {
                continue;
            }
            path.push(next);
            if self.find_interface_cycle(origin, next, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }

    fn poison(&mut self, classes: &[ClassId]) {
        for &id in classes {
            self.classes[id].flags |= ClassFlags::INCONSISTENT_HIERARCHY;
        }
    }

    fn emit(&mut self, span: Span, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .push(Diagnostic::from_message(self.file, span, message, args));
    }
}

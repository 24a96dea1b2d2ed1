use super::*;
use crate::module::ModuleId;

fn source(name: &str) -> ClassDecl {
    ClassDecl::new(name, ClassKind::Class, ClassOrigin::Source(ModuleId(0)))
}

#[test]
fn test_arena_seeds_object_first() {
    let arena = ClassArena::new();

    assert_eq!(arena[ClassId::OBJECT].name, "java.lang.Object");
    assert!(arena.lookup_known("java.math.BigDecimal").is_some());
    assert!(arena.primitive("int").is_some());
    assert!(arena.primitive("java.lang.Object").is_none());
    // Built-ins are not part of the compile set
    assert!(arena.find_local("java.lang.Object").is_none());
}

#[test]
fn test_name_parts() {
    let decl = source("a.b.Outer$Inner");

    assert_eq!(decl.package_name(), "a.b");
    assert_eq!(decl.package_prefix(), "a.b.");
    assert_eq!(decl.name_without_package(), "Outer$Inner");
    assert_eq!(decl.simple_name(), "Inner");

    let bare = source("Script");
    assert_eq!(bare.package_name(), "");
    assert_eq!(bare.package_prefix(), "");
    assert_eq!(bare.simple_name(), "Script");
}

#[test]
fn test_first_declaration_wins_name_index() {
    let mut arena = ClassArena::new();
    let first = arena.alloc(source("p.Dup"));
    let second = arena.alloc(source("p.Dup"));

    assert_ne!(first, second);
    assert_eq!(arena.find_local("p.Dup"), Some(first));
}

#[test]
fn test_intern_external_is_idempotent_and_keeps_supers_unresolved() {
    let mut arena = ClassArena::new();
    let interfaces = vec!["java.util.Collection".to_string()];
    let list = arena.intern_external(
        "java.util.List",
        Modifiers::PUBLIC,
        ClassKind::Interface,
        None,
        &interfaces,
    );
    let again = arena.intern_external("java.util.List", Modifiers::PUBLIC, ClassKind::Interface, None, &[]);

    assert_eq!(list, again);
    assert_eq!(arena[list].origin, ClassOrigin::External);
    assert_eq!(arena[list].interfaces.len(), 1);
    assert!(!arena[list].interfaces[0].is_resolved());
    assert_eq!(arena.find_local("java.util.List"), None);
    assert_eq!(arena.lookup_known("java.util.List"), Some(list));
}

#[test]
fn test_array_of_is_cached_and_unnamed() {
    let mut arena = ClassArena::new();
    let int = arena.primitive("int").unwrap();
    let array = arena.array_of(int);

    assert_eq!(arena.array_of(int), array);
    assert_eq!(arena[array].name, "int[]");
    assert_eq!(arena[array].origin, ClassOrigin::Array(int));
    assert_eq!(arena[array].resolved_super(), Some(ClassId::OBJECT));
    assert!(arena.lookup_known("int[]").is_none());
}

#[test]
fn test_outer_chain_and_top_level() {
    let mut arena = ClassArena::new();
    let outer = arena.alloc(source("p.Outer"));
    let mut middle = source("p.Outer$Middle");
    middle.outer = Some(outer);
    let middle = arena.alloc(middle);
    let mut inner = source("p.Outer$Middle$Inner");
    inner.outer = Some(middle);
    let inner = arena.alloc(inner);

    assert_eq!(arena.outer_classes(inner), vec![middle, outer]);
    assert_eq!(arena.top_level(inner), outer);
    assert_eq!(arena.top_level(outer), outer);
}

#[test]
fn test_static_member_rules() {
    let mut arena = ClassArena::new();
    let outer = arena.alloc(source("p.Outer"));
    let mut plain = source("p.Outer$Plain");
    plain.outer = Some(outer);
    let plain = arena.alloc(plain);
    let mut stat = source("p.Outer$Stat");
    stat.outer = Some(outer);
    stat.modifiers |= Modifiers::STATIC;
    let stat = arena.alloc(stat);

    let mut iface = ClassDecl::new("p.Api", ClassKind::Interface, ClassOrigin::Source(ModuleId(0)));
    iface.modifiers = Modifiers::PUBLIC;
    let iface = arena.alloc(iface);
    let mut member = source("p.Api$Member");
    member.outer = Some(iface);
    let member = arena.alloc(member);

    assert!(!arena.is_static_member(plain));
    assert!(arena.is_static_member(stat));
    assert!(arena.is_static_member(member));
}

#[test]
fn test_declare_pending_reuses_known_names() {
    let mut arena = ClassArena::new();
    let pending = arena.declare_pending("q.Later", UnitHandle(7));

    assert_eq!(arena[pending].origin, ClassOrigin::Pending(UnitHandle(7)));
    assert_eq!(arena.declare_pending("q.Later", UnitHandle(8)), pending);
}

use gsz_ast::builder::{
    CompileUnitBuilder, MethodBuilder, constant_field, dotted, generic_ty, ident, ty,
};
use gsz_ast::{ClassKind, Constant, ExprKind, ImportKind, Modifiers, RefKind};

#[test]
fn test_builder_names_classes_by_package() {
    let mut builder = CompileUnitBuilder::new();
    let packaged = builder.module("A.groovy", Some("a.b"));
    let script = builder.module("Script.groovy", None);

    let a = builder.class(packaged, "A").build();
    let s = builder.class(script, "Script").build();
    let unit = builder.finish();

    assert_eq!(unit.classes[a].name, "a.b.A");
    assert_eq!(unit.classes[s].name, "Script");
    assert_eq!(unit.module(packaged).classes, vec![a]);
    assert_eq!(unit.classes.find_local("a.b.A"), Some(a));
}

#[test]
fn test_builder_nested_classes_are_dollar_joined() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Outer.groovy", Some("p"));
    let outer = builder.class(m, "Outer").build();
    let inner = builder
        .nested(outer, "Inner")
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
        .build();
    let deeper = builder.nested(inner, "Deeper").build();
    let unit = builder.finish();

    assert_eq!(unit.classes[inner].name, "p.Outer$Inner");
    assert_eq!(unit.classes[deeper].name, "p.Outer$Inner$Deeper");
    assert_eq!(unit.classes[outer].inner_classes, vec![inner]);
    assert_eq!(unit.classes[deeper].outer, Some(inner));
    assert_eq!(unit.module(m).classes, vec![outer, inner, deeper]);
}

#[test]
fn test_builder_imports_keep_declaration_order() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("M.groovy", None);
    let single = builder.import(m, "java.util.List");
    let aliased = builder.import_as(m, "java.util.Map", "Dict");
    let star = builder.star_import(m, "java.io");
    let stat = builder.static_import(m, "java.util.Map", "Entry");
    let unit = builder.finish();

    let imports = &unit.module(m).imports;
    assert_eq!(imports.len(), 4);
    assert_eq!(imports[single.0 as usize].id, single);
    match &imports[single.0 as usize].kind {
        ImportKind::Single { ty, alias } => {
            assert_eq!(ty.name, "java.util.List");
            assert_eq!(alias, "List");
        }
        other => panic!("unexpected import {other:?}"),
    }
    assert!(matches!(
        &imports[aliased.0 as usize].kind,
        ImportKind::Single { alias, .. } if alias == "Dict"
    ));
    assert!(matches!(
        &imports[star.0 as usize].kind,
        ImportKind::Star { package, owner: None } if package == "java.io"
    ));
    assert!(matches!(
        &imports[stat.0 as usize].kind,
        ImportKind::StaticSingle { member, alias, .. } if member == "Entry" && alias == "Entry"
    ));
}

#[test]
fn test_builder_members_and_headers() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Box.groovy", Some("p"));
    let method = MethodBuilder::new("get")
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
        .type_param("U", vec![])
        .returns(ty("U"))
        .build();
    let class = builder
        .interface(m, "Box")
        .type_param("T", vec![ty("Comparable")])
        .implements(generic_ty("Iterable", vec![ty("T")]))
        .field(constant_field("LIMIT", ty("int"), Constant::Int(3)))
        .method(method)
        .build();
    let unit = builder.finish();

    let decl = &unit.classes[class];
    assert_eq!(decl.kind, ClassKind::Interface);
    assert!(decl.is_interface());
    assert_eq!(decl.type_params[0].name, "T");
    assert_eq!(decl.interfaces[0].generics.len(), 1);
    assert_eq!(decl.field("LIMIT").and_then(|f| f.constant_value()), Some(&Constant::Int(3)));
    assert!(decl.methods[0].is_static());
    assert_eq!(decl.methods[0].return_type.as_ref().map(|r| r.kind.clone()), Some(RefKind::Plain));
}

#[test]
fn test_dotted_builds_property_chain() {
    let expr = dotted("a.b.C");

    let ExprKind::Property { object, name } = expr.kind else {
        panic!("expected property access");
    };
    assert_eq!(name, "C");
    let ExprKind::Property { object: head, name } = object.kind else {
        panic!("expected nested property access");
    };
    assert_eq!(name, "b");
    assert_eq!(*head, ident("a"));
}

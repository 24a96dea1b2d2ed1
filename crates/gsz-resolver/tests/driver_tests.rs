//! Tests for the resolution driver: traversal, expression rewrites and
//! per-module state.

use gsz_ast::builder::{
    CompileUnitBuilder, MethodBuilder, annotation, call, cast, closure, constant_field, dotted,
    field, generic_ty, ident, int, list, new_instance, param, string, ty, var,
};
use gsz_ast::{
    CatchClause, ClassId, ClassKind, CompileUnit, Constant, Expr, ExprKind, Modifiers, Stmt,
};
use gsz_common::Span;
use gsz_common::diagnostics::diagnostic_codes;
use gsz_resolver::{
    ClassStub, ResolutionDriver, ResolverOptions, StaticTypeIndex, resolve_compile_unit,
};

fn jdk() -> StaticTypeIndex {
    StaticTypeIndex::new()
        .with_class(ClassStub::class("java.lang.String"))
        .with_class(ClassStub::class("java.lang.Integer"))
        .with_class(ClassStub::interface("java.lang.Comparable"))
        .with_class(ClassStub::class("java.util.Collections"))
        .with_class(ClassStub::interface("java.util.List"))
        .with_class(ClassStub::class("java.io.File"))
        .with_class(ClassStub::class("java.io.IOException"))
}

fn body(unit: &CompileUnit, class: ClassId, method: usize) -> &[Stmt] {
    unit.classes[class].methods[method]
        .body
        .as_deref()
        .expect("method has a body")
}

fn expr_of(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Expr(expr) => expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn class_ref_name(unit: &CompileUnit, expr: &Expr) -> Option<String> {
    expr.as_class_ref()
        .and_then(|r| r.resolved_class())
        .map(|id| unit.classes[id].name.clone())
}

#[test]
fn test_identifier_naming_a_type_becomes_class_ref() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    let main = builder
        .class(m, "Main")
        .method(
            MethodBuilder::new("run")
                .param("x", ty("int"))
                .body(vec![Stmt::Expr(call(
                    Some(ident("String")),
                    "valueOf",
                    vec![ident("x")],
                ))])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let ExprKind::Call { receiver, args, .. } = &expr_of(&body(&unit, main, 0)[0]).kind else {
        panic!("expected a call");
    };
    let receiver = receiver.as_deref().unwrap();
    assert_eq!(class_ref_name(&unit, receiver).as_deref(), Some("java.lang.String"));
    assert!(matches!(&args[0].kind, ExprKind::Identifier(name) if name == "x"));
    assert!(unit.classes[main].methods[0].dynamic_variables.is_empty());
}

#[test]
fn test_dotted_chain_rewrites_longest_type_prefix() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    let main = builder
        .class(m, "Main")
        .method(
            MethodBuilder::new("run")
                .body(vec![Stmt::Expr(dotted("java.util.Collections.EMPTY_LIST"))])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let ExprKind::Property { object, name } = &expr_of(&body(&unit, main, 0)[0]).kind else {
        panic!("expected property access on the type");
    };
    assert_eq!(name, "EMPTY_LIST");
    assert_eq!(class_ref_name(&unit, object).as_deref(), Some("java.util.Collections"));
    assert!(unit.classes[main].methods[0].dynamic_variables.is_empty());
}

#[test]
fn test_dynamic_variables_in_first_use_order() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    let main = builder
        .class(m, "Main")
        .field(field("count", ty("int")))
        .method(
            MethodBuilder::new("run")
                .body(vec![
                    Stmt::Expr(call(None, "println", vec![ident("zeta")])),
                    Stmt::Expr(ident("alpha")),
                    var("local", None, Some(int(1))),
                    Stmt::Expr(ident("local")),
                    Stmt::Expr(ident("count")),
                    Stmt::Expr(ident("zeta")),
                    Stmt::Expr(dotted("config.port")),
                    Stmt::Expr(ident("String")),
                    Stmt::Expr(closure(vec![], vec![Stmt::Expr(ident("it"))])),
                ])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(
        unit.classes[main].methods[0].dynamic_variables,
        vec!["zeta", "alpha", "config"]
    );
}

#[test]
fn test_local_variable_shadows_type_name() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    builder.class(m, "Helper").build();
    let main = builder
        .class(m, "Main")
        .method(
            MethodBuilder::new("run")
                .body(vec![
                    var("Helper", None, Some(int(1))),
                    Stmt::Expr(ident("Helper")),
                ])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(matches!(
        &expr_of(&body(&unit, main, 0)[1]).kind,
        ExprKind::Identifier(name) if name == "Helper"
    ));
}

#[test]
fn test_block_scoped_variable_does_not_leak() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    let main = builder
        .class(m, "Main")
        .method(
            MethodBuilder::new("run")
                .body(vec![
                    Stmt::Block(vec![var("inner", None, Some(int(1)))]),
                    Stmt::Expr(ident("inner")),
                ])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert_eq!(unit.classes[main].methods[0].dynamic_variables, vec!["inner"]);
}

#[test]
fn test_body_type_references_are_resolved() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    let main = builder
        .class(m, "Main")
        .method(
            MethodBuilder::new("run")
                .throws(ty("IOException"))
                .body(vec![
                    var(
                        "f",
                        Some(ty("File")),
                        Some(new_instance(ty("File"), vec![string("a.txt")])),
                    ),
                    Stmt::Try {
                        body: vec![Stmt::Expr(cast(ty("Integer"), ident("f")))],
                        catches: vec![CatchClause {
                            param: param("e", ty("IOException")),
                            body: vec![Stmt::Expr(ident("e"))],
                            span: Span::dummy(),
                        }],
                        finally: None,
                    },
                    Stmt::For {
                        var: param("item", ty("String")),
                        iterable: list(vec![string("a")]),
                        body: Box::new(Stmt::Expr(ident("item"))),
                    },
                ])
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let method = &unit.classes[main].methods[0];
    assert!(method.throws[0].is_resolved());
    assert!(method.dynamic_variables.is_empty(), "{:?}", method.dynamic_variables);

    let stmts = body(&unit, main, 0);
    let Stmt::VarDecl { ty: Some(local_ty), init: Some(init), .. } = &stmts[0] else {
        panic!("expected a typed variable");
    };
    assert!(local_ty.is_resolved());
    let ExprKind::New { ty: created, .. } = &init.kind else {
        panic!("expected a constructor call");
    };
    assert_eq!(created.resolved_class(), local_ty.resolved_class());

    let Stmt::Try { body: try_body, catches, .. } = &stmts[1] else {
        panic!("expected a try statement");
    };
    let ExprKind::Cast { ty: target, .. } = &expr_of(&try_body[0]).kind else {
        panic!("expected a cast");
    };
    assert!(target.is_resolved());
    assert!(catches[0].param.ty.is_resolved());
}

#[test]
fn test_annotation_constants_are_folded() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Service.groovy", None);
    builder
        .class(m, "Config")
        .field(constant_field("NAME", ty("String"), Constant::Str("svc".to_string())))
        .field(constant_field("PORT", ty("int"), Constant::Int(8080)))
        .build();
    builder.class(m, "Named").kind(ClassKind::Annotation).build();
    let service = builder
        .class(m, "Service")
        .annotation(annotation(
            ty("Named"),
            vec![
                ("value", dotted("Config.NAME")),
                ("ports", list(vec![dotted("Config.PORT"), int(9090)])),
            ],
        ))
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let annotation = &unit.classes[service].annotations[0];
    assert!(annotation.ty.is_resolved());
    assert_eq!(
        annotation.members[0].1.kind,
        ExprKind::Constant(Constant::Str("svc".to_string()))
    );
    let ExprKind::List(ports) = &annotation.members[1].1.kind else {
        panic!("expected a list");
    };
    assert_eq!(ports[0].kind, ExprKind::Constant(Constant::Int(8080)));
    assert_eq!(ports[1].kind, ExprKind::Constant(Constant::Int(9090)));
}

#[test]
fn test_annotation_folding_can_be_disabled() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Service.groovy", None);
    builder
        .class(m, "Config")
        .field(constant_field("NAME", ty("String"), Constant::Str("svc".to_string())))
        .build();
    builder.class(m, "Named").kind(ClassKind::Annotation).build();
    let service = builder
        .class(m, "Service")
        .annotation(annotation(ty("Named"), vec![("value", dotted("Config.NAME"))]))
        .build();
    let mut unit = builder.finish();
    let options = ResolverOptions {
        fold_annotation_constants: false,
        ..ResolverOptions::default()
    };

    resolve_compile_unit(&mut unit, &jdk(), options);

    let value = &unit.classes[service].annotations[0].members[0].1;
    let ExprKind::Property { object, name } = &value.kind else {
        panic!("expected the property access to stay");
    };
    assert_eq!(name, "NAME");
    assert_eq!(class_ref_name(&unit, object).as_deref(), Some("Config"));
}

#[test]
fn test_static_methods_do_not_see_class_type_parameters() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Box.groovy", None);
    builder.class(m, "T").build();
    let boxed = builder
        .class(m, "Box")
        .type_param("T", vec![])
        .field(field("value", ty("T")))
        .method(MethodBuilder::new("get").returns(ty("T")).build())
        .method(
            MethodBuilder::new("of")
                .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
                .type_param("U", vec![])
                .param("value", ty("U"))
                .returns(ty("Missing"))
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    let decl = &unit.classes[boxed];
    assert_eq!(decl.fields[0].ty.resolved_class(), Some(ClassId::OBJECT));
    assert!(decl.fields[0].ty.generics_placeholder, "T binds to its bound, not to class T");
    assert!(decl.methods[0].return_type.as_ref().unwrap().generics_placeholder);
    assert!(decl.methods[1].params[0].ty.generics_placeholder);
    assert_eq!(
        report.diagnostics.iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![diagnostic_codes::UNABLE_TO_RESOLVE_TYPE]
    );
}

#[test]
fn test_static_method_type_reference_falls_back_to_declared_type() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Box.groovy", None);
    let t = builder.class(m, "T").build();
    let boxed = builder
        .class(m, "Box")
        .type_param("T", vec![])
        .method(
            MethodBuilder::new("make")
                .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
                .returns(ty("T"))
                .build(),
        )
        .build();
    let mut unit = builder.finish();

    resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    let returned = unit.classes[boxed].methods[0].return_type.as_ref().unwrap();
    assert_eq!(returned.resolved_class(), Some(t));
    assert!(!returned.generics_placeholder);
}

#[test]
fn test_type_parameter_bound_may_mention_itself() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Sorted.groovy", None);
    let sorted = builder
        .class(m, "Sorted")
        .type_param("T", vec![generic_ty("Comparable", vec![ty("T")])])
        .field(field("first", ty("T")))
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let comparable = unit.classes.lookup_known("java.lang.Comparable").unwrap();
    assert_eq!(unit.classes[sorted].fields[0].ty.resolved_class(), Some(comparable));
}

#[test]
fn test_static_nested_class_does_not_see_outer_type_parameters() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Outer.groovy", None);
    let outer = builder.class(m, "Outer").type_param("T", vec![]).build();
    let inner = builder
        .nested(outer, "Inner")
        .field(field("value", ty("T")))
        .build();
    let nested = builder
        .nested(outer, "Nested")
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
        .field(field("value", ty("T")))
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    assert!(unit.classes[inner].fields[0].ty.generics_placeholder);
    assert!(unit.classes[nested].fields[0].ty.is_erroneous());
    assert_eq!(report.diagnostics.len(), 1, "{:?}", report.diagnostics);
}

#[test]
fn test_resolve_module_twice_is_a_no_op() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    builder.import(m, "nope.Missing");
    builder.import(m, "java.util.List");
    builder
        .class(m, "Main")
        .field(field("items", ty("List")))
        .field(field("broken", ty("Broken")))
        .build();
    let mut unit = builder.finish();
    let external = jdk();

    let mut driver = ResolutionDriver::new(&mut unit, &external);
    driver.resolve_module(m);
    let after_first = driver.diagnostics().to_vec();
    driver.resolve_module(m);
    let report = driver.finish();

    assert_eq!(after_first.len(), 2, "{after_first:?}");
    assert_eq!(report.diagnostics, after_first);
    assert!(unit.module(m).imports_resolved);
}

fn build_mixed_unit() -> CompileUnit {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Mixed.groovy", Some("app"));
    builder.star_import(m, "alpha");
    builder.star_import(m, "beta");
    builder.import(m, "nope.Gone");
    builder
        .class(m, "Mixed")
        .extends(ty("Base"))
        .field(field("w", ty("Widget")))
        .field(field("x", ty("Unknown")))
        .build();
    builder.class(m, "Base").extends(ty("Mixed")).build();
    builder.finish()
}

#[test]
fn test_diagnostics_are_deterministic() {
    // set GSZ_LOG to trace the cascade while debugging this test
    gsz_resolver::tracing_config::init_tracing();
    let external = jdk()
        .with_class(ClassStub::class("alpha.Widget"))
        .with_class(ClassStub::class("beta.Widget"));

    let mut first = build_mixed_unit();
    let mut second = build_mixed_unit();
    let a = resolve_compile_unit(&mut first, &external, ResolverOptions::default());
    let b = resolve_compile_unit(&mut second, &external, ResolverOptions::default());

    assert_eq!(a.diagnostics.len(), 4, "{:?}", a.diagnostics);
    assert_eq!(a.diagnostics, b.diagnostics);
    assert_eq!(
        a.diagnostics.iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![
            diagnostic_codes::UNABLE_TO_RESOLVE_IMPORT,
            diagnostic_codes::CYCLIC_INHERITANCE_IN_CLASS,
            diagnostic_codes::AMBIGUOUS_REFERENCE,
            diagnostic_codes::UNABLE_TO_RESOLVE_TYPE,
        ]
    );
}

/// `Sub extends Base extends Root`, each in its own module; `Root` declares
/// `Deep` and `Shape`. `Sub` names both without qualification.
fn inherited_nested_unit(sub_first: bool) -> (CompileUnit, ClassId, ClassId, ClassId) {
    let mut builder = CompileUnitBuilder::new();
    let declare_sub = |builder: &mut CompileUnitBuilder| {
        let m = builder.module("Sub.groovy", Some("app"));
        builder
            .class(m, "Sub")
            .extends(ty("Base"))
            .implements(ty("Shape"))
            .field(field("d", ty("Deep")))
            .build()
    };
    let sub = if sub_first { Some(declare_sub(&mut builder)) } else { None };

    let base_module = builder.module("Base.groovy", Some("app"));
    builder.class(base_module, "Base").extends(ty("Root")).build();
    let root_module = builder.module("Root.groovy", Some("app"));
    let root = builder.class(root_module, "Root").build();
    let deep = builder
        .nested(root, "Deep")
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
        .build();
    let shape = builder
        .nested(root, "Shape")
        .kind(ClassKind::Interface)
        .build();

    let sub = match sub {
        Some(sub) => sub,
        None => declare_sub(&mut builder),
    };
    (builder.finish(), sub, deep, shape)
}

#[test]
fn test_inherited_nested_types_do_not_depend_on_module_order() {
    for sub_first in [true, false] {
        let (mut unit, sub, deep, shape) = inherited_nested_unit(sub_first);

        let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

        assert!(
            report.diagnostics.is_empty(),
            "sub_first={sub_first}: {:?}",
            report.diagnostics
        );
        let decl = &unit.classes[sub];
        assert_eq!(decl.fields[0].ty.resolved_class(), Some(deep), "sub_first={sub_first}");
        assert_eq!(decl.interfaces[0].resolved_class(), Some(shape), "sub_first={sub_first}");
    }
}

#[test]
fn test_unresolved_supertype_reported_once_across_header_sweeps() {
    let mut builder = CompileUnitBuilder::new();
    let m = builder.module("Main.groovy", None);
    builder
        .class(m, "Main")
        .extends(ty("Missing"))
        .implements(generic_ty("Absent", vec![ty("Gone")]))
        .build();
    let mut unit = builder.finish();

    let report = resolve_compile_unit(&mut unit, &jdk(), ResolverOptions::default());

    let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message_text.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "unable to resolve type Gone",
            "unable to resolve type Missing",
            "unable to resolve type Absent",
        ]
    );
}

use super::*;
use gsz_ast::ClassId;
use gsz_common::Span;

fn plain(name: &str) -> TypeReference {
    TypeReference::new(name, Span::dummy())
}

#[test]
fn test_lowercase_bare_names_are_vanilla() {
    let options = ResolverOptions::default();

    assert_eq!(classify(&plain("widget"), &options), RefKind::LowercaseVanilla);
    assert_eq!(classify(&plain("Widget"), &options), RefKind::Plain);
    assert_eq!(classify(&plain("java.util.List"), &options), RefKind::Plain);
    assert_eq!(classify(&plain("outer$inner"), &options), RefKind::Plain);
}

#[test]
fn test_primitives_are_never_vanilla() {
    let options = ResolverOptions::default();

    for name in ["int", "boolean", "void", "double"] {
        assert!(is_primitive_type_name(name));
        assert_eq!(classify(&plain(name), &options), RefKind::Plain, "{name}");
    }
}

#[test]
fn test_policy_switch_disables_vanilla() {
    let options = ResolverOptions {
        lowercase_vanilla_policy: false,
        ..ResolverOptions::default()
    };

    assert_eq!(classify(&plain("widget"), &options), RefKind::Plain);
}

#[test]
fn test_internal_kinds_are_kept() {
    let options = ResolverOptions::default();
    let nested = TypeReference::nested_of(ClassId(3), "inner", Span::dummy());
    let qualified = TypeReference::package_qualified("java.util.", "map", Span::dummy());

    assert_eq!(classify(&nested, &options), RefKind::NestedOf(ClassId(3)));
    assert!(matches!(
        classify(&qualified, &options),
        RefKind::PackageQualified { .. }
    ));
}

use super::*;

#[test]
fn test_defaults_cover_groovy_packages() {
    let options = ResolverOptions::default();

    assert_eq!(options.default_imports.len(), DEFAULT_IMPORTS.len());
    assert!(options.default_imports.iter().all(|p| p.ends_with('.')));
    assert!(options.lowercase_vanilla_policy);
    assert!(
        options
            .implicit_types
            .iter()
            .any(|(simple, full)| simple == "BigDecimal" && full == "java.math.BigDecimal")
    );
}

#[test]
fn test_from_json_keeps_missing_keys_and_normalizes_prefixes() {
    let options = ResolverOptions::from_json(
        r#"{ "defaultImports": ["java.lang", "com.acme."], "lowercaseVanillaPolicy": false }"#,
    )
    .unwrap();

    assert_eq!(options.default_imports, vec!["java.lang.", "com.acme."]);
    assert!(!options.lowercase_vanilla_policy);
    assert!(options.fold_annotation_constants);
    assert!(options.report_ambiguity);
}

#[test]
fn test_from_json_rejects_wrong_types() {
    assert!(ResolverOptions::from_json(r#"{ "reportAmbiguity": "yes" }"#).is_err());
}

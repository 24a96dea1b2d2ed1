use gsz_common::Span;
use gsz_common::diagnostics::{
    DiagnosticCategory, Diagnostic, diagnostic_codes, diagnostic_messages, format_message,
    get_message_template,
};

#[test]
fn test_format_message_fills_placeholders_in_order() {
    let text = format_message(
        "reference to {0} is ambiguous, both {1} and {2} match",
        &["Widget", "a.Widget", "b.Widget"],
    );
    assert_eq!(
        text,
        "reference to Widget is ambiguous, both a.Widget and b.Widget match"
    );
}

#[test]
fn test_message_table_covers_every_code() {
    for code in [
        diagnostic_codes::UNABLE_TO_RESOLVE_TYPE,
        diagnostic_codes::AMBIGUOUS_REFERENCE,
        diagnostic_codes::CYCLIC_INHERITANCE_IN_CLASS,
        diagnostic_codes::CYCLIC_INHERITANCE_IN_INTERFACE,
        diagnostic_codes::TYPE_CANNOT_IMPLEMENT_ITSELF,
        diagnostic_codes::RESOLUTION_TOO_DEEP,
        diagnostic_codes::UNABLE_TO_RESOLVE_IMPORT,
    ] {
        assert!(
            get_message_template(code).is_some(),
            "missing template for {code}"
        );
    }
    assert!(get_message_template(1).is_none());
}

#[test]
fn test_from_message_anchors_at_span() {
    let diag = Diagnostic::from_message(
        "Main.groovy",
        Span::new(10, 14),
        &diagnostic_messages::UNABLE_TO_RESOLVE_TYPE,
        &["Fooo"],
    );
    assert_eq!(diag.start, 10);
    assert_eq!(diag.length, 4);
    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert_eq!(diag.message_text, "unable to resolve type Fooo");
}

#[test]
fn test_json_skips_empty_related_information() {
    let diag = Diagnostic::from_message(
        "A.groovy",
        Span::at(0, 1),
        &diagnostic_messages::UNABLE_TO_RESOLVE_TYPE,
        &["X"],
    );
    let json = diag.to_json();
    assert!(json.get("related_information").is_none());

    let diag = diag.with_related("A.groovy".into(), 3, 2, "see import".into());
    let json = diag.to_json();
    assert_eq!(json["related_information"][0]["start"], 3);
}

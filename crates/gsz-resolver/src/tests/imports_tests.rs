use super::*;

#[test]
fn test_full_alias_match() {
    let mut table = ImportTable::new();
    table.add_single("List", ImportId(0), ClassId(40), Span::dummy());

    let hit = table.lookup_alias("List", None).unwrap();
    assert_eq!(hit.target, AliasTarget::Type(ClassId(40)));
    assert_eq!(hit.consumed, 4);
    assert_eq!(hit.remainder, None);
}

#[test]
fn test_partial_match_walks_right_to_left() {
    let mut table = ImportTable::new();
    table.add_single("Map", ImportId(0), ClassId(41), Span::dummy());

    let hit = table.lookup_alias("Map.Entry.Deep", None).unwrap();
    assert_eq!(hit.consumed, 3);
    assert_eq!(hit.remainder.as_deref(), Some("Entry.Deep"));
    assert!(table.lookup_alias("Mapper", None).is_none());
}

#[test]
fn test_single_alias_is_preferred_over_static_alias() {
    let mut table = ImportTable::new();
    table.add_static("Entry", ImportId(0), ClassId(41), "Entry", Span::dummy());
    table.add_single("Entry", ImportId(1), ClassId(42), Span::dummy());

    let hit = table.lookup_alias("Entry", None).unwrap();
    assert_eq!(hit.import, ImportId(1));

    let without_single = table.lookup_alias("Entry", Some(ImportId(1))).unwrap();
    assert_eq!(
        without_single.target,
        AliasTarget::StaticMember {
            owner: ClassId(41),
            member: "Entry".to_string()
        }
    );
}

#[test]
fn test_excluded_import_does_not_alias_itself() {
    let mut table = ImportTable::new();
    table.add_single("Foo", ImportId(3), ClassId(50), Span::dummy());

    assert!(table.lookup_alias("Foo", Some(ImportId(3))).is_none());
}

#[test]
fn test_first_alias_wins_and_stars_keep_order() {
    let mut table = ImportTable::new();
    table.add_single("Date", ImportId(0), ClassId(60), Span::dummy());
    table.add_single("Date", ImportId(1), ClassId(61), Span::dummy());
    table.add_star(ImportId(2), "a.b", None, Span::at(30, 10));
    table.add_star(ImportId(3), "c.", None, Span::at(45, 9));

    assert_eq!(
        table.lookup_alias("Date", None).map(|m| m.target),
        Some(AliasTarget::Type(ClassId(60)))
    );
    let prefixes: Vec<_> = table.stars().iter().map(|s| s.prefix.as_str()).collect();
    assert_eq!(prefixes, vec!["a.b.", "c."]);
    assert_eq!(table.import_span(ImportId(3)), Some(Span::at(45, 9)));
}

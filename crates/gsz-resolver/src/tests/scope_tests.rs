use super::*;

#[test]
fn test_inner_frames_shadow_and_pop() {
    let mut scope = ScopeStack::new();
    scope.declare("a");
    scope.push();
    scope.declare("b");

    assert!(scope.is_declared("a"));
    assert!(scope.is_declared("b"));

    scope.pop();
    assert!(scope.is_declared("a"));
    assert!(!scope.is_declared("b"));
}

#[test]
fn test_dynamic_variables_keep_first_use_order() {
    let mut scope = ScopeStack::new();
    scope.note_reference("zeta");
    scope.note_reference("alpha");
    scope.note_reference("zeta");
    scope.note_reference("Helper");
    scope.forget_reference("alpha");

    assert_eq!(scope.into_dynamic_variables(), vec!["zeta", "Helper"]);
}

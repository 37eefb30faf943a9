//! Integration tests for the schema linter

mod common;

use common::fixture;
use idlforge::linter::{has_warnings, lint_file, LintSeverity};

#[test]
fn test_clean_fixture() {
    let issues = lint_file(fixture("user_service.yaml")).unwrap();
    assert!(issues.is_empty(), "Found: {:?}", issues);
}

#[test]
fn test_unresolved_types_fixture() {
    let issues = lint_file(fixture("unresolved_types.yaml")).unwrap();

    let unresolved: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == "unresolved_type")
        .map(|i| i.location.as_str())
        .collect();
    assert_eq!(unresolved, vec!["Cart.items", "Checkout.Pay"]);
    assert!(has_warnings(&issues));

    let empty: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == "empty_message")
        .collect();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].location, "Placeholder");
    assert_eq!(empty[0].severity, LintSeverity::Info);
}

#[test]
fn test_invalid_fixture_fails_to_load() {
    assert!(lint_file(fixture("missing_field_type.yaml")).is_err());
}

use super::*;
use crate::analyzer::{DeclKind, ResolveError, ScopeGraph};
use codes::{E0000_UNRECOGNIZED_CHAR, W0200_MALFORMED_ANNOTATION};

#[test]
fn test_duplicate_declaration_points_at_both_declarations() {
    let diagnostic = Diagnostic::from(ResolveError::DuplicateDeclaration {
        name: "a".to_string(),
        kind: DeclKind::Variable,
        span: 20..21,
        original_span: 4..5,
    });
    assert_eq!(diagnostic.code(), "E0200");
    assert_eq!(diagnostic.level(), DiagnosticLevel::Error);
    let spans: Vec<Span> = diagnostic.labels().iter().map(|label| label.span.clone()).collect();
    assert_eq!(spans, vec![20..21, 4..5]);
    assert!(diagnostic.notes().is_empty());
}

#[test]
fn test_detached_scope_carries_a_note() {
    let scope = ScopeGraph::new().global();
    let diagnostic = Diagnostic::from(ResolveError::DetachedScope { scope });
    assert_eq!(diagnostic.code(), "E0203");
    assert_eq!(diagnostic.notes().len(), 1);
    assert!(diagnostic.message().contains("does not reach the global scope"));
}

#[test]
fn test_bag_counts_by_level() {
    let mut bag = DiagnosticBag::new("int x;");
    assert!(bag.is_empty());
    bag.report(Diagnostic::error(&E0000_UNRECOGNIZED_CHAR, Label::new(0..1, "here")));
    bag.report(
        Diagnostic::warning(&W0200_MALFORMED_ANNOTATION, Label::new(2..3, "here")).with_note("ignored"),
    );
    assert_eq!(bag.len(), 2);
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.warning_count(), 1);
    assert!(bag.has_errors());
    assert_eq!(bag.iter().last().unwrap().notes(), ["ignored".to_string()]);
}

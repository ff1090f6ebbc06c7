use super::LineIndex;

#[test]
fn test_line_of_offsets() {
    let index = LineIndex::new("ab\ncd\n\nef");
    assert_eq!(index.line_of(0), 1);
    assert_eq!(index.line_of(2), 1);
    assert_eq!(index.line_of(3), 2);
    assert_eq!(index.line_of(6), 3);
    assert_eq!(index.line_of(7), 4);
    assert_eq!(index.line_count(), 4);
}

#[test]
fn test_empty_source_has_one_line() {
    let index = LineIndex::new("");
    assert_eq!(index.line_count(), 1);
    assert_eq!(index.line_of(0), 1);
}

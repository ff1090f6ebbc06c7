use super::*;
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;
use crate::parser::parse;
use crate::utils::LineIndex;

fn lower_source(src: &str) -> Vec<Event> {
    let mut diagnostics = DiagnosticBag::new(src);
    let tokens = lex(src, &mut diagnostics);
    let unit = parse(src.len(), tokens, &mut diagnostics).expect("source should parse");
    lower(&unit, &LineIndex::new(src))
}

fn declaration(event: &Event) -> &DeclarationEvent {
    match event {
        Event::Declaration(decl) => decl,
        other => panic!("expected declaration event, got {:?}", other),
    }
}

#[test]
fn test_namespace_and_class_events_are_balanced() {
    let events = lower_source("namespace n1 {\n double z1;\n class C { int c_x; };\n}\n");
    assert_eq!(events.len(), 6);
    let ns = declaration(&events[0]);
    assert_eq!(ns.kind, DeclarationKind::Namespace);
    assert!(ns.has_body);
    assert_eq!(declaration(&events[1]).name, "z1");
    assert_eq!(declaration(&events[1]).line, 2);
    assert_eq!(declaration(&events[2]).kind, DeclarationKind::Class);
    assert_eq!(declaration(&events[3]).name, "c_x");
    assert_eq!(events[4], Event::End);
    assert_eq!(events[5], Event::End);
}

#[test]
fn test_forward_declarations_have_no_end() {
    let events = lower_source("class C;\nvoid f(int a, int);\n");
    assert_eq!(events.len(), 2);
    assert!(!declaration(&events[0]).has_body);
    let f = declaration(&events[1]);
    assert!(!f.has_body);
    assert_eq!(f.param_count, 2);
    assert_eq!(f.params.len(), 1);
    assert_eq!(f.params[0].name, "a");
}

#[test]
fn test_comment_lines_and_reads() {
    let src = "int main() {\n    /// x: m\n    double x;\n\n    /// z: cm\n    double z = x;\n}\n";
    let events = lower_source(src);
    let Event::Comment(first) = &events[1] else {
        panic!("expected comment, got {:?}", events[1]);
    };
    assert_eq!(first.text, "/// x: m");
    assert_eq!(first.line, 2);
    let Event::Comment(second) = &events[3] else {
        panic!("expected comment, got {:?}", events[3]);
    };
    assert_eq!(second.line, 5);
    let z = declaration(&events[4]);
    assert_eq!(z.name, "z");
    assert_eq!(z.reads, vec!["x".to_string()]);
    assert_eq!(events.last(), Some(&Event::End));
}

#[test]
fn test_out_of_line_definition_keeps_qualifier_and_headers() {
    let events = lower_source(
        "template <typename T>\ntemplate <typename U>\nvoid C1<T>::c1m() {\n    int my_val;\n}\n",
    );
    let def = declaration(&events[0]);
    assert_eq!(def.name, "c1m");
    assert_eq!(def.qualifier, vec!["C1".to_string()]);
    assert_eq!(def.template_names(), vec![vec!["T".to_string()], vec!["U".to_string()]]);
    assert!(def.has_body);
    assert_eq!(declaration(&events[1]).name, "my_val");
    assert_eq!(events[2], Event::End);
}

#[test]
fn test_loop_body_becomes_a_block() {
    let src = "int power(int n, int p) {\n    int result = 1;\n    while (p--)\n        result *= n;\n    return result;\n}\n";
    let events = lower_source(src);
    // power, result, Block, End(block), End(power)
    assert_eq!(events.len(), 5);
    assert!(matches!(events[2], Event::Block { .. }));
    assert_eq!(events[3], Event::End);
    assert_eq!(declaration(&events[0]).params.len(), 2);
}

#[test]
fn test_nested_block_statement() {
    let events = lower_source("void f() {\n    int a;\n    {\n        int a;\n    }\n}\n");
    assert_eq!(events.len(), 6);
    assert!(matches!(events[2], Event::Block { .. }));
    assert_eq!(declaration(&events[3]).name, "a");
}

#[test]
fn test_comments_inside_declarators_precede_the_declaration() {
    let src = "template <typename T>\n/// frame(T) = (template-param, Box)\nclass Box { T value; };\nint power(\n    /// frame(p) = (local, _)\n    int p,\n    /// frame(n) = (local, _)\n    int n\n) { return n; }\n";
    let events = lower_source(src);
    let Event::Comment(on_class) = &events[0] else {
        panic!("expected comment, got {:?}", events[0]);
    };
    assert_eq!(on_class.line, 2);
    assert_eq!(declaration(&events[1]).name, "Box");

    // Box, value, End 之后是两条参数注释，按源代码顺序
    let lines: Vec<usize> = events[4..6]
        .iter()
        .map(|event| match event {
            Event::Comment(comment) => comment.line,
            other => panic!("expected comment, got {:?}", other),
        })
        .collect();
    assert_eq!(lines, vec![5, 7]);
    assert_eq!(declaration(&events[6]).name, "power");
}

use super::ast::*;
use super::parse;
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;

fn parse_ok(src: &str) -> TranslationUnit {
    let mut diagnostics = DiagnosticBag::new(src);
    let tokens = lex(src, &mut diagnostics);
    let unit = parse(src.len(), tokens, &mut diagnostics);
    assert!(
        !diagnostics.has_errors(),
        "unexpected diagnostics: {:?}",
        diagnostics.iter().map(|d| d.message().to_string()).collect::<Vec<_>>()
    );
    unit.expect("parser should produce a unit when there are no errors")
}

fn parse_err(src: &str) -> DiagnosticBag {
    let mut diagnostics = DiagnosticBag::new(src);
    let tokens = lex(src, &mut diagnostics);
    let unit = parse(src.len(), tokens, &mut diagnostics);
    assert!(unit.is_none(), "parse succeeded unexpectedly for:\n{}", src);
    diagnostics
}

#[test]
fn test_namespace_with_variable_and_class() {
    let unit = parse_ok(
        r#"
        namespace n1 {
            double z1;
            class C {
                void cm() {}
                int c_x;
            };
        }
        "#,
    );
    assert_eq!(unit.items.len(), 1);
    let Item::Namespace(ns) = &unit.items[0] else {
        panic!("expected namespace, got {:?}", unit.items[0]);
    };
    assert_eq!(ns.name.name, "n1");
    assert!(matches!(&ns.items[0], Item::Variable(v) if v.name.name == "z1"));
    let Item::Class(class) = &ns.items[1] else {
        panic!("expected class");
    };
    let members = class.body.as_ref().expect("class has a body");
    assert!(matches!(&members[0], Item::Function(f) if f.name.last().name == "cm" && f.body.is_some()));
    assert!(matches!(&members[1], Item::Variable(v) if v.name.name == "c_x"));
}

#[test]
fn test_template_class_with_member_template() {
    let unit = parse_ok(
        r#"
        template <typename T>
        class C1 {
            template <typename U>
            void c1m();
            int c1_x;
        };
        "#,
    );
    let Item::Class(class) = &unit.items[0] else {
        panic!("expected class");
    };
    assert_eq!(class.templates.len(), 1);
    assert_eq!(class.templates[0].params[0].name, "T");
    let members = class.body.as_ref().unwrap();
    let Item::Function(method) = &members[0] else {
        panic!("expected method declaration");
    };
    assert_eq!(method.templates[0].params[0].name, "U");
    assert!(method.body.is_none());
}

#[test]
fn test_out_of_line_template_definition() {
    let unit = parse_ok(
        r#"
        template <typename T>
        template <typename U>
        void C1<T>::c1m() {
            int my_val;
        }
        "#,
    );
    let Item::Function(def) = &unit.items[0] else {
        panic!("expected function");
    };
    assert_eq!(def.templates.len(), 2);
    assert!(def.name.is_qualified());
    assert_eq!(def.name.to_path(), "C1::c1m");
    assert_eq!(def.name.segments[0].template_args.len(), 1);
    let body = def.body.as_ref().unwrap();
    assert!(matches!(&body.stmts[0], Statement::VarDecl(v) if v.name.name == "my_val"));
}

#[test]
fn test_doc_comments_are_kept_in_order() {
    let unit = parse_ok(
        r#"
        int main() {
            /// x: m
            double x;

            /// z: cm
            double z = x;
        }
        "#,
    );
    let Item::Function(main) = &unit.items[0] else {
        panic!("expected main");
    };
    let stmts = &main.body.as_ref().unwrap().stmts;
    assert_eq!(stmts.len(), 4);
    assert!(matches!(&stmts[0], Statement::DocComment(c) if c.text == "/// x: m"));
    assert!(matches!(&stmts[1], Statement::VarDecl(v) if v.name.name == "x" && v.init.is_none()));
    assert!(matches!(&stmts[2], Statement::DocComment(c) if c.text == "/// z: cm"));
    let Statement::VarDecl(z) = &stmts[3] else {
        panic!("expected z");
    };
    let mut reads = Vec::new();
    z.init.as_ref().unwrap().collect_reads(&mut reads);
    assert_eq!(reads, vec!["x".to_string()]);
}

#[test]
fn test_statements_and_expressions() {
    let unit = parse_ok(
        r#"
        int power(int n, int p) {
            int result = 1;
            while (p--)
                result *= n;
            if (n > 0) { return result; } else return 0;
        }
        "#,
    );
    let Item::Function(power) = &unit.items[0] else {
        panic!("expected function");
    };
    assert_eq!(power.params.len(), 2);
    assert_eq!(power.params[1].name.as_ref().unwrap().name, "p");
    let stmts = &power.body.as_ref().unwrap().stmts;
    assert!(matches!(&stmts[1], Statement::While { .. }));
    assert!(matches!(&stmts[2], Statement::If { else_branch: Some(_), .. }));
}

#[test]
fn test_initializer_reads_calls_and_qualified_names() {
    let unit = parse_ok("int a = f(b, n1::c) + obj.field - -d;");
    let Item::Variable(a) = &unit.items[0] else {
        panic!("expected variable");
    };
    let mut reads = Vec::new();
    a.init.as_ref().unwrap().collect_reads(&mut reads);
    assert_eq!(reads, vec!["f", "b", "n1::c", "obj", "d"]);
}

#[test]
fn test_forward_declared_class_and_access_specifiers() {
    let unit = parse_ok(
        r#"
        class Fwd;
        struct S {
        public:
            S(int v);
            int v;
        private:
            int hidden;
        };
        "#,
    );
    assert!(matches!(&unit.items[0], Item::Class(c) if c.body.is_none()));
    let Item::Class(s) = &unit.items[1] else {
        panic!("expected struct");
    };
    let members = s.body.as_ref().unwrap();
    assert_eq!(members.len(), 3);
    assert!(matches!(&members[0], Item::Function(f) if f.return_type.is_none()));
}

#[test]
fn test_syntax_error_is_reported() {
    let diagnostics = parse_err("namespace { int x; }");
    assert!(diagnostics.has_errors());
    assert!(diagnostics.iter().all(|d| d.code() == "E0100"));
}

#[test]
fn test_syntax_error_uses_source_spelling() {
    let diagnostics = parse_err("namespace { int x; }");
    let message = diagnostics.iter().next().unwrap().message().to_string();
    assert!(message.contains("found `{`"), "{}", message);
    for variant in ["LBrace", "Class", "Namespace", "''"] {
        assert!(!message.contains(variant), "{}", message);
    }
}

#[test]
fn test_doc_comment_between_template_header_and_class() {
    let unit = parse_ok(
        r#"
        template <typename T>
        /// frame(T) = (template-param, Box)
        class Box { T value; };
        "#,
    );
    let Item::Class(class) = &unit.items[0] else {
        panic!("expected class, got {:?}", unit.items[0]);
    };
    assert_eq!(class.templates.len(), 1);
    assert_eq!(class.docs.len(), 1);
    assert_eq!(class.docs[0].text, "/// frame(T) = (template-param, Box)");
}

#[test]
fn test_doc_comments_inside_parameter_list() {
    let unit = parse_ok(
        r#"
        int power(
            /// frame(n) = (local, _)
            int n,
            int p
            /// frame(p) = (local, _)
        ) { return n; }
        "#,
    );
    let Item::Function(power) = &unit.items[0] else {
        panic!("expected function");
    };
    assert_eq!(power.params.len(), 2);
    assert_eq!(power.params[0].docs.len(), 1);
    assert!(power.params[1].docs.is_empty());
    // 参数表末尾的注释挂在函数上
    assert_eq!(power.docs.len(), 1);
    assert_eq!(power.docs[0].text, "/// frame(p) = (local, _)");
}

#[test]
fn test_doc_comment_before_access_specifier() {
    let unit = parse_ok(
        r#"
        struct S {
            /// frame(v) = (member, S)
        public:
            int v;
        };
        "#,
    );
    let Item::Class(s) = &unit.items[0] else {
        panic!("expected struct");
    };
    let members = s.body.as_ref().unwrap();
    assert!(matches!(&members[0], Item::DocComment(c) if c.text == "/// frame(v) = (member, S)"));
    assert!(matches!(members.last(), Some(Item::Variable(v)) if v.name.name == "v"));
}

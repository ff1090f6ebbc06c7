use super::*;
use crate::analyzer::Analyzer;
use crate::builder;
use crate::config::ResolverConfig;
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;
use crate::parser::parse;
use crate::utils::LineIndex;

fn resolve(src: &str) -> Resolution {
    let mut diagnostics = DiagnosticBag::new(src);
    let tokens = lex(src, &mut diagnostics);
    let unit = parse(src.len(), tokens, &mut diagnostics).expect("source should parse");
    let events = builder::lower(&unit, &LineIndex::new(src));
    Analyzer::new(ResolverConfig::default())
        .run(&events)
        .expect("analysis should succeed")
}

#[test]
fn test_emit_note_and_assertion() {
    let resolution = resolve("int main() {\n    /// x: m\n    /// frame(x) = (local, _)\n    double x;\n}\n");
    let lines: Vec<String> = resolution
        .bindings
        .iter()
        .map(|b| emit(&b.binding, &b.frame))
        .collect();
    assert_eq!(lines, vec!["2: x: m => (local, _)", "3: frame(x) => (local, _)"]);
}

#[test]
fn test_emit_uses_global_sentinel() {
    let resolution = resolve("/// g: counter\nint g;\n");
    let b = &resolution.bindings[0];
    assert_eq!(emit(&b.binding, &b.frame), "1: g: counter => (global, ::)");
}

#[test]
fn test_render_appends_details() {
    let src = "namespace n1 {\n    class C {\n        void cm() {}\n    };\n}\nint main() {\n    /// z: cm\n    /// frame(z) = (global, _)\n    double z;\n    /// y: nowhere\n    double y;\n}\n";
    let resolution = resolve(src);
    assert_eq!(
        render(&resolution),
        vec![
            "7: z: cm => (local, _) [decl main::z] [ref n1::C::cm]",
            "8: frame(z) => (local, _) [decl main::z] [mismatch: expected (global, _)]",
            "10: y: nowhere => (local, _) [decl main::y] [ref unresolved]",
        ]
    );
}

#[test]
fn test_render_unit_reference() {
    let resolution = resolve("int main() {\n    /// v: m/s\n    double v;\n}\n");
    assert_eq!(
        render(&resolution),
        vec!["2: v: m/s => (local, _) [decl main::v] [unit s^-1 m]"]
    );
}

#[test]
fn test_render_checked_assertion_and_free_text() {
    let resolution = resolve("/// frame(v) = (global, ::)\n/// v: the answer\nint v = 42;\n");
    assert_eq!(
        render(&resolution),
        vec![
            "1: frame(v) => (global, ::) [decl v] [ok]",
            "2: v: the answer => (global, ::) [decl v]",
        ]
    );
}

#[test]
fn test_dump_scopes_follows_the_tree() {
    let resolution = resolve(
        "namespace n1 {\n    double z1;\n    class C {\n        void cm() { int v; }\n        int c_x;\n    };\n}\nint main() {}\n",
    );
    assert_eq!(
        dump_scopes(&resolution.graph),
        vec![
            "global: n1, main",
            "  namespace n1: z1, C",
            "    class n1::C: cm, c_x",
            "      function-local n1::C::cm: v",
            "  function-local main",
        ]
    );
}

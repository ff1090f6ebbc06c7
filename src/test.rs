use crate::analyze;
use crate::config::{NamespacePolicy, ResolverConfig};
use crate::diagnostics::DiagnosticBag;
use crate::reporter::render;

const FIXTURE: &str = r#"namespace n1 {
    double z1;

    class C {
        void cm() {}

        int c_x;
    };

    template <typename T>
    class C1 {
        template <typename U>
        void c1m();
        int c1_x;
    };

    template <typename T>
    template <typename U>
    void C1<T>::c1m() {
        /// frame(my_val) = (local, _)
        int my_val;
    }
}

// MyComment
int main() {
    /// x: m
    double x;

    /// z: cm
    /// frame(z) = (local, _)
    double z = x;
}
"#;

#[test]
fn test_fixture_end_to_end() {
    let mut diagnostics = DiagnosticBag::new(FIXTURE);
    let resolution = analyze(FIXTURE, &ResolverConfig::default(), &mut diagnostics).expect("fixture analyzes");

    assert_eq!(
        render(&resolution),
        vec![
            "20: frame(my_val) => (local, _) [decl n1::C1::c1m::my_val] [ok]",
            "27: x: m => (local, _) [decl main::x] [unit m]",
            "30: z: cm => (local, _) [decl main::z] [ref n1::C::cm]",
            "31: frame(z) => (local, _) [decl main::z] [ok]",
        ]
    );

    // `m` 是单位而不是缺失的符号
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics.iter().map(|d| d.code()).collect::<Vec<_>>());
    assert!(resolution.errors.is_empty(), "{:?}", resolution.errors);
}

#[test]
fn test_power_function_parameters() {
    let src = r#"// n^p
// power(x, 2)
/// power: u -> (p: nat) -> u^p
/// frame(p) = (local, _)
int power(int n, int p) {
    /// result: n
    int result = 1;
    while (p--)
        result *= n;
    return result;
}
"#;
    let mut diagnostics = DiagnosticBag::new(src);
    let resolution = analyze(src, &ResolverConfig::default(), &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.iter().map(|d| d.message().to_string()).collect::<Vec<_>>());
    assert_eq!(
        render(&resolution),
        vec![
            "3: power: u -> (p: nat) -> u^p => (global, ::) [decl power]",
            "4: frame(p) => (local, _) [decl power::p] [ok]",
            "6: result: n => (local, _) [decl power::result] [ref power::n]",
        ]
    );
}

#[test]
fn test_distinct_policy_end_to_end() {
    let src = "namespace n1 {\n    /// frame(z1) = (namespace, n1)\n    double z1;\n}\n";
    let config = ResolverConfig::default().with_namespace_policy(NamespacePolicy::Distinct);
    let mut diagnostics = DiagnosticBag::new(src);
    let resolution = analyze(src, &config, &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(render(&resolution), vec!["2: frame(z1) => (namespace, n1) [decl n1::z1] [ok]"]);
}

#[test]
fn test_fatal_error_produces_no_resolution() {
    let src = "class C {\n    int c_x;\n    int c_x;\n};\n";
    let mut diagnostics = DiagnosticBag::new(src);
    assert!(analyze(src, &ResolverConfig::default(), &mut diagnostics).is_none());
    let codes: Vec<&str> = diagnostics.iter().map(|d| d.code()).collect();
    assert_eq!(codes, vec!["E0200"]);
}

#[test]
fn test_syntax_error_stops_before_analysis() {
    let src = "namespace { int x; }\n";
    let mut diagnostics = DiagnosticBag::new(src);
    assert!(analyze(src, &ResolverConfig::default(), &mut diagnostics).is_none());
    assert!(diagnostics.iter().all(|d| d.code() == "E0100"));
    assert!(diagnostics.has_errors());
}

#[test]
fn test_malformed_annotation_is_only_a_warning() {
    let src = "/// frame(x) = (everywhere, _)\nint x;\n";
    let mut diagnostics = DiagnosticBag::new(src);
    let resolution = analyze(src, &ResolverConfig::default(), &mut diagnostics).unwrap();
    assert!(resolution.bindings.is_empty());
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().map(|d| d.code()), Some("W0200"));
}

#[test]
fn test_annotations_inside_declarators() {
    let src = "template <typename T>\n/// frame(T) = (template-param, Box)\nclass Box { T value; };\nint power(\n    /// frame(p) = (local, _)\n    int p,\n    int n\n) { return n; }\n";
    let mut diagnostics = DiagnosticBag::new(src);
    let resolution = analyze(src, &ResolverConfig::default(), &mut diagnostics).expect("annotations between declarator parts parse");
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.iter().map(|d| d.message().to_string()).collect::<Vec<_>>());
    assert_eq!(
        render(&resolution),
        vec![
            "2: frame(T) => (template-param, Box) [decl Box::T] [ok]",
            "5: frame(p) => (local, _) [decl power::p] [ok]",
        ]
    );
}

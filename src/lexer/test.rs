// 导入父模块（也就是 lexer 模块）的所有内容
use super::*;
use crate::diagnostics::DiagnosticBag;

/// 只返回 Token 的向量（忽略 span），大部分测试只关心 Token 的类型和顺序。
fn lex_just_tokens(source: &str) -> Vec<Token> {
    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lex(source, &mut diagnostics);
    assert!(!diagnostics.has_errors(), "unexpected lexer errors for {:?}", source);
    tokens.into_iter().map(|(token, _span)| token).collect()
}

fn ident(name: &str) -> Token {
    Token::Ident(name.to_string())
}

// --- 成功案例 ---

#[test]
fn test_declaration_tokens() {
    let source = "double z = x;";
    let expected = vec![
        ident("double"),
        ident("z"),
        Token::Assign,
        ident("x"),
        Token::Semicolon,
    ];
    assert_eq!(lex_just_tokens(source), expected);
}

#[test]
fn test_template_out_of_line_declarator() {
    let source = "template <typename U> void C1<T>::c1m()";
    let expected = vec![
        Token::Template,
        Token::Lt,
        Token::Typename,
        ident("U"),
        Token::Gt,
        ident("void"),
        ident("C1"),
        Token::Lt,
        ident("T"),
        Token::Gt,
        Token::PathSep,
        ident("c1m"),
        Token::LParen,
        Token::RParen,
    ];
    assert_eq!(lex_just_tokens(source), expected);
}

#[test]
fn test_doc_comments_are_kept_and_plain_comments_skipped() {
    let source = r#"
        // MyComment
        /// x: m
        /* block
           comment */
        double x;
    "#;
    let expected = vec![
        Token::DocComment("/// x: m".to_string()),
        ident("double"),
        ident("x"),
        Token::Semicolon,
    ];
    assert_eq!(lex_just_tokens(source), expected);
}

#[test]
fn test_empty_line_comment_is_skipped() {
    let source = "//\nint a;";
    assert_eq!(
        lex_just_tokens(source),
        vec![ident("int"), ident("a"), Token::Semicolon]
    );
}

#[test]
fn test_compound_operators() {
    let source = "result *= n; p--; a += 1; b == c; d -> e";
    let tokens = lex_just_tokens(source);
    assert!(tokens.contains(&Token::StarAssign));
    assert!(tokens.contains(&Token::Decrement));
    assert!(tokens.contains(&Token::PlusAssign));
    assert!(tokens.contains(&Token::Eq));
    assert!(tokens.contains(&Token::Arrow));
}

#[test]
fn test_literals() {
    let source = r#"1 2.5 "hi\n" 'c'"#;
    let expected = vec![
        Token::Integer("1".to_string()),
        Token::Float("2.5".to_string()),
        Token::String("hi\n".to_string()),
        Token::Char("'c'".to_string()),
    ];
    assert_eq!(lex_just_tokens(source), expected);
}

#[test]
fn test_preprocessor_lines_are_skipped() {
    let source = "#include <vector>\nint a;";
    assert_eq!(
        lex_just_tokens(source),
        vec![ident("int"), ident("a"), Token::Semicolon]
    );
}

// --- 失败案例 ---

#[test]
fn test_unrecognized_character_is_reported_and_skipped() {
    let source = "int a @ b;";
    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lex(source, &mut diagnostics);

    assert!(diagnostics.has_errors());
    let first = diagnostics.iter().next().unwrap();
    assert_eq!(first.code(), "E0000");
    assert_eq!(first.labels()[0].span, 6..7);
    // 错误字符之后的 token 依然被保留
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_tokens_display_their_source_spelling() {
    assert_eq!(Token::Class.to_string(), "class");
    assert_eq!(Token::Template.to_string(), "template");
    assert_eq!(Token::PathSep.to_string(), "::");
    assert_eq!(Token::LBrace.to_string(), "{");
    assert_eq!(Token::Ident("x".to_string()).to_string(), "x");
    assert_eq!(Token::Semicolon.spelling(), Some(";"));
    assert_eq!(Token::Ident("x".to_string()).spelling(), None);
}

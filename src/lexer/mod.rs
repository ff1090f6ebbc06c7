// 导入logos分词库
use logos::Logos;
// 导入诊断系统
use crate::diagnostics::codes::E0000_UNRECOGNIZED_CHAR;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Label};
// 导入定位处理
pub use crate::utils::Span;
use std::fmt;

// 声明单元测试模块
#[cfg(test)]
mod test;

// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    #[default]
    InvalidToken,
}

// 字符串字面量的辅助解析函数，去掉首尾引号并处理常见的转义字符。
fn lex_string_literal(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut s = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some('r') => s.push('\r'),
                Some('\\') => s.push('\\'),
                Some('"') => s.push('"'),
                Some(other) => {
                    s.push('\\');
                    s.push(other);
                }
                None => return None,
            }
        } else {
            s.push(c);
        }
    }
    Some(s)
}

/// 词素定义
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexingError)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过普通单行注释（`///` 文档注释除外）
#[logos(skip r"//([^/\n][^\n]*)?")]
// 跳过块注释
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
// 跳过预处理指令
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // `///` 文档注释，保留完整文本，注解就写在这里
    #[regex(r"///[^\n]*", |lex| lex.slice().to_string())]
    DocComment(String),

    // 关键字
    #[token("namespace")]
    Namespace,
    #[token("class")]
    Class,
    #[token("struct")]
    Struct,
    #[token("template")]
    Template,
    #[token("typename")]
    Typename,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("const")]
    Const,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,

    // 字面量
    #[regex("[0-9]+\\.[0-9]+", |lex| lex.slice().to_string())]
    Float(String),
    #[regex("[0-9]+", |lex| lex.slice().to_string())]
    Integer(String),
    #[regex(r#""([^"\\]|\\.)*""#, lex_string_literal)]
    String(String),
    #[regex(r"'([^'\\]|\\.)'", |lex| lex.slice().to_string())]
    Char(String),

    // 标识符，内建类型名（int、double...）也在这里
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // 运算符号
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,
    #[token("&")]
    Ampersand,
    #[token("~")]
    Tilde,

    // 连接符号
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("::")]
    PathSep,
    #[token(":")]
    Colon,

    // 分隔符
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

impl Token {
    /// 关键字与符号在源代码中的写法；携带数据的词素返回 None
    pub fn spelling(&self) -> Option<&'static str> {
        let text = match self {
            Token::Namespace => "namespace",
            Token::Class => "class",
            Token::Struct => "struct",
            Token::Template => "template",
            Token::Typename => "typename",
            Token::Return => "return",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::Const => "const",
            Token::Public => "public",
            Token::Private => "private",
            Token::Protected => "protected",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Assign => "=",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
            Token::Increment => "++",
            Token::Decrement => "--",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Not => "!",
            Token::Ampersand => "&",
            Token::Tilde => "~",
            Token::Dot => ".",
            Token::Arrow => "->",
            Token::PathSep => "::",
            Token::Colon => ":",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::DocComment(_)
            | Token::Float(_)
            | Token::Integer(_)
            | Token::String(_)
            | Token::Char(_)
            | Token::Ident(_) => return None,
        };
        Some(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::DocComment(text) => write!(f, "{}", text),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Integer(v) | Token::Float(v) | Token::Char(v) => write!(f, "{}", v),
            Token::String(s) => write!(f, "{:?}", s),
            other => f.write_str(other.spelling().unwrap_or("?")),
        }
    }
}

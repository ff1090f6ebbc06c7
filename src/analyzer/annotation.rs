//! `///` 注释中的注解语法：
//!
//! - `/// <name>: <reference>`：引用说明
//! - `/// frame(<name>) = (<classification>, <enclosing-ref>)`：frame 断言

use super::frame::Classification;
use crate::utils::Span;
use chumsky::prelude::*;
use std::fmt;

/// 从一条注释中解析出的注解，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub target: String,
    pub body: AnnotationBody,
    /// 注释所在行（从 1 开始）
    pub line: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBody {
    Note { reference: String },
    Frame(FrameAssertion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAssertion {
    pub classification: Classification,
    pub enclosing: EnclosingRef,
}

impl fmt::Display for FrameAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.classification, self.enclosing)
    }
}

/// 断言中的外围实体写法。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnclosingRef {
    /// `_`，不检查名字
    Wildcard,
    /// `::`
    Global,
    Named(String),
}

impl fmt::Display for EnclosingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnclosingRef::Wildcard => f.write_str("_"),
            EnclosingRef::Global => f.write_str("::"),
            EnclosingRef::Named(name) => f.write_str(name),
        }
    }
}

/// 对一条 `///` 注释的解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedComment {
    Annotation(Annotation),
    /// 普通的文档注释
    Documentation,
    /// 以 `frame(` 开头但格式不对
    Malformed(String),
}

type CommentError<'a> = extra::Err<Rich<'a, char>>;

fn annotation_parser<'a>() -> impl Parser<'a, &'a str, (String, AnnotationBody), CommentError<'a>> {
    let ident = text::ident().map(|name: &str| name.to_string());
    let path = text::ident()
        .separated_by(just("::"))
        .at_least(1)
        .collect::<Vec<&str>>()
        .map(|segments| segments.join("::"));

    let classification = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|word: &str, span| word.parse::<Classification>().map_err(|msg| Rich::custom(span, msg)));

    let enclosing = choice((
        just("::").to(EnclosingRef::Global),
        path.map(|path| {
            if path == "_" {
                EnclosingRef::Wildcard
            } else {
                EnclosingRef::Named(path)
            }
        }),
    ));

    let frame = just("frame")
        .ignore_then(ident.clone().padded().delimited_by(just('('), just(')')))
        .then_ignore(just('=').padded())
        .then(
            classification
                .padded()
                .then_ignore(just(','))
                .then(enclosing.padded())
                .delimited_by(just('('), just(')')),
        )
        .map(|(target, (classification, enclosing))| {
            (
                target,
                AnnotationBody::Frame(FrameAssertion {
                    classification,
                    enclosing,
                }),
            )
        });

    let note = ident
        .then_ignore(just(':').padded())
        .then(
            any()
                .repeated()
                .to_slice()
                .map(|rest: &str| rest.trim().to_string())
                .filter(|reference: &String| !reference.is_empty()),
        )
        .map(|(target, reference)| (target, AnnotationBody::Note { reference }));

    choice((frame, note)).padded().then_ignore(end())
}

/// 解析一条完整的 `///` 注释文本。
pub fn parse_comment(text: &str, line: usize, span: Span) -> ParsedComment {
    let Some(body) = text.strip_prefix("///") else {
        return ParsedComment::Documentation;
    };

    match annotation_parser().parse(body).into_result() {
        Ok((target, body)) => ParsedComment::Annotation(Annotation {
            target,
            body,
            line,
            span,
        }),
        Err(errors) if body.trim_start().starts_with("frame(") => ParsedComment::Malformed(
            errors
                .first()
                .map_or_else(|| "unexpected input".to_string(), |err| err.to_string()),
        ),
        Err(_) => ParsedComment::Documentation,
    }
}

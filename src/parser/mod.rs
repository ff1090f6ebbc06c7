//! src/parser/mod.rs
//!
//! 语法分析阶段的公共接口：接收 Token 流，产出声明树 (AST)。

pub mod ast;
mod parsers;
// 测试模块
#[cfg(test)]
mod test;

use crate::diagnostics::codes::E0100_SYNTAX_ERROR;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Label};
use crate::lexer::Token;
use crate::parser::ast::TranslationUnit;
use crate::utils::Span;
use chumsky::Parser;
use chumsky::error::RichPattern;
use chumsky::input::{Input, Stream};
use chumsky::span::SimpleSpan;
use parsers::unit_parser;

/// parser 模块唯一的公共入口函数。
///
/// - 输入: 源代码的总长度 (用于 EOI span) 和 Token 向量。
/// - 输出: 成功时返回 TranslationUnit；任何语法错误都会报告给 diagnostics 并返回 `None`。
pub fn parse(
    source_len: usize,
    tokens: Vec<(Token, Span)>,
    diagnostics: &mut DiagnosticBag,
) -> Option<TranslationUnit> {
    // --- 1. 创建 Token 流 ---
    let eoi: SimpleSpan = (source_len..source_len).into();
    let token_stream = Stream::from_iter(
        tokens
            .into_iter()
            .map(|(token, span)| (token, SimpleSpan::from(span))),
    )
    .map(eoi, |(t, s): (_, _)| (t, s));

    // --- 2. 运行解析器 ---
    let (unit, parse_errors) = unit_parser().parse(token_stream).into_output_errors();

    // --- 3. 将 chumsky 的错误转换为诊断信息 ---
    let had_errors = !parse_errors.is_empty();
    for error in parse_errors {
        let found = error
            .found()
            .map_or("end of input".to_string(), |tok| format!("`{}`", tok));

        let expected = if error.expected().len() == 0 {
            "something else".to_string()
        } else {
            error
                .expected()
                .map(describe_pattern)
                .collect::<Vec<_>>()
                .join(" or ")
        };

        let span = error.span().into_range();
        diagnostics.report(
            Diagnostic::error(
                &E0100_SYNTAX_ERROR,
                Label::new(span, format!("found {} here", found)),
            )
            .with_dynamic_message(format!("Syntax error: expected {}, found {}", expected, found)),
        );
    }

    if had_errors {
        None
    } else {
        tracing::debug!(
            "parsed {} top-level items",
            unit.as_ref().map_or(0, |unit| unit.items.len())
        );
        unit
    }
}

/// 期望的词素按源代码写法加反引号输出，与 `found` 的格式一致。
fn describe_pattern(pattern: &RichPattern<'_, Token>) -> String {
    match pattern {
        RichPattern::Token(token) => format!("`{}`", &**token),
        other => other.to_string(),
    }
}

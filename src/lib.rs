pub mod analyzer;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod utils;

#[cfg(test)]
mod test;

use analyzer::{Analyzer, Resolution};
use config::ResolverConfig;
use diagnostics::DiagnosticBag;
use utils::LineIndex;

/// 分析一段源代码：词法、语法、事件展开，然后构建作用域图并解析所有注解。
///
/// 所有阶段的问题都报告到 `diagnostics` 中。
/// 返回 `None` 表示源代码无法解析，或者出现了致命错误，此时没有任何部分结果。
/// 返回 `Some` 时，非致命的解析错误也已经报告，同时保存在 `Resolution::errors` 中。
pub fn analyze(source: &str, config: &ResolverConfig, diagnostics: &mut DiagnosticBag) -> Option<Resolution> {
    // 1. 词法分析：即使有错误也继续交给 parser，让它报告更多问题
    let tokens = lexer::lex(source, diagnostics);

    // 2. 语法分析
    let unit = parser::parse(source.len(), tokens, diagnostics)?;
    if diagnostics.has_errors() {
        return None;
    }

    // 3. 展开为事件流
    let events = builder::lower(&unit, &LineIndex::new(source));

    // 4. 作用域与符号解析
    match Analyzer::new(config.clone()).run(&events) {
        Ok(resolution) => {
            for error in &resolution.errors {
                diagnostics.report(error.clone().into());
            }
            Some(resolution)
        }
        Err(fatal) => {
            tracing::warn!("analysis aborted: {}", fatal);
            diagnostics.report(fatal.into());
            None
        }
    }
}

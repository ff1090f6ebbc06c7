//! 把解析结果格式化为逐行文本，便于与期望输出逐行比较。

#[cfg(test)]
mod test;

use crate::analyzer::{AnnotationBody, Binding, Frame, Reference, Resolution, ResolvedBinding, ScopeGraph, ScopeId};
use std::fmt::Write;

/// 一个 binding 的基本输出行：
///
/// - 引用说明：`<line>: <name>: <reference> => (<classification>, <enclosing>)`
/// - frame 断言：`<line>: frame(<name>) => (<classification>, <enclosing>)`
pub fn emit(binding: &Binding, frame: &Frame) -> String {
    let annotation = &binding.annotation;
    match &annotation.body {
        AnnotationBody::Note { reference } => {
            format!("{}: {}: {} => {}", annotation.line, annotation.target, reference, frame)
        }
        AnnotationBody::Frame(_) => format!("{}: frame({}) => {}", annotation.line, annotation.target, frame),
    }
}

/// 输出整个翻译单元，每个 binding 一行，附带声明、引用与断言检查的细节。
pub fn render(resolution: &Resolution) -> Vec<String> {
    resolution
        .bindings
        .iter()
        .map(|resolved| render_binding(resolution, resolved))
        .collect()
}

fn render_binding(resolution: &Resolution, resolved: &ResolvedBinding) -> String {
    let graph = &resolution.graph;
    let mut line = emit(&resolved.binding, &resolved.frame);

    // 写入 String 不会失败
    let _ = write!(line, " [decl {}]", graph.qualified_name(resolved.binding.target));
    match &resolved.reference {
        Some(Reference::Symbol { decl, .. }) => {
            let _ = write!(line, " [ref {}]", graph.qualified_name(*decl));
        }
        Some(Reference::Unit { unit, .. }) => {
            let _ = write!(line, " [unit {}]", unit);
        }
        Some(Reference::Unresolved(_)) => line.push_str(" [ref unresolved]"),
        Some(Reference::Text(_)) | None => {}
    }
    match &resolved.check {
        Some(check) if check.holds => line.push_str(" [ok]"),
        Some(check) => {
            let _ = write!(line, " [mismatch: expected {}]", check.expected);
        }
        None => {}
    }
    line
}

/// 按树形输出作用域图：每行一个作用域，子作用域缩进两格，后面列出它的声明。
pub fn dump_scopes(graph: &ScopeGraph) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack: Vec<(ScopeId, usize)> = graph
        .scopes()
        .filter(|scope| scope.parent.is_none())
        .map(|scope| (scope.id, 0))
        .collect();
    stack.reverse();

    while let Some((id, depth)) = stack.pop() {
        let Some(scope) = graph.scope(id) else {
            continue;
        };
        let mut line = format!("{}{}", "  ".repeat(depth), scope.kind);
        if let Some(owner) = scope.owner {
            let _ = write!(line, " {}", graph.qualified_name(owner));
        }
        let names: Vec<&str> = scope
            .declarations()
            .iter()
            .filter_map(|decl| graph.decl(*decl))
            .map(|decl| decl.name.as_str())
            .collect();
        if !names.is_empty() {
            let _ = write!(line, ": {}", names.join(", "));
        }
        lines.push(line);
        // 逆序入栈，出栈时保持打开顺序
        stack.extend(scope.children.iter().rev().map(|child| (*child, depth + 1)));
    }
    lines
}

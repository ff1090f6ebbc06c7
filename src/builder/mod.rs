//! 声明树构建器：把 AST 按源代码顺序展开为事件流。

pub mod events;
#[cfg(test)]
mod test;

pub use events::{CommentEvent, DeclarationEvent, DeclarationKind, Event, NamedSpan};

use crate::parser::ast;
use crate::utils::LineIndex;

/// 将整个翻译单元展开为事件流。
pub fn lower(unit: &ast::TranslationUnit, lines: &LineIndex) -> Vec<Event> {
    let mut builder = EventBuilder {
        lines,
        events: Vec::new(),
    };
    for item in &unit.items {
        builder.item(item);
    }
    tracing::debug!("lowered translation unit into {} events", builder.events.len());
    builder.events
}

struct EventBuilder<'a> {
    lines: &'a LineIndex,
    events: Vec<Event>,
}

impl EventBuilder<'_> {
    fn comment(&mut self, comment: &ast::DocComment) {
        self.events.push(Event::Comment(CommentEvent {
            text: comment.text.clone(),
            line: self.lines.line_of(comment.span.start),
            span: comment.span.clone(),
        }));
    }

    fn declaration(&mut self, kind: DeclarationKind, name: &ast::Ident) -> DeclarationEvent {
        DeclarationEvent::new(kind, name.name.clone(), self.lines.line_of(name.span.start), name.span.clone())
    }

    fn item(&mut self, item: &ast::Item) {
        match item {
            ast::Item::DocComment(comment) => self.comment(comment),
            ast::Item::Namespace(ns) => {
                let mut event = self.declaration(DeclarationKind::Namespace, &ns.name);
                event.has_body = true;
                self.events.push(Event::Declaration(event));
                for item in &ns.items {
                    self.item(item);
                }
                self.events.push(Event::End);
            }
            ast::Item::Class(class) => {
                for comment in &class.docs {
                    self.comment(comment);
                }
                let mut event = self.declaration(DeclarationKind::Class, &class.name);
                event.templates = templates(&class.templates);
                event.has_body = class.body.is_some();
                self.events.push(Event::Declaration(event));
                if let Some(members) = &class.body {
                    for member in members {
                        self.item(member);
                    }
                    self.events.push(Event::End);
                }
            }
            ast::Item::Function(func) => self.function(func),
            ast::Item::Variable(var) => self.variable(var),
        }
    }

    fn function(&mut self, func: &ast::FunctionDef) {
        // 声明头部中的注释都在声明事件之前按源代码顺序发出
        let mut comments: Vec<&ast::DocComment> = func
            .docs
            .iter()
            .chain(func.params.iter().flat_map(|param| param.docs.iter()))
            .collect();
        comments.sort_by_key(|comment| comment.span.start);
        for comment in comments {
            self.comment(comment);
        }

        let mut event = self.declaration(DeclarationKind::Function, func.name.last());
        event.qualifier = func.name.qualifier().map(|ident| ident.name.clone()).collect();
        event.templates = templates(&func.templates);
        event.params = func
            .params
            .iter()
            .filter_map(|param| param.name.as_ref())
            .map(named)
            .collect();
        event.param_count = func.params.len();
        event.has_body = func.body.is_some();
        self.events.push(Event::Declaration(event));

        if let Some(body) = &func.body {
            // 函数体就是函数的局部作用域，不再额外包一层 Block
            for stmt in &body.stmts {
                self.statement(stmt);
            }
            self.events.push(Event::End);
        }
    }

    fn variable(&mut self, var: &ast::VarDecl) {
        let mut event = self.declaration(DeclarationKind::Variable, &var.name);
        if let Some(init) = &var.init {
            init.collect_reads(&mut event.reads);
        }
        self.events.push(Event::Declaration(event));
    }

    fn statement(&mut self, stmt: &ast::Statement) {
        match stmt {
            ast::Statement::DocComment(comment) => self.comment(comment),
            ast::Statement::VarDecl(var) => self.variable(var),
            ast::Statement::Block(block) => {
                self.events.push(Event::Block {
                    span: block.span.clone(),
                });
                for stmt in &block.stmts {
                    self.statement(stmt);
                }
                self.events.push(Event::End);
            }
            ast::Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.substatement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.substatement(else_branch);
                }
            }
            ast::Statement::While { body, .. } => self.substatement(body),
            ast::Statement::Return { .. } | ast::Statement::Expr(_) => {}
        }
    }

    /// `if`/`while` 的子语句总是自成一个作用域。
    fn substatement(&mut self, stmt: &ast::Statement) {
        match stmt {
            ast::Statement::Block(_) => self.statement(stmt),
            other => {
                self.events.push(Event::Block {
                    span: statement_span(other),
                });
                self.statement(other);
                self.events.push(Event::End);
            }
        }
    }
}

fn named(ident: &ast::Ident) -> NamedSpan {
    NamedSpan {
        name: ident.name.clone(),
        span: ident.span.clone(),
    }
}

fn templates(headers: &[ast::TemplateHeader]) -> Vec<Vec<NamedSpan>> {
    headers
        .iter()
        .map(|header| header.params.iter().map(named).collect())
        .collect()
}

fn statement_span(stmt: &ast::Statement) -> crate::utils::Span {
    match stmt {
        ast::Statement::DocComment(comment) => comment.span.clone(),
        ast::Statement::VarDecl(var) => var.span.clone(),
        ast::Statement::Block(block) => block.span.clone(),
        ast::Statement::Return { span, .. }
        | ast::Statement::If { span, .. }
        | ast::Statement::While { span, .. } => span.clone(),
        ast::Statement::Expr(expr) => expr.span.clone(),
    }
}

pub mod codes;
// 测试模块
#[cfg(test)]
mod test;

use crate::utils::Span;
use ariadne::{Color, Label as AriadneLabel, Report, ReportKind, Source};
use codes::ErrorCode;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    // code、level 与默认消息都来自 ErrorCode
    code: &'static str,
    level: DiagnosticLevel,
    message: String,

    labels: Vec<Label>,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        Self {
            code: error_code.code,
            level: error_code.level,
            message: error_code.message.to_string(),
            labels: vec![primary_label],
            notes: Vec::new(),
        }
    }

    pub fn error(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        assert!(
            matches!(error_code.level, DiagnosticLevel::Error),
            "Tried to create an error diagnostic with a non-error code."
        );
        Self::new(error_code, primary_label)
    }

    pub fn warning(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        assert!(
            matches!(error_code.level, DiagnosticLevel::Warning),
            "Tried to create a warning diagnostic with a non-warning code."
        );
        Self::new(error_code, primary_label)
    }

    /// 用带有具体信息（名字、期望的 frame 等）的消息覆盖 ErrorCode 的默认消息。
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> &str {
        self.code
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

// --- DiagnosticBag：收集所有阶段的诊断信息 ---

#[derive(Debug, Default)]
pub struct DiagnosticBag {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("[{}] {}", diagnostic.code, diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticLevel::Warning)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// 按源代码位置顺序打印并清空所有已收集的诊断。
    pub fn print(&mut self, file_name: &str) {
        let mut pending = mem::take(&mut self.diagnostics);
        // 稳定排序：同一位置的诊断保持报告顺序
        pending.sort_by_key(|d| d.labels.first().map_or(0, |label| label.span.start));
        let cache = (file_name, Source::from(self.source.as_str()));
        for diag in &pending {
            if let Err(err) = build_report(file_name, diag).eprint(cache.clone()) {
                tracing::warn!("failed to render diagnostic {}: {}", diag.code, err);
            }
        }
    }
}

// --- Printer ---

type FileSpan<'a> = (&'a str, Span);

fn build_report<'a>(file_name: &'a str, diag: &Diagnostic) -> Report<'static, FileSpan<'a>> {
    let (kind, color) = match diag.level {
        DiagnosticLevel::Error => (ReportKind::Error, Color::Red),
        DiagnosticLevel::Warning => (ReportKind::Warning, Color::Yellow),
    };
    let anchor = diag.labels().first().map_or(0..0, |label| label.span.clone());

    let mut report = Report::build(kind, (file_name, anchor))
        .with_message(&diag.message)
        .with_code(diag.code);

    // 第一个 label 是主标签，其余为次要标签
    for (i, label) in diag.labels().iter().enumerate() {
        let color = if i == 0 { color } else { Color::Blue };
        report.add_label(
            AriadneLabel::new((file_name, label.span.clone()))
                .with_message(&label.message)
                .with_color(color),
        );
    }
    for note in diag.notes() {
        report = report.with_note(note);
    }
    report.finish()
}

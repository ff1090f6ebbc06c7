use super::declaration::DeclKind;
use super::scope::ScopeId;
use crate::diagnostics::{Diagnostic, Label, codes::*};
use crate::utils::Span;
use thiserror::Error;

/// 作用域构建与符号解析过程中的错误。
///
/// `DuplicateDeclaration` 与 `DetachedScope` 发生在构建阶段，会中止当前翻译单元；
/// 其余错误按注解逐条收集，不影响其他注解的处理。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{name}` is already declared as a {kind} in this scope")]
    DuplicateDeclaration {
        name: String,
        kind: DeclKind,
        span: Span,
        original_span: Span,
    },

    #[error("cannot find `{name}` in this scope")]
    NotFound { name: String, span: Span },

    #[error("annotation for `{target}` is not attached to any declaration")]
    UnboundAnnotation { target: String, span: Span },

    #[error("scope {scope:?} does not reach the global scope")]
    DetachedScope { scope: ScopeId },

    #[error("frame of `{target}` is {found}, but the annotation expects {expected}")]
    FrameMismatch {
        target: String,
        expected: String,
        found: String,
        span: Span,
    },

    #[error("malformed frame annotation: {reason}")]
    MalformedAnnotation { reason: String, span: Span },
}

impl ResolveError {
    /// 构建阶段的错误：作用域图已经不可信，当前翻译单元必须放弃。
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResolveError::DuplicateDeclaration { .. } | ResolveError::DetachedScope { .. }
        )
    }

    /// 为查找产生的 `NotFound` 补上源代码位置。
    pub(crate) fn at(self, span: Span) -> Self {
        match self {
            ResolveError::NotFound { name, .. } => ResolveError::NotFound { name, span },
            other => other,
        }
    }
}

impl From<ResolveError> for Diagnostic {
    fn from(error: ResolveError) -> Self {
        let message = error.to_string();
        match error {
            ResolveError::DuplicateDeclaration {
                name,
                kind,
                span,
                original_span,
            } => Diagnostic::error(
                &E0200_DUPLICATE_DECLARATION,
                Label::new(span, format!("{} `{}` declared again here", kind, name)),
            )
            .with_secondary_label(Label::new(original_span, "previous declaration is here"))
            .with_dynamic_message(message),

            ResolveError::NotFound { name, span } => Diagnostic::error(
                &E0201_NOT_FOUND,
                Label::new(span, format!("`{}` is not visible from here", name)),
            )
            .with_dynamic_message(message),

            ResolveError::UnboundAnnotation { target, span } => Diagnostic::error(
                &E0202_UNBOUND_ANNOTATION,
                Label::new(span, format!("no following declaration declares or reads `{}`", target)),
            )
            .with_dynamic_message(message),

            ResolveError::DetachedScope { .. } => Diagnostic::error(
                &E0203_DETACHED_SCOPE,
                Label::new(0..0, "the scope graph is malformed"),
            )
            .with_dynamic_message(message)
            .with_note("this is a bug in the declaration tree builder"),

            ResolveError::FrameMismatch { span, expected, .. } => Diagnostic::error(
                &E0204_FRAME_MISMATCH,
                Label::new(span, format!("asserted {}", expected)),
            )
            .with_dynamic_message(message),

            ResolveError::MalformedAnnotation { span, .. } => Diagnostic::warning(
                &W0200_MALFORMED_ANNOTATION,
                Label::new(span, "this annotation is ignored"),
            )
            .with_dynamic_message(message),
        }
    }
}
